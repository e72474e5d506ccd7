use crate::tree::{ElementHandle, ObjectKind, ParagraphFormat, RunFormat};

use super::hashing::Digest;

/// What an atom stands for in the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AtomContent {
    /// A word or punctuation token, carrying its original text including
    /// attached whitespace.
    Word { text: String },
    /// An opaque non-text object, compared by fingerprint only.
    Object { kind: ObjectKind, fingerprint: String },
    /// The paragraph mark closing a paragraph. Every paragraph contributes
    /// exactly one, which keeps empty paragraphs comparable and gives
    /// paragraph-level format changes an anchor.
    ParagraphMark,
}

/// Smallest comparable unit: a word, an opaque object, or a paragraph mark,
/// with its formatting and the chain of enclosing block elements.
#[derive(Debug, Clone)]
pub(crate) struct Atom {
    pub content: AtomContent,
    /// Comparison form of the content (case-folded when configured).
    pub normalized: String,
    /// Whether this atom counts as a word for move detection.
    pub is_word: bool,
    pub format: RunFormat,
    /// Set only on paragraph marks.
    pub paragraph_format: Option<ParagraphFormat>,
    /// Digest of the normalized content, ignoring formatting.
    pub content_hash: Digest,
    /// Digest of the normalized content plus formatting.
    pub exact_hash: Digest,
    /// Enclosing block elements, outermost first; the last entry is always
    /// the containing paragraph.
    pub ancestors: Vec<ElementHandle>,
}

impl Atom {
    /// The text this atom contributes to re-serialized output.
    pub(crate) fn original_text(&self) -> &str {
        match &self.content {
            AtomContent::Word { text } => text,
            AtomContent::Object { .. } | AtomContent::ParagraphMark => "",
        }
    }

    pub(crate) fn paragraph(&self) -> Option<ElementHandle> {
        self.ancestors.last().copied()
    }
}
