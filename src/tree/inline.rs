#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::format::RunFormat;

/// Inline content of a paragraph: either a formatted text run or an opaque
/// non-text object.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Run(Run),
    Object(InlineObject),
}

/// A maximal span of identically formatted text.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub format: RunFormat,
}

impl Run {
    #[must_use]
    pub fn new(text: impl Into<String>, format: RunFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }

    /// A run without any formatting.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, RunFormat::default())
    }
}

/// The kind of an opaque inline object. The engine never inspects the object
/// itself; it compares fingerprints.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Image,
    Drawing,
    Field,
    Tab,
    LineBreak,
    PageBreak,
}

impl ObjectKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Image => "image",
            ObjectKind::Drawing => "drawing",
            ObjectKind::Field => "field",
            ObjectKind::Tab => "tab",
            ObjectKind::LineBreak => "line-break",
            ObjectKind::PageBreak => "page-break",
        }
    }
}

/// A non-text inline element treated as a single opaque atom.
///
/// The `fingerprint` is the adapter-supplied identity of the payload (for an
/// image, typically a digest of its bytes); two objects compare equal exactly
/// when their kinds and fingerprints match.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineObject {
    pub kind: ObjectKind,
    pub fingerprint: String,
    pub format: RunFormat,
}

impl InlineObject {
    #[must_use]
    pub fn new(kind: ObjectKind, fingerprint: impl Into<String>) -> Self {
        Self {
            kind,
            fingerprint: fingerprint.into(),
            format: RunFormat::default(),
        }
    }
}
