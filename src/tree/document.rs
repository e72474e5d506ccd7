#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::block::Block;
use super::stable_id::StableId;

/// The abstract tree an external file-format adapter produces. The engine
/// compares every reachable part: body, headers, footers, footnotes and
/// endnotes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub body: Vec<Block>,
    pub headers: Vec<StoryPart>,
    pub footers: Vec<StoryPart>,
    pub footnotes: Vec<Note>,
    pub endnotes: Vec<Note>,
}

impl Document {
    /// A document with only a body.
    #[must_use]
    pub fn with_body(body: Vec<Block>) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }
}

/// A named auxiliary story such as one header or footer. Parts pair up by
/// name between the two compared documents.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryPart {
    pub name: String,
    pub blocks: Vec<Block>,
}

impl StoryPart {
    #[must_use]
    pub fn new(name: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            name: name.into(),
            blocks,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    Footnote,
    Endnote,
}

/// A footnote or endnote body. The container itself carries a stable id:
/// sibling paragraphs of one note must share the container in their ancestor
/// chains or multi-paragraph notes fall apart during reconstruction.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: Option<StableId>,
    pub kind: NoteKind,
    pub blocks: Vec<Block>,
}

impl Note {
    #[must_use]
    pub fn new(kind: NoteKind, blocks: Vec<Block>) -> Self {
        Self {
            id: None,
            kind,
            blocks,
        }
    }
}
