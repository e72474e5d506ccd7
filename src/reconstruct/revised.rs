use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::revision::{MoveGroupId, RevisionId};
use crate::tree::{NoteKind, ObjectKind, ParagraphFormat, RunFormat, StableId};

/// Identity stamp shared by every kind of revision-markup element.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionMark {
    pub id: RevisionId,
    pub author: String,
    pub date: DateTime<Utc>,
}

/// Revision wrapper on a run or inline object.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum RunRevision {
    Inserted(RevisionMark),
    Deleted(RevisionMark),
    MovedFrom {
        mark: RevisionMark,
        group: MoveGroupId,
    },
    MovedTo {
        mark: RevisionMark,
        group: MoveGroupId,
    },
    FormatChanged {
        mark: RevisionMark,
        old: RunFormat,
        changed_property_names: Vec<String>,
    },
}

impl RunRevision {
    #[must_use]
    pub fn mark(&self) -> &RevisionMark {
        match self {
            RunRevision::Inserted(mark) | RunRevision::Deleted(mark) => mark,
            RunRevision::MovedFrom { mark, .. }
            | RunRevision::MovedTo { mark, .. }
            | RunRevision::FormatChanged { mark, .. } => mark,
        }
    }
}

/// Revision wrapper on a paragraph mark. A deleted paragraph mark means the
/// paragraph boundary itself was removed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum ParagraphMarkRevision {
    Inserted(RevisionMark),
    Deleted(RevisionMark),
    MovedFrom {
        mark: RevisionMark,
        group: MoveGroupId,
    },
    MovedTo {
        mark: RevisionMark,
        group: MoveGroupId,
    },
    FormatChanged {
        mark: RevisionMark,
        old: ParagraphFormat,
        changed_property_names: Vec<String>,
    },
}

impl ParagraphMarkRevision {
    #[must_use]
    pub fn mark(&self) -> &RevisionMark {
        match self {
            ParagraphMarkRevision::Inserted(mark) | ParagraphMarkRevision::Deleted(mark) => mark,
            ParagraphMarkRevision::MovedFrom { mark, .. }
            | ParagraphMarkRevision::MovedTo { mark, .. }
            | ParagraphMarkRevision::FormatChanged { mark, .. } => mark,
        }
    }
}

/// One end of a paired move-range bracket. The start and end bracket of one
/// range share their id; that is the only sanctioned id reuse in the whole
/// output.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRange {
    pub id: RevisionId,
    pub group: MoveGroupId,
    pub is_source: bool,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum RevisedInline {
    Run(RevisedRun),
    Object(RevisedObject),
    MoveRangeStart(MoveRange),
    MoveRangeEnd(MoveRange),
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RevisedRun {
    pub text: String,
    pub format: RunFormat,
    pub revision: Option<RunRevision>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RevisedObject {
    pub kind: ObjectKind,
    pub fingerprint: String,
    pub format: RunFormat,
    pub revision: Option<RunRevision>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RevisedParagraph {
    pub stable_id: StableId,
    pub format: ParagraphFormat,
    pub mark_revision: Option<ParagraphMarkRevision>,
    pub inlines: Vec<RevisedInline>,
}

impl RevisedParagraph {
    /// The paragraph's visible text, revision wrappers ignored.
    #[must_use]
    pub fn text(&self) -> String {
        self.inlines
            .iter()
            .filter_map(|inline| match inline {
                RevisedInline::Run(run) => Some(run.text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum RevisedBlock {
    Paragraph(RevisedParagraph),
    Table(RevisedTable),
    TextBox(RevisedTextBox),
}

impl RevisedBlock {
    #[must_use]
    pub fn as_paragraph(&self) -> Option<&RevisedParagraph> {
        match self {
            RevisedBlock::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_table(&self) -> Option<&RevisedTable> {
        match self {
            RevisedBlock::Table(table) => Some(table),
            _ => None,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RevisedTable {
    pub stable_id: StableId,
    pub rows: Vec<RevisedRow>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RevisedRow {
    pub stable_id: StableId,
    pub cells: Vec<RevisedCell>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RevisedCell {
    pub stable_id: StableId,
    pub blocks: Vec<RevisedBlock>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RevisedTextBox {
    pub stable_id: StableId,
    pub blocks: Vec<RevisedBlock>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RevisedNote {
    pub stable_id: StableId,
    pub kind: NoteKind,
    pub blocks: Vec<RevisedBlock>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RevisedPart {
    pub name: String,
    pub blocks: Vec<RevisedBlock>,
}

/// The reconstructed tree: isomorphic to the union of both inputs, with
/// every difference wrapped in revision markup.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevisedDocument {
    pub body: Vec<RevisedBlock>,
    pub headers: Vec<RevisedPart>,
    pub footers: Vec<RevisedPart>,
    pub footnotes: Vec<RevisedNote>,
    pub endnotes: Vec<RevisedNote>,
}
