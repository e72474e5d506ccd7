mod align;
mod compare;
mod errors;
mod reconstruct;
mod revision;
mod settings;
mod tree;
mod units;

pub use compare::{Comparison, compare};
pub use errors::CompareError;
pub use reconstruct::{
    MoveRange, ParagraphMarkRevision, RevisedBlock, RevisedCell, RevisedDocument, RevisedInline,
    RevisedNote, RevisedObject, RevisedParagraph, RevisedPart, RevisedRow, RevisedRun,
    RevisedTable, RevisedTextBox, RevisionMark, RunRevision,
};
pub use revision::{FormatChange, MoveGroupId, Revision, RevisionId, RevisionKind};
pub use settings::CompareSettings;
pub use tree::{
    Alignment, Block, Cell, Document, Inline, InlineObject, Note, NoteKind, ObjectKind, Paragraph,
    ParagraphFormat, Row, Run, RunFormat, StableId, StoryPart, Table, TextBox,
};
