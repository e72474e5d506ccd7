mod assembler;
mod extract;
mod revised;

pub use revised::{
    MoveRange, ParagraphMarkRevision, RevisedBlock, RevisedCell, RevisedDocument, RevisedInline,
    RevisedNote, RevisedObject, RevisedParagraph, RevisedPart, RevisedRow, RevisedRun,
    RevisedTable, RevisedTextBox, RevisionMark, RunRevision,
};

pub(crate) use assembler::Assembler;
pub(crate) use extract::{extract_revisions, verify_revision_ids};
