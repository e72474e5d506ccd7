mod arena;
mod block;
mod document;
mod format;
mod inline;
mod stable_id;

pub use block::{Block, Cell, Paragraph, Row, Table, TextBox};
pub use document::{Document, Note, NoteKind, StoryPart};
pub use format::{Alignment, ParagraphFormat, RunFormat};
pub use inline::{Inline, InlineObject, ObjectKind, Run};
pub use stable_id::StableId;

pub(crate) use arena::{ElementArena, ElementHandle, ElementKind, ElementPayload};
pub(crate) use stable_id::StableIdAllocator;
