use super::document::NoteKind;
use super::format::ParagraphFormat;
use super::stable_id::StableId;

/// Handle into the [`ElementArena`]. Atoms store their ancestor chains as
/// handle lists, which keeps the unit tree free of parent pointers while
/// still supporting reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ElementHandle(u32);

/// The closed set of block-element kinds the engine recurses over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ElementKind {
    Paragraph,
    Table,
    Row,
    Cell,
    TextBox,
    Note,
}

impl ElementKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ElementKind::Paragraph => "paragraph",
            ElementKind::Table => "table",
            ElementKind::Row => "row",
            ElementKind::Cell => "cell",
            ElementKind::TextBox => "text-box",
            ElementKind::Note => "note",
        }
    }
}

/// What the reconstructor needs to re-emit an element of each kind.
#[derive(Debug, Clone)]
pub(crate) enum ElementPayload {
    Paragraph { format: ParagraphFormat },
    Table,
    Row,
    Cell,
    TextBox,
    Note { kind: NoteKind },
}

impl ElementPayload {
    pub(crate) fn kind(&self) -> ElementKind {
        match self {
            ElementPayload::Paragraph { .. } => ElementKind::Paragraph,
            ElementPayload::Table => ElementKind::Table,
            ElementPayload::Row => ElementKind::Row,
            ElementPayload::Cell => ElementKind::Cell,
            ElementPayload::TextBox => ElementKind::TextBox,
            ElementPayload::Note { .. } => ElementKind::Note,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ElementRecord {
    pub stable_id: StableId,
    pub payload: ElementPayload,
}

/// One record per block element of both input documents, addressed by plain
/// index handles. Records of the two documents share the arena, so a handle
/// identifies an element unambiguously even when both sides carry the same
/// stable id.
#[derive(Debug, Default)]
pub(crate) struct ElementArena {
    records: Vec<ElementRecord>,
}

impl ElementArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&mut self, stable_id: StableId, payload: ElementPayload) -> ElementHandle {
        let handle = ElementHandle(u32::try_from(self.records.len()).unwrap_or(u32::MAX));
        self.records.push(ElementRecord { stable_id, payload });
        handle
    }

    pub(crate) fn get(&self, handle: ElementHandle) -> Option<&ElementRecord> {
        self.records.get(handle.0 as usize)
    }

    pub(crate) fn kind(&self, handle: ElementHandle) -> Option<ElementKind> {
        self.get(handle).map(|record| record.payload.kind())
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let mut arena = ElementArena::new();
        let handle = arena.register(StableId(1), ElementPayload::Row);
        assert_eq!(arena.kind(handle), Some(ElementKind::Row));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_handles_stay_distinct_for_shared_stable_ids() {
        let mut arena = ElementArena::new();
        let original = arena.register(StableId(1), ElementPayload::Cell);
        let revised = arena.register(StableId(1), ElementPayload::Cell);
        assert_ne!(original, revised);
    }
}
