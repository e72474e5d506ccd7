//! Builds the comparison-unit hierarchy for one document part.
//!
//! Walks the adapter's block tree, registers every block element in the
//! arena (assigning stable ids idempotently), tokenizes inline content into
//! atoms and derives both digests bottom-up in the same pass.

use crate::tree::{
    Block, Cell, ElementArena, ElementHandle, ElementKind, ElementPayload, Inline, InlineObject,
    Note, NoteKind, Paragraph, Row, RunFormat, StableIdAllocator, Table, TextBox,
};

use super::atom::{Atom, AtomContent};
use super::group::{Unit, UnitGroup};
use super::hashing::Digest;
use super::tokenize::{WordToken, tokenize_run};

pub(crate) struct UnitBuilder<'a> {
    arena: &'a mut ElementArena,
    ids: &'a mut StableIdAllocator,
    case_insensitive: bool,
}

impl<'a> UnitBuilder<'a> {
    pub(crate) fn new(
        arena: &'a mut ElementArena,
        ids: &'a mut StableIdAllocator,
        case_insensitive: bool,
    ) -> Self {
        Self {
            arena,
            ids,
            case_insensitive,
        }
    }

    /// Builds the units of a sequence of sibling blocks. `chain` holds the
    /// handles of the enclosing block elements, outermost first.
    pub(crate) fn build_blocks(
        &mut self,
        blocks: &[Block],
        chain: &mut Vec<ElementHandle>,
    ) -> Vec<Unit> {
        blocks
            .iter()
            .map(|block| match block {
                Block::Paragraph(paragraph) => self.build_paragraph(paragraph, chain),
                Block::Table(table) => self.build_table(table, chain),
                Block::TextBox(text_box) => self.build_text_box(text_box, chain),
            })
            .collect()
    }

    /// Builds the unit of a footnote or endnote body. The note container
    /// itself gets registered, so sibling paragraphs of one note share its
    /// handle in their ancestor chains.
    pub(crate) fn build_note(&mut self, note: &Note, chain: &mut Vec<ElementHandle>) -> Unit {
        let id = self.ids.assign(note.id);
        let handle = self
            .arena
            .register(id, ElementPayload::Note { kind: note.kind });
        chain.push(handle);
        let children = self.build_blocks(&note.blocks, chain);
        chain.pop();
        let kind_signature = match note.kind {
            NoteKind::Footnote => "footnote",
            NoteKind::Endnote => "endnote",
        };
        group_unit(handle, ElementKind::Note, kind_signature, children)
    }

    fn build_paragraph(&mut self, paragraph: &Paragraph, chain: &mut Vec<ElementHandle>) -> Unit {
        let id = self.ids.assign(paragraph.id);
        let handle = self.arena.register(
            id,
            ElementPayload::Paragraph {
                format: paragraph.format.clone(),
            },
        );
        chain.push(handle);

        let mut children = Vec::new();
        for inline in &paragraph.inlines {
            match inline {
                Inline::Run(run) => {
                    for token in tokenize_run(&run.text, self.case_insensitive) {
                        children.push(Unit::Atom(word_atom(token, run.format.clone(), chain)));
                    }
                }
                Inline::Object(object) => {
                    children.push(Unit::Atom(object_atom(object, chain)));
                }
            }
        }
        children.push(Unit::Atom(paragraph_mark_atom(paragraph, chain)));

        chain.pop();
        group_unit(
            handle,
            ElementKind::Paragraph,
            &paragraph.format.signature(),
            children,
        )
    }

    fn build_table(&mut self, table: &Table, chain: &mut Vec<ElementHandle>) -> Unit {
        let id = self.ids.assign(table.id);
        let handle = self.arena.register(id, ElementPayload::Table);
        chain.push(handle);
        let children = table
            .rows
            .iter()
            .map(|row| self.build_row(row, chain))
            .collect();
        chain.pop();
        group_unit(handle, ElementKind::Table, "", children)
    }

    fn build_row(&mut self, row: &Row, chain: &mut Vec<ElementHandle>) -> Unit {
        let id = self.ids.assign(row.id);
        let handle = self.arena.register(id, ElementPayload::Row);
        chain.push(handle);
        let children = row
            .cells
            .iter()
            .map(|cell| self.build_cell(cell, chain))
            .collect();
        chain.pop();
        group_unit(handle, ElementKind::Row, "", children)
    }

    fn build_cell(&mut self, cell: &Cell, chain: &mut Vec<ElementHandle>) -> Unit {
        let id = self.ids.assign(cell.id);
        let handle = self.arena.register(id, ElementPayload::Cell);
        chain.push(handle);
        let children = self.build_blocks(&cell.blocks, chain);
        chain.pop();
        group_unit(handle, ElementKind::Cell, "", children)
    }

    fn build_text_box(&mut self, text_box: &TextBox, chain: &mut Vec<ElementHandle>) -> Unit {
        let id = self.ids.assign(text_box.id);
        let handle = self.arena.register(id, ElementPayload::TextBox);
        chain.push(handle);
        let children = self.build_blocks(&text_box.blocks, chain);
        chain.pop();
        group_unit(handle, ElementKind::TextBox, "", children)
    }
}

fn word_atom(token: WordToken, format: RunFormat, chain: &[ElementHandle]) -> Atom {
    let content_hash = Digest::of_parts([b"word".as_slice(), token.normalized.as_bytes()]);
    let format_signature = format.signature();
    let exact_hash = Digest::of_parts([
        b"word".as_slice(),
        token.normalized.as_bytes(),
        format_signature.as_bytes(),
    ]);
    Atom {
        content: AtomContent::Word {
            text: token.original,
        },
        normalized: token.normalized,
        is_word: token.is_word,
        format,
        paragraph_format: None,
        content_hash,
        exact_hash,
        ancestors: chain.to_vec(),
    }
}

fn object_atom(object: &InlineObject, chain: &[ElementHandle]) -> Atom {
    let content_hash = Digest::of_parts([
        b"object".as_slice(),
        object.kind.as_str().as_bytes(),
        object.fingerprint.as_bytes(),
    ]);
    let format_signature = object.format.signature();
    let exact_hash = Digest::of_parts([
        b"object".as_slice(),
        object.kind.as_str().as_bytes(),
        object.fingerprint.as_bytes(),
        format_signature.as_bytes(),
    ]);
    Atom {
        content: AtomContent::Object {
            kind: object.kind,
            fingerprint: object.fingerprint.clone(),
        },
        normalized: object.fingerprint.clone(),
        is_word: false,
        format: object.format.clone(),
        paragraph_format: None,
        content_hash,
        exact_hash,
        ancestors: chain.to_vec(),
    }
}

fn paragraph_mark_atom(paragraph: &Paragraph, chain: &[ElementHandle]) -> Atom {
    let content_hash = Digest::of_parts([b"paragraph-mark".as_slice()]);
    let format_signature = paragraph.format.signature();
    let exact_hash = Digest::of_parts([
        b"paragraph-mark".as_slice(),
        format_signature.as_bytes(),
    ]);
    Atom {
        content: AtomContent::ParagraphMark,
        normalized: String::new(),
        is_word: false,
        format: RunFormat::default(),
        paragraph_format: Some(paragraph.format.clone()),
        content_hash,
        exact_hash,
        ancestors: chain.to_vec(),
    }
}

fn group_unit(
    element: ElementHandle,
    kind: ElementKind,
    format_signature: &str,
    children: Vec<Unit>,
) -> Unit {
    let child_exact: Vec<Digest> = children.iter().map(Unit::exact_hash).collect();
    let child_content: Vec<Digest> = children.iter().map(Unit::content_hash).collect();

    let mut exact_parts: Vec<&[u8]> = vec![
        b"group",
        kind.as_str().as_bytes(),
        format_signature.as_bytes(),
    ];
    exact_parts.extend(child_exact.iter().map(|digest| digest.as_bytes().as_slice()));

    let mut content_parts: Vec<&[u8]> = vec![b"group", kind.as_str().as_bytes()];
    content_parts.extend(
        child_content
            .iter()
            .map(|digest| digest.as_bytes().as_slice()),
    );

    Unit::Group(UnitGroup {
        element,
        kind,
        children,
        exact_hash: Digest::of_parts(exact_parts),
        content_hash: Digest::of_parts(content_parts),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::tree::{Run, StableId};

    use super::*;

    fn build(blocks: &[Block]) -> (Vec<Unit>, ElementArena) {
        let mut arena = ElementArena::new();
        let mut ids = StableIdAllocator::new();
        let mut builder = UnitBuilder::new(&mut arena, &mut ids, false);
        let units = builder.build_blocks(blocks, &mut Vec::new());
        (units, arena)
    }

    #[test]
    fn test_identical_paragraphs_hash_equal() {
        let (units, _) = build(&[
            Block::Paragraph(Paragraph::from_text("same words here")),
            Block::Paragraph(Paragraph::from_text("same words here")),
        ]);
        assert_eq!(units[0].exact_hash(), units[1].exact_hash());
        assert_eq!(units[0].content_hash(), units[1].content_hash());
    }

    #[test]
    fn test_formatting_changes_exact_hash_only() {
        let bold = RunFormat {
            bold: true,
            ..RunFormat::default()
        };
        let (units, _) = build(&[
            Block::Paragraph(Paragraph::from_text("word")),
            Block::Paragraph(Paragraph::new(vec![Inline::Run(Run::new("word", bold))])),
        ]);
        assert_ne!(units[0].exact_hash(), units[1].exact_hash());
        assert_eq!(units[0].content_hash(), units[1].content_hash());
    }

    #[test]
    fn test_paragraph_contains_word_atoms_and_a_mark() {
        let (units, _) = build(&[Block::Paragraph(Paragraph::from_text("two words"))]);
        let group = units[0].as_group().unwrap();
        let atoms = group.atoms();
        assert_eq!(atoms.len(), 3);
        assert!(matches!(atoms[2].content, AtomContent::ParagraphMark));
    }

    #[test]
    fn test_formatting_boundary_forces_atom_boundary() {
        // One word split across two identically formatted runs must stay two
        // atoms, otherwise fine-grained format changes become undetectable.
        let (units, _) = build(&[Block::Paragraph(Paragraph::new(vec![
            Inline::Run(Run::plain("over")),
            Inline::Run(Run::plain("lap")),
        ]))]);
        let group = units[0].as_group().unwrap();
        assert_eq!(group.atoms().len(), 3);
    }

    #[test]
    fn test_note_container_is_on_every_descendant_chain() {
        let mut arena = ElementArena::new();
        let mut ids = StableIdAllocator::new();
        let mut builder = UnitBuilder::new(&mut arena, &mut ids, false);
        let note = Note::new(
            NoteKind::Footnote,
            vec![
                Block::Paragraph(Paragraph::from_text("first paragraph")),
                Block::Paragraph(Paragraph::from_text("second paragraph")),
            ],
        );
        let unit = builder.build_note(&note, &mut Vec::new());
        let group = unit.as_group().unwrap();
        let container = group.element;
        for atom in group.atoms() {
            assert_eq!(atom.ancestors.first().copied(), Some(container));
        }
    }

    #[test]
    fn test_pre_assigned_stable_ids_are_kept() {
        let mut paragraph = Paragraph::from_text("text");
        paragraph.id = Some(StableId(42));
        let (units, arena) = build(&[Block::Paragraph(paragraph)]);
        let group = units[0].as_group().unwrap();
        assert_eq!(arena.get(group.element).unwrap().stable_id, StableId(42));
    }

    #[test]
    fn test_nested_table_chains() {
        let table = Table::new(vec![Row::from_texts(["a", "b"])]);
        let (units, arena) = build(&[Block::Table(table)]);
        let group = units[0].as_group().unwrap();
        let atoms = group.atoms();
        // table -> row -> cell -> paragraph
        assert_eq!(atoms[0].ancestors.len(), 4);
        assert_eq!(arena.kind(atoms[0].ancestors[0]), Some(ElementKind::Table));
        assert_eq!(
            arena.kind(atoms[0].ancestors[3]),
            Some(ElementKind::Paragraph)
        );
    }
}
