//! Rebuilds an annotated tree from the diffed atom stream.
//!
//! Nesting is restored purely from each atom's recorded ancestor chain:
//! consecutive entries sharing the same handle at the current depth become
//! one element, and the recursion descends one level per container. Deleted
//! atoms' chains are first rewritten through the differ's unification map so
//! deleted content lands inside the surviving container instead of a
//! phantom copy of its old one.

use std::collections::HashMap;

use tracing::trace;

use crate::compare::{CompareContext, DiffEntry, DiffKind, MoveAssignment};
use crate::settings::CompareSettings;
use crate::tree::{
    ElementArena, ElementHandle, ElementPayload, ParagraphFormat, RunFormat, StableId,
};
use crate::units::AtomContent;

use super::revised::{
    MoveRange, ParagraphMarkRevision, RevisedBlock, RevisedCell, RevisedInline, RevisedNote,
    RevisedObject, RevisedParagraph, RevisedRow, RevisedRun, RevisedTable, RevisedTextBox,
    RevisionMark, RunRevision,
};

pub(crate) struct Assembler<'a> {
    arena: &'a ElementArena,
    unification: &'a HashMap<ElementHandle, ElementHandle>,
    settings: &'a CompareSettings,
    ctx: &'a mut CompareContext,
}

/// An entry with its effective ancestor chain resolved.
struct Placed<'e, 'u> {
    entry: &'e DiffEntry<'u>,
    chain: Vec<ElementHandle>,
}

impl<'a> Assembler<'a> {
    pub(crate) fn new(
        arena: &'a ElementArena,
        unification: &'a HashMap<ElementHandle, ElementHandle>,
        settings: &'a CompareSettings,
        ctx: &'a mut CompareContext,
    ) -> Self {
        Self {
            arena,
            unification,
            settings,
            ctx,
        }
    }

    /// Rebuilds the block sequence of a body, header or footer part.
    pub(crate) fn assemble_blocks(&mut self, entries: &[DiffEntry<'_>]) -> Vec<RevisedBlock> {
        let placed = self.place(entries);
        self.assemble_level(&placed, 0)
    }

    /// Rebuilds a footnote or endnote part. Note containers sit at depth
    /// zero of every chain in the part.
    pub(crate) fn assemble_notes(&mut self, entries: &[DiffEntry<'_>]) -> Vec<RevisedNote> {
        let placed = self.place(entries);
        let mut notes = Vec::new();
        for (handle, slice) in consecutive_groups(&placed, 0) {
            let payload =
                handle.and_then(|handle| self.arena.get(handle).map(|r| r.payload.clone()));
            match (handle, payload) {
                (Some(handle), Some(ElementPayload::Note { kind })) => {
                    notes.push(RevisedNote {
                        stable_id: self.stable_id(handle),
                        kind,
                        blocks: self.assemble_level(slice, 1),
                    });
                }
                _ => {
                    debug_assert!(false, "note part entries must be rooted in a note container");
                    trace!("entries outside a note container; dropping to block level");
                }
            }
        }
        notes
    }

    /// Effective ancestor chain of every entry: the revised-side chain where
    /// one exists, the original-side chain mapped through the unification
    /// table otherwise.
    fn place<'e, 'u>(&self, entries: &'e [DiffEntry<'u>]) -> Vec<Placed<'e, 'u>> {
        entries
            .iter()
            .map(|entry| {
                let chain = match (entry.revised, entry.original) {
                    (Some(revised), _) => revised.ancestors.clone(),
                    (None, Some(original)) => original
                        .ancestors
                        .iter()
                        .map(|handle| *self.unification.get(handle).unwrap_or(handle))
                        .collect(),
                    (None, None) => Vec::new(),
                };
                Placed { entry, chain }
            })
            .collect()
    }

    fn assemble_level(&mut self, placed: &[Placed<'_, '_>], depth: usize) -> Vec<RevisedBlock> {
        let mut blocks = Vec::new();
        for (handle, slice) in consecutive_groups(placed, depth) {
            let Some(handle) = handle else {
                // Chain exhausted above atom level: the reference structure
                // is unresolvable, so degrade to an uncorrelated paragraph
                // instead of failing the comparison.
                trace!("unresolvable ancestor chain; emitting uncorrelated atoms");
                blocks.push(RevisedBlock::Paragraph(self.fallback_paragraph(slice)));
                continue;
            };
            match self.arena.get(handle).map(|record| record.payload.clone()) {
                Some(ElementPayload::Paragraph { format }) => {
                    blocks.push(RevisedBlock::Paragraph(
                        self.assemble_paragraph(handle, format, slice),
                    ));
                }
                Some(ElementPayload::Table) => blocks.push(RevisedBlock::Table(RevisedTable {
                    stable_id: self.stable_id(handle),
                    rows: self.assemble_rows(slice, depth + 1),
                })),
                Some(ElementPayload::TextBox) => {
                    blocks.push(RevisedBlock::TextBox(RevisedTextBox {
                        stable_id: self.stable_id(handle),
                        blocks: self.assemble_level(slice, depth + 1),
                    }));
                }
                _ => {
                    // A row, cell or note handle at block depth means the
                    // chain is malformed; degrade like a missing handle.
                    blocks.push(RevisedBlock::Paragraph(self.fallback_paragraph(slice)));
                }
            }
        }
        blocks
    }

    fn assemble_rows(&mut self, placed: &[Placed<'_, '_>], depth: usize) -> Vec<RevisedRow> {
        let mut rows = Vec::new();
        for (handle, slice) in consecutive_groups(placed, depth) {
            let payload =
                handle.and_then(|handle| self.arena.get(handle).map(|r| r.payload.clone()));
            match (handle, payload) {
                (Some(handle), Some(ElementPayload::Row)) => rows.push(RevisedRow {
                    stable_id: self.stable_id(handle),
                    cells: self.assemble_cells(slice, depth + 1),
                }),
                _ => {
                    // Keep the content rather than the shape: a synthetic
                    // single-cell row for entries that do not resolve to one.
                    let paragraph = self.fallback_paragraph(slice);
                    rows.push(RevisedRow {
                        stable_id: self.ctx.revised_ids.assign(None),
                        cells: vec![RevisedCell {
                            stable_id: self.ctx.revised_ids.assign(None),
                            blocks: vec![RevisedBlock::Paragraph(paragraph)],
                        }],
                    });
                }
            }
        }
        rows
    }

    fn assemble_cells(&mut self, placed: &[Placed<'_, '_>], depth: usize) -> Vec<RevisedCell> {
        let mut cells = Vec::new();
        for (handle, slice) in consecutive_groups(placed, depth) {
            let payload =
                handle.and_then(|handle| self.arena.get(handle).map(|r| r.payload.clone()));
            match (handle, payload) {
                (Some(handle), Some(ElementPayload::Cell)) => cells.push(RevisedCell {
                    stable_id: self.stable_id(handle),
                    blocks: self.assemble_level(slice, depth + 1),
                }),
                _ => {
                    let paragraph = self.fallback_paragraph(slice);
                    cells.push(RevisedCell {
                        stable_id: self.ctx.revised_ids.assign(None),
                        blocks: vec![RevisedBlock::Paragraph(paragraph)],
                    });
                }
            }
        }
        cells
    }

    fn assemble_paragraph(
        &mut self,
        handle: ElementHandle,
        format: ParagraphFormat,
        slice: &[Placed<'_, '_>],
    ) -> RevisedParagraph {
        let (inlines, mark_revision) = self.assemble_inlines(slice);
        RevisedParagraph {
            stable_id: self.stable_id(handle),
            format,
            mark_revision,
            inlines,
        }
    }

    fn fallback_paragraph(&mut self, slice: &[Placed<'_, '_>]) -> RevisedParagraph {
        let (inlines, mark_revision) = self.assemble_inlines(slice);
        RevisedParagraph {
            stable_id: self.ctx.revised_ids.assign(None),
            format: ParagraphFormat::default(),
            mark_revision,
            inlines,
        }
    }

    /// Builds the inline sequence of one paragraph, coalescing adjacent
    /// words that share a disposition into single runs, and wrapping the
    /// whole content in paired move-range brackets when the paragraph is a
    /// move endpoint.
    fn assemble_inlines(
        &mut self,
        slice: &[Placed<'_, '_>],
    ) -> (Vec<RevisedInline>, Option<ParagraphMarkRevision>) {
        let mut inlines = Vec::new();
        let mut pending: Option<PendingRun> = None;
        let mut mark_revision = None;
        let mut paragraph_move: Option<MoveAssignment> = None;

        for placed in slice {
            let entry = placed.entry;
            let Some(atom) = entry.revised.or(entry.original) else {
                continue;
            };
            if entry.move_group.is_some() {
                paragraph_move = entry.move_group;
            }

            match &atom.content {
                AtomContent::ParagraphMark => {
                    mark_revision = self.paragraph_mark_revision(entry);
                }
                AtomContent::Word { .. } => {
                    let disposition = disposition_of(entry);
                    let format = atom.format.clone();
                    let text = atom.original_text();
                    match pending.as_mut() {
                        Some(run) if run.disposition == disposition && run.format == format => {
                            run.text.push_str(text);
                        }
                        _ => {
                            self.flush_pending(&mut pending, &mut inlines);
                            pending = Some(PendingRun {
                                disposition,
                                format,
                                text: text.to_owned(),
                            });
                        }
                    }
                }
                AtomContent::Object { kind, fingerprint } => {
                    self.flush_pending(&mut pending, &mut inlines);
                    let revision = self.run_revision(&disposition_of(entry), &atom.format);
                    inlines.push(RevisedInline::Object(RevisedObject {
                        kind: *kind,
                        fingerprint: fingerprint.clone(),
                        format: atom.format.clone(),
                        revision,
                    }));
                }
            }
        }
        self.flush_pending(&mut pending, &mut inlines);

        if let Some(assignment) = paragraph_move {
            let id = self.ctx.next_revision_id();
            let range = MoveRange {
                id,
                group: assignment.group,
                is_source: assignment.is_source,
            };
            inlines.insert(0, RevisedInline::MoveRangeStart(range));
            inlines.push(RevisedInline::MoveRangeEnd(range));
        }

        (inlines, mark_revision)
    }

    fn run_revision(
        &mut self,
        disposition: &Disposition,
        new_format: &RunFormat,
    ) -> Option<RunRevision> {
        match disposition {
            Disposition::Plain => None,
            Disposition::Inserted => Some(RunRevision::Inserted(self.mark())),
            Disposition::Deleted => Some(RunRevision::Deleted(self.mark())),
            Disposition::Moved(assignment) => {
                let mark = self.mark();
                let group = assignment.group;
                Some(if assignment.is_source {
                    RunRevision::MovedFrom { mark, group }
                } else {
                    RunRevision::MovedTo { mark, group }
                })
            }
            Disposition::FormatChanged { old } => Some(RunRevision::FormatChanged {
                mark: self.mark(),
                old: old.clone(),
                changed_property_names: old.changed_property_names(new_format),
            }),
        }
    }

    fn paragraph_mark_revision(&mut self, entry: &DiffEntry<'_>) -> Option<ParagraphMarkRevision> {
        match entry.kind {
            DiffKind::Deleted | DiffKind::Inserted => Some(match entry.move_group {
                Some(assignment) => {
                    let mark = self.mark();
                    let group = assignment.group;
                    if assignment.is_source {
                        ParagraphMarkRevision::MovedFrom { mark, group }
                    } else {
                        ParagraphMarkRevision::MovedTo { mark, group }
                    }
                }
                None if entry.kind == DiffKind::Deleted => {
                    ParagraphMarkRevision::Deleted(self.mark())
                }
                None => ParagraphMarkRevision::Inserted(self.mark()),
            }),
            DiffKind::Equal => {
                let (Some(original), Some(revised)) = (entry.original, entry.revised) else {
                    return None;
                };
                let old = original.paragraph_format.clone()?;
                let new = revised.paragraph_format.as_ref()?;
                if &old == new {
                    return None;
                }
                let changed_property_names = old.changed_property_names(new);
                Some(ParagraphMarkRevision::FormatChanged {
                    mark: self.mark(),
                    old,
                    changed_property_names,
                })
            }
        }
    }

    fn flush_pending(
        &mut self,
        pending: &mut Option<PendingRun>,
        inlines: &mut Vec<RevisedInline>,
    ) {
        let Some(run) = pending.take() else {
            return;
        };
        let revision = self.run_revision(&run.disposition, &run.format);
        inlines.push(RevisedInline::Run(RevisedRun {
            text: run.text,
            format: run.format,
            revision,
        }));
    }

    fn mark(&mut self) -> RevisionMark {
        RevisionMark {
            id: self.ctx.next_revision_id(),
            author: self.settings.author.clone(),
            date: self.settings.date,
        }
    }

    fn stable_id(&mut self, handle: ElementHandle) -> StableId {
        match self.arena.get(handle) {
            Some(record) => record.stable_id,
            None => self.ctx.revised_ids.assign(None),
        }
    }
}

/// How one entry surfaces in the output.
fn disposition_of(entry: &DiffEntry<'_>) -> Disposition {
    match entry.kind {
        DiffKind::Deleted => match entry.move_group {
            Some(assignment) => Disposition::Moved(assignment),
            None => Disposition::Deleted,
        },
        DiffKind::Inserted => match entry.move_group {
            Some(assignment) => Disposition::Moved(assignment),
            None => Disposition::Inserted,
        },
        DiffKind::Equal => match (entry.original, entry.revised) {
            (Some(original), Some(revised)) if original.format != revised.format => {
                Disposition::FormatChanged {
                    old: original.format.clone(),
                }
            }
            _ => Disposition::Plain,
        },
    }
}

/// One coalesced run in the making.
struct PendingRun {
    disposition: Disposition,
    format: RunFormat,
    text: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Disposition {
    Plain,
    Inserted,
    Deleted,
    Moved(MoveAssignment),
    FormatChanged { old: RunFormat },
}

/// Splits `placed` into maximal consecutive slices sharing the handle at
/// `depth`; `None` collects entries whose chain is already exhausted.
fn consecutive_groups<'p, 'e, 'u>(
    placed: &'p [Placed<'e, 'u>],
    depth: usize,
) -> Vec<(Option<ElementHandle>, &'p [Placed<'e, 'u>])> {
    let mut groups = Vec::new();
    let mut start = 0;
    while start < placed.len() {
        let handle = placed[start].chain.get(depth).copied();
        let mut end = start + 1;
        while end < placed.len() && placed[end].chain.get(depth).copied() == handle {
            end += 1;
        }
        groups.push((handle, &placed[start..end]));
        start = end;
    }
    groups
}
