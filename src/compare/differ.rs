//! Recursive structural differ.
//!
//! Aligns the two unit trees top-down: block sequences align by exact hash,
//! related-but-unequal pairs ("Unknown") recurse one level further until the
//! recursion reaches atoms. The recursion is structure-agnostic: tables,
//! rows, cells, text boxes and notes all go through the same sequence path,
//! only paragraphs switch to atom-level refinement.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::align::{Correlated, CorrelationTag, align};
use crate::revision::MoveGroupId;
use crate::settings::CompareSettings;
use crate::tree::{ElementHandle, ElementKind};
use crate::units::{Atom, Unit, UnitGroup};

use super::tables::should_realign_rows;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DiffKind {
    Equal,
    Deleted,
    Inserted,
}

/// Move pairing attached to an entry by the move detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MoveAssignment {
    pub group: MoveGroupId,
    pub is_source: bool,
}

/// One atom of the diffed output stream. Equal entries reference both sides
/// (their formats may still differ); deleted entries reference the original
/// document only, inserted ones the revised document only.
#[derive(Debug, Clone)]
pub(crate) struct DiffEntry<'u> {
    pub kind: DiffKind,
    pub original: Option<&'u Atom>,
    pub revised: Option<&'u Atom>,
    pub move_group: Option<MoveAssignment>,
}

impl<'u> DiffEntry<'u> {
    fn equal(original: &'u Atom, revised: &'u Atom) -> Self {
        Self {
            kind: DiffKind::Equal,
            original: Some(original),
            revised: Some(revised),
            move_group: None,
        }
    }

    fn deleted(original: &'u Atom) -> Self {
        Self {
            kind: DiffKind::Deleted,
            original: Some(original),
            revised: None,
            move_group: None,
        }
    }

    fn inserted(revised: &'u Atom) -> Self {
        Self {
            kind: DiffKind::Inserted,
            original: None,
            revised: Some(revised),
            move_group: None,
        }
    }
}

/// Which digest two units must share to count as equal during alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlignKey {
    Exact,
    Content,
}

pub(crate) struct StructuralDiffer<'s> {
    settings: &'s CompareSettings,
    /// Original-side element handle to its matched revised-side handle, for
    /// every pair the recursion matched. Reconstruction maps deleted atoms'
    /// ancestor chains through this so deleted content lands inside the
    /// surviving container.
    unification: HashMap<ElementHandle, ElementHandle>,
}

impl<'s> StructuralDiffer<'s> {
    pub(crate) fn new(settings: &'s CompareSettings) -> Self {
        Self {
            settings,
            unification: HashMap::new(),
        }
    }

    pub(crate) fn into_unification(self) -> HashMap<ElementHandle, ElementHandle> {
        self.unification
    }

    /// Diffs two sibling block sequences, appending one entry per atom of
    /// either side to `out`.
    pub(crate) fn diff_blocks<'u>(
        &mut self,
        original: &'u [Unit],
        revised: &'u [Unit],
        out: &mut Vec<DiffEntry<'u>>,
    ) {
        debug!(
            original_units = original.len(),
            revised_units = revised.len(),
            "aligning block sequence"
        );
        self.diff_sequence(original, revised, AlignKey::Exact, out);
    }

    fn diff_sequence<'u>(
        &mut self,
        original: &'u [Unit],
        revised: &'u [Unit],
        key: AlignKey,
        out: &mut Vec<DiffEntry<'u>>,
    ) {
        for item in correlate(original, revised, key) {
            match (item.tag, item.original, item.revised) {
                (CorrelationTag::Equal, Some(i), Some(j)) => {
                    if original[i].exact_hash() == revised[j].exact_hash() {
                        emit_equal_unit(&original[i], &revised[j], out);
                    } else {
                        // Content-keyed alignment can match units whose
                        // formatting or fine structure still differs.
                        self.refine_pair(&original[i], &revised[j], out);
                    }
                }
                (CorrelationTag::Unknown, Some(i), Some(j)) => {
                    self.refine_pair(&original[i], &revised[j], out);
                }
                (CorrelationTag::Deleted, Some(i), None) => {
                    emit_unit(&original[i], DiffKind::Deleted, out);
                }
                (CorrelationTag::Inserted, None, Some(j)) => {
                    emit_unit(&revised[j], DiffKind::Inserted, out);
                }
                _ => {}
            }
        }
    }

    /// Refines a related pair one level down.
    fn refine_pair<'u>(&mut self, original: &'u Unit, revised: &'u Unit, out: &mut Vec<DiffEntry<'u>>) {
        let (Some(original_group), Some(revised_group)) = (original.as_group(), revised.as_group())
        else {
            // A related pair below group granularity cannot be refined any
            // further; report both sides independently.
            emit_unit(original, DiffKind::Deleted, out);
            emit_unit(revised, DiffKind::Inserted, out);
            return;
        };
        trace!(kind = ?original_group.kind, "refining related pair");

        if original_group.kind != revised_group.kind {
            emit_unit(original, DiffKind::Deleted, out);
            emit_unit(revised, DiffKind::Inserted, out);
            return;
        }

        match original_group.kind {
            ElementKind::Paragraph => self.refine_paragraph(original_group, revised_group, out),
            ElementKind::Table => {
                self.unification
                    .insert(original_group.element, revised_group.element);
                let key = if should_realign_rows(&original_group.children, &revised_group.children)
                {
                    debug!("row counts match but correlate badly; realigning by content hash");
                    AlignKey::Content
                } else {
                    AlignKey::Exact
                };
                self.diff_sequence(&original_group.children, &revised_group.children, key, out);
            }
            ElementKind::Row
            | ElementKind::Cell
            | ElementKind::TextBox
            | ElementKind::Note => {
                self.unification
                    .insert(original_group.element, revised_group.element);
                self.diff_sequence(
                    &original_group.children,
                    &revised_group.children,
                    AlignKey::Exact,
                    out,
                );
            }
        }
    }

    /// Word-level refinement of two related paragraphs, subject to the
    /// detail threshold.
    fn refine_paragraph<'u>(
        &mut self,
        original: &'u UnitGroup,
        revised: &'u UnitGroup,
        out: &mut Vec<DiffEntry<'u>>,
    ) {
        let original_atoms = original.atoms();
        let revised_atoms = revised.atoms();

        let items = align(&original_atoms, &revised_atoms, |a, b| {
            a.content_hash == b.content_hash
        });
        let changed = items
            .iter()
            .filter(|item| item.tag != CorrelationTag::Equal)
            .count();
        let total = original_atoms.len() + revised_atoms.len();
        let changed_fraction = if total == 0 {
            0.0
        } else {
            changed as f64 / total as f64
        };

        if total > 0 && changed_fraction >= self.settings.detail_threshold {
            trace!(
                changed_fraction,
                threshold = self.settings.detail_threshold,
                "paragraphs too different; reporting full delete and insert"
            );
            for atom in original_atoms {
                out.push(DiffEntry::deleted(atom));
            }
            for atom in revised_atoms {
                out.push(DiffEntry::inserted(atom));
            }
            return;
        }

        self.unification.insert(original.element, revised.element);
        for item in items {
            match (item.tag, item.original, item.revised) {
                (CorrelationTag::Equal, Some(i), Some(j)) => {
                    out.push(DiffEntry::equal(original_atoms[i], revised_atoms[j]));
                }
                (CorrelationTag::Deleted, Some(i), None) => {
                    out.push(DiffEntry::deleted(original_atoms[i]));
                }
                (CorrelationTag::Inserted, None, Some(j)) => {
                    out.push(DiffEntry::inserted(revised_atoms[j]));
                }
                _ => {}
            }
        }
    }
}

/// Runs the aligner and then pairs related units inside each unmatched gap:
/// a deleted and an inserted group of the same kind become one `Unknown`
/// item for the differ to refine.
fn correlate(original: &[Unit], revised: &[Unit], key: AlignKey) -> Vec<Correlated> {
    let items = align(original, revised, |a: &Unit, b: &Unit| match key {
        AlignKey::Exact => a.exact_hash() == b.exact_hash(),
        AlignKey::Content => a.content_hash() == b.content_hash(),
    });

    let mut result = Vec::with_capacity(items.len());
    let mut gap_deleted: Vec<Correlated> = Vec::new();
    let mut gap_inserted: Vec<Correlated> = Vec::new();

    for item in items {
        match item.tag {
            CorrelationTag::Deleted => gap_deleted.push(item),
            CorrelationTag::Inserted => gap_inserted.push(item),
            _ => {
                flush_gap(&mut gap_deleted, &mut gap_inserted, original, revised, &mut result);
                result.push(item);
            }
        }
    }
    flush_gap(&mut gap_deleted, &mut gap_inserted, original, revised, &mut result);
    result
}

fn flush_gap(
    deleted: &mut Vec<Correlated>,
    inserted: &mut Vec<Correlated>,
    original: &[Unit],
    revised: &[Unit],
    result: &mut Vec<Correlated>,
) {
    let mut consumed = vec![false; inserted.len()];

    for deletion in deleted.drain(..) {
        let Some(i) = deletion.original else {
            continue;
        };
        let kind = original[i].as_group().map(|group| group.kind);
        let partner = kind.and_then(|kind| {
            inserted.iter().enumerate().find(|(slot, insertion)| {
                !consumed[*slot]
                    && insertion.revised.is_some_and(|j| {
                        revised[j].as_group().is_some_and(|group| group.kind == kind)
                    })
            })
        });
        match partner {
            Some((slot, insertion)) => {
                consumed[slot] = true;
                let Some(j) = insertion.revised else {
                    continue;
                };
                result.push(Correlated::unknown(i, j));
            }
            None => result.push(deletion),
        }
    }

    for (slot, insertion) in inserted.drain(..).enumerate() {
        if !consumed[slot] {
            result.push(insertion);
        }
    }
}

fn emit_equal_unit<'u>(original: &'u Unit, revised: &'u Unit, out: &mut Vec<DiffEntry<'u>>) {
    match (original, revised) {
        (Unit::Atom(a), Unit::Atom(b)) => out.push(DiffEntry::equal(a, b)),
        _ => {
            let mut original_atoms = Vec::new();
            let mut revised_atoms = Vec::new();
            original.collect_atoms(&mut original_atoms);
            revised.collect_atoms(&mut revised_atoms);
            debug_assert_eq!(
                original_atoms.len(),
                revised_atoms.len(),
                "units with equal exact hashes must contain the same number of atoms"
            );
            let paired = original_atoms.len().min(revised_atoms.len());
            for k in 0..paired {
                out.push(DiffEntry::equal(original_atoms[k], revised_atoms[k]));
            }
            for &atom in &original_atoms[paired..] {
                out.push(DiffEntry::deleted(atom));
            }
            for &atom in &revised_atoms[paired..] {
                out.push(DiffEntry::inserted(atom));
            }
        }
    }
}

fn emit_unit<'u>(unit: &'u Unit, kind: DiffKind, out: &mut Vec<DiffEntry<'u>>) {
    let mut atoms = Vec::new();
    unit.collect_atoms(&mut atoms);
    for atom in atoms {
        out.push(match kind {
            DiffKind::Deleted => DiffEntry::deleted(atom),
            DiffKind::Inserted => DiffEntry::inserted(atom),
            DiffKind::Equal => unreachable!("equal entries always carry both sides"),
        });
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::tree::{Block, ElementArena, Paragraph, StableIdAllocator};
    use crate::units::UnitBuilder;

    use super::*;

    fn units_of(arena: &mut ElementArena, texts: &[&str]) -> Vec<Unit> {
        let mut ids = StableIdAllocator::new();
        let mut builder = UnitBuilder::new(arena, &mut ids, false);
        let blocks: Vec<Block> = texts
            .iter()
            .map(|text| Block::Paragraph(Paragraph::from_text(*text)))
            .collect();
        builder.build_blocks(&blocks, &mut Vec::new())
    }

    fn kinds(entries: &[DiffEntry<'_>]) -> (usize, usize, usize) {
        let equal = entries.iter().filter(|e| e.kind == DiffKind::Equal).count();
        let deleted = entries
            .iter()
            .filter(|e| e.kind == DiffKind::Deleted)
            .count();
        let inserted = entries
            .iter()
            .filter(|e| e.kind == DiffKind::Inserted)
            .count();
        (equal, deleted, inserted)
    }

    #[test]
    fn test_identical_sequences_produce_only_equal_entries() {
        let settings = CompareSettings::default();
        let mut arena = ElementArena::new();
        let original = units_of(&mut arena, &["one two three"]);
        let revised = units_of(&mut arena, &["one two three"]);

        let mut differ = StructuralDiffer::new(&settings);
        let mut entries = Vec::new();
        differ.diff_blocks(&original, &revised, &mut entries);

        let (equal, deleted, inserted) = kinds(&entries);
        assert_eq!((deleted, inserted), (0, 0));
        assert_eq!(equal, 4); // three words and the paragraph mark
    }

    #[test]
    fn test_single_word_edit_stays_embedded() {
        let settings = CompareSettings::default();
        let mut arena = ElementArena::new();
        let original = units_of(&mut arena, &["the quick brown fox jumps over the lazy dog today"]);
        let revised = units_of(&mut arena, &["the quick brown cat jumps over the lazy dog today"]);

        let mut differ = StructuralDiffer::new(&settings);
        let mut entries = Vec::new();
        differ.diff_blocks(&original, &revised, &mut entries);

        let (_, deleted, inserted) = kinds(&entries);
        assert_eq!((deleted, inserted), (1, 1));
    }

    #[test]
    fn test_unrelated_paragraphs_split_into_delete_and_insert() {
        let settings = CompareSettings::default();
        let mut arena = ElementArena::new();
        let original = units_of(&mut arena, &["alpha beta gamma delta"]);
        let revised = units_of(&mut arena, &["completely different words here"]);

        let mut differ = StructuralDiffer::new(&settings);
        let mut entries = Vec::new();
        differ.diff_blocks(&original, &revised, &mut entries);

        let (equal, deleted, inserted) = kinds(&entries);
        assert_eq!(equal, 0);
        assert_eq!(deleted, 5); // four words plus the paragraph mark
        assert_eq!(inserted, 5);
    }

    #[test]
    fn test_zero_threshold_forces_a_split() {
        let settings = CompareSettings {
            detail_threshold: 0.0,
            ..CompareSettings::default()
        };
        let mut arena = ElementArena::new();
        let original = units_of(&mut arena, &["one two three four five"]);
        let revised = units_of(&mut arena, &["one two three four six"]);

        let mut differ = StructuralDiffer::new(&settings);
        let mut entries = Vec::new();
        differ.diff_blocks(&original, &revised, &mut entries);

        let (equal, deleted, inserted) = kinds(&entries);
        assert_eq!(equal, 0);
        assert_eq!((deleted, inserted), (6, 6));
    }

    #[test]
    fn test_matched_paragraphs_are_unified() {
        let settings = CompareSettings::default();
        let mut arena = ElementArena::new();
        let original = units_of(&mut arena, &["shared words with one tweak"]);
        let revised = units_of(&mut arena, &["shared words with one change"]);

        let mut differ = StructuralDiffer::new(&settings);
        let mut entries = Vec::new();
        differ.diff_blocks(&original, &revised, &mut entries);

        let unification = differ.into_unification();
        let original_paragraph = original[0].as_group().unwrap().element;
        let revised_paragraph = revised[0].as_group().unwrap().element;
        assert_eq!(
            unification.get(&original_paragraph),
            Some(&revised_paragraph)
        );
    }
}
