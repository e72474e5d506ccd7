mod context;
mod differ;
mod moves;
mod tables;

use std::ops::Range;

use tracing::debug;

pub(crate) use context::CompareContext;
pub(crate) use differ::{DiffEntry, DiffKind, MoveAssignment, StructuralDiffer};

use moves::detect_moves;

use crate::errors::CompareError;
use crate::reconstruct::{
    Assembler, RevisedDocument, RevisedPart, extract_revisions, verify_revision_ids,
};
use crate::revision::Revision;
use crate::settings::CompareSettings;
use crate::tree::{Document, ElementArena, StableIdAllocator};
use crate::units::{Unit, UnitBuilder};

/// Everything one comparison produces: the reconstructed tree with revision
/// markup, ready for re-serialization by the adapter, and the flat revision
/// list derived from it.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub document: RevisedDocument,
    pub revisions: Vec<Revision>,
}

/// Compares two documents and annotates every difference as an insertion,
/// deletion, move or formatting-only change.
///
/// Both inputs are abstract block trees produced by an external adapter; the
/// engine itself never touches a native file format. Every reachable part —
/// body, headers, footers, footnotes, endnotes — is compared, and all parts
/// share one revision-id sequence.
///
/// The comparison is all-or-nothing: invalid settings and violated internal
/// invariants abort with an error instead of producing a partial or corrupt
/// result.
///
/// ```
/// use redmark::{Block, CompareSettings, Document, Paragraph, RevisionKind, compare};
///
/// let original = Document::with_body(vec![Block::Paragraph(Paragraph::from_text(
///     "Comparing two documents by hand is hard!",
/// ))]);
/// let revised = Document::with_body(vec![Block::Paragraph(Paragraph::from_text(
///     "Comparing two documents by hand is easy!",
/// ))]);
///
/// let comparison = compare(&original, &revised, &CompareSettings::default())?;
/// let kinds: Vec<RevisionKind> = comparison.revisions.iter().map(|r| r.kind).collect();
/// assert_eq!(kinds, vec![RevisionKind::Deleted, RevisionKind::Inserted]);
/// # Ok::<(), redmark::CompareError>(())
/// ```
pub fn compare(
    original: &Document,
    revised: &Document,
    settings: &CompareSettings,
) -> Result<Comparison, CompareError> {
    settings.validate()?;

    let mut ctx = CompareContext::new();
    let mut arena = ElementArena::new();

    let original_units = build_units(
        original,
        &mut arena,
        &mut ctx.original_ids,
        settings.case_insensitive,
    );
    let revised_units = build_units(
        revised,
        &mut arena,
        &mut ctx.revised_ids,
        settings.case_insensitive,
    );
    debug!(elements = arena.len(), "registered block elements");

    let mut differ = StructuralDiffer::new(settings);
    let mut entries: Vec<DiffEntry<'_>> = Vec::new();

    let body_range = {
        let start = entries.len();
        differ.diff_blocks(&original_units.body, &revised_units.body, &mut entries);
        start..entries.len()
    };

    let mut header_ranges: Vec<(String, Range<usize>)> = Vec::new();
    for (name, original_part, revised_part) in
        pair_parts(&original_units.headers, &revised_units.headers)
    {
        let start = entries.len();
        differ.diff_blocks(original_part, revised_part, &mut entries);
        header_ranges.push((name, start..entries.len()));
    }
    let mut footer_ranges: Vec<(String, Range<usize>)> = Vec::new();
    for (name, original_part, revised_part) in
        pair_parts(&original_units.footers, &revised_units.footers)
    {
        let start = entries.len();
        differ.diff_blocks(original_part, revised_part, &mut entries);
        footer_ranges.push((name, start..entries.len()));
    }

    let footnote_range = {
        let start = entries.len();
        diff_notes(
            &mut differ,
            &original_units.footnotes,
            &revised_units.footnotes,
            &mut entries,
        );
        start..entries.len()
    };
    let endnote_range = {
        let start = entries.len();
        diff_notes(
            &mut differ,
            &original_units.endnotes,
            &revised_units.endnotes,
            &mut entries,
        );
        start..entries.len()
    };

    if settings.detect_moves {
        detect_moves(&mut entries, settings, &mut ctx);
    }

    let unification = differ.into_unification();
    let mut assembler = Assembler::new(&arena, &unification, settings, &mut ctx);
    let document = RevisedDocument {
        body: assembler.assemble_blocks(&entries[body_range]),
        headers: header_ranges
            .into_iter()
            .map(|(name, range)| RevisedPart {
                name,
                blocks: assembler.assemble_blocks(&entries[range]),
            })
            .collect(),
        footers: footer_ranges
            .into_iter()
            .map(|(name, range)| RevisedPart {
                name,
                blocks: assembler.assemble_blocks(&entries[range]),
            })
            .collect(),
        footnotes: assembler.assemble_notes(&entries[footnote_range]),
        endnotes: assembler.assemble_notes(&entries[endnote_range]),
    };

    let verified = verify_revision_ids(&document);
    debug_assert!(
        verified.is_ok(),
        "revision id invariants violated: {verified:?}"
    );
    verified?;

    let revisions = extract_revisions(&document);
    debug!(revisions = revisions.len(), "comparison complete");
    Ok(Comparison {
        document,
        revisions,
    })
}

struct DocumentUnits {
    body: Vec<Unit>,
    headers: Vec<(String, Vec<Unit>)>,
    footers: Vec<(String, Vec<Unit>)>,
    footnotes: Vec<Unit>,
    endnotes: Vec<Unit>,
}

fn build_units(
    document: &Document,
    arena: &mut ElementArena,
    ids: &mut StableIdAllocator,
    case_insensitive: bool,
) -> DocumentUnits {
    let mut builder = UnitBuilder::new(arena, ids, case_insensitive);
    DocumentUnits {
        body: builder.build_blocks(&document.body, &mut Vec::new()),
        headers: document
            .headers
            .iter()
            .map(|part| {
                (
                    part.name.clone(),
                    builder.build_blocks(&part.blocks, &mut Vec::new()),
                )
            })
            .collect(),
        footers: document
            .footers
            .iter()
            .map(|part| {
                (
                    part.name.clone(),
                    builder.build_blocks(&part.blocks, &mut Vec::new()),
                )
            })
            .collect(),
        footnotes: document
            .footnotes
            .iter()
            .map(|note| builder.build_note(note, &mut Vec::new()))
            .collect(),
        endnotes: document
            .endnotes
            .iter()
            .map(|note| builder.build_note(note, &mut Vec::new()))
            .collect(),
    }
}

/// Pairs named parts by name; an unpaired part compares against an empty
/// peer, so its content surfaces as wholesale insertions or deletions
/// instead of being silently skipped.
fn pair_parts<'u>(
    original: &'u [(String, Vec<Unit>)],
    revised: &'u [(String, Vec<Unit>)],
) -> Vec<(String, &'u [Unit], &'u [Unit])> {
    const EMPTY: &[Unit] = &[];
    let mut consumed = vec![false; revised.len()];
    let mut pairs = Vec::new();

    for (name, units) in original {
        let partner = revised
            .iter()
            .enumerate()
            .find(|(slot, (revised_name, _))| !consumed[*slot] && revised_name == name);
        match partner {
            Some((slot, (_, revised_units))) => {
                consumed[slot] = true;
                pairs.push((name.clone(), units.as_slice(), revised_units.as_slice()));
            }
            None => pairs.push((name.clone(), units.as_slice(), EMPTY)),
        }
    }
    for (slot, (name, units)) in revised.iter().enumerate() {
        if !consumed[slot] {
            pairs.push((name.clone(), EMPTY, units.as_slice()));
        }
    }
    pairs
}

/// Notes pair by position; a surplus note on either side compares against
/// nothing and surfaces wholesale.
fn diff_notes<'u>(
    differ: &mut StructuralDiffer<'_>,
    original: &'u [Unit],
    revised: &'u [Unit],
    entries: &mut Vec<DiffEntry<'u>>,
) {
    let count = original.len().max(revised.len());
    for index in 0..count {
        let original_note = original.get(index).map_or(&[] as &[Unit], std::slice::from_ref);
        let revised_note = revised.get(index).map_or(&[] as &[Unit], std::slice::from_ref);
        differ.diff_blocks(original_note, revised_note, entries);
    }
}
