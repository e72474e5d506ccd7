//! Pairs deletions with insertions that carry the same content elsewhere.
//!
//! A post-process over the flat diff stream: it only reclassifies entries
//! already produced by the structural differ and never alters the underlying
//! alignment. Only fully deleted and fully inserted paragraphs take part;
//! paragraphs reported with embedded word-level changes are settled and
//! never become move endpoints.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::settings::CompareSettings;
use crate::tree::ElementHandle;

use super::context::CompareContext;
use super::differ::{DiffEntry, DiffKind, MoveAssignment};

/// One side's candidate paragraph: its entries in the diff stream and the
/// word set used for similarity.
#[derive(Debug)]
struct CandidateParagraph {
    entry_indices: Vec<usize>,
    words: BTreeSet<String>,
    word_count: usize,
    /// Index of the paragraph's first entry; document order for tie-breaks.
    order: usize,
}

pub(crate) fn detect_moves(
    entries: &mut [DiffEntry<'_>],
    settings: &CompareSettings,
    ctx: &mut CompareContext,
) {
    let deleted = candidate_paragraphs(entries, DiffKind::Deleted);
    let inserted = candidate_paragraphs(entries, DiffKind::Inserted);

    let mut pairings: Vec<(f64, usize, usize)> = Vec::new();
    for (deleted_slot, deletion) in deleted.iter().enumerate() {
        if deletion.word_count < settings.move_minimum_word_count {
            continue;
        }
        for (inserted_slot, insertion) in inserted.iter().enumerate() {
            if insertion.word_count < settings.move_minimum_word_count {
                continue;
            }
            let similarity = jaccard(&deletion.words, &insertion.words);
            if similarity >= settings.move_similarity_threshold {
                pairings.push((similarity, deleted_slot, inserted_slot));
            }
        }
    }

    // Greedy by descending similarity, then document order on both sides.
    pairings.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| deleted[a.1].order.cmp(&deleted[b.1].order))
            .then_with(|| inserted[a.2].order.cmp(&inserted[b.2].order))
    });

    let mut deleted_consumed = vec![false; deleted.len()];
    let mut inserted_consumed = vec![false; inserted.len()];
    for (similarity, deleted_slot, inserted_slot) in pairings {
        if deleted_consumed[deleted_slot] || inserted_consumed[inserted_slot] {
            continue;
        }
        deleted_consumed[deleted_slot] = true;
        inserted_consumed[inserted_slot] = true;

        let group = ctx.next_move_group();
        debug!(%group, similarity, "pairing deletion and insertion as a move");
        for &index in &deleted[deleted_slot].entry_indices {
            entries[index].move_group = Some(MoveAssignment {
                group,
                is_source: true,
            });
        }
        for &index in &inserted[inserted_slot].entry_indices {
            entries[index].move_group = Some(MoveAssignment {
                group,
                is_source: false,
            });
        }
    }
}

/// Collects paragraphs every one of whose entries has the given kind.
fn candidate_paragraphs(entries: &[DiffEntry<'_>], kind: DiffKind) -> Vec<CandidateParagraph> {
    let mut by_paragraph: BTreeMap<ElementHandle, (CandidateParagraph, bool)> = BTreeMap::new();

    for (index, entry) in entries.iter().enumerate() {
        let atom = match kind {
            DiffKind::Deleted => entry.original,
            DiffKind::Inserted => entry.revised,
            DiffKind::Equal => None,
        };
        let Some(atom) = atom else {
            continue;
        };
        let Some(paragraph) = atom.paragraph() else {
            continue;
        };
        let (candidate, fully) = by_paragraph
            .entry(paragraph)
            .or_insert_with(|| {
                (
                    CandidateParagraph {
                        entry_indices: Vec::new(),
                        words: BTreeSet::new(),
                        word_count: 0,
                        order: index,
                    },
                    true,
                )
            });
        candidate.entry_indices.push(index);
        if atom.is_word {
            candidate.words.insert(atom.normalized.clone());
            candidate.word_count += 1;
        }
        if entry.kind != kind {
            *fully = false;
        }
    }

    let mut candidates: Vec<CandidateParagraph> = by_paragraph
        .into_values()
        .filter_map(|(candidate, fully)| fully.then_some(candidate))
        .collect();
    candidates.sort_by_key(|candidate| candidate.order);
    candidates
}

/// Jaccard similarity of two word sets; empty against empty counts as
/// dissimilar rather than identical.
fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|word| (*word).to_owned()).collect()
    }

    #[test]
    fn test_jaccard_identical() {
        let words = set(&["a", "b", "c"]);
        assert!((jaccard(&words, &words) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jaccard_disjoint() {
        assert!((jaccard(&set(&["a"]), &set(&["b"]))).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jaccard_partial_overlap() {
        // intersection 2, union 4
        let similarity = jaccard(&set(&["a", "b", "c"]), &set(&["b", "c", "d"]));
        assert!((similarity - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jaccard_of_empty_sets_is_zero() {
        assert!(jaccard(&BTreeSet::new(), &BTreeSet::new()).abs() < f64::EPSILON);
    }
}
