//! Decides when a table's rows need content-based realignment.
//!
//! A positional 1:1 mapping of equal-length row sequences is misleading once
//! rows have been reordered, deleted or inserted in equal measure: every row
//! below the edit point mismatches and the diff cascades across the whole
//! table. When enough rows mismatch positionally while their content hashes
//! still correlate across the two sides, the differ re-aligns rows by
//! content hash instead.

use std::collections::HashMap;

use crate::units::{Digest, Unit};

/// Tables below this row count keep positional matching: merged cells and
/// floating objects make small tables' row semantics too ambiguous to
/// realign safely.
const MIN_REALIGN_ROW_COUNT: usize = 7;

/// More than this fraction of positionally mismatched rows suggests the
/// positional mapping is wrong.
const MISMATCH_FRACTION: f64 = 1.0 / 3.0;

/// At least this fraction of rows must find a content-hash partner on the
/// other side for realignment to be worthwhile.
const CORRELATION_FRACTION: f64 = 0.5;

pub(crate) fn should_realign_rows(original: &[Unit], revised: &[Unit]) -> bool {
    if original.len() != revised.len() || original.len() < MIN_REALIGN_ROW_COUNT {
        return false;
    }
    let row_count = original.len();

    let mismatched = original
        .iter()
        .zip(revised)
        .filter(|(a, b)| a.exact_hash() != b.exact_hash())
        .count();
    if (mismatched as f64) <= row_count as f64 * MISMATCH_FRACTION {
        return false;
    }

    let mut revised_content: HashMap<Digest, usize> = HashMap::new();
    for row in revised {
        *revised_content.entry(row.content_hash()).or_insert(0) += 1;
    }
    let correlated = original
        .iter()
        .filter(|row| {
            revised_content
                .get_mut(&row.content_hash())
                .is_some_and(|remaining| {
                    if *remaining > 0 {
                        *remaining -= 1;
                        true
                    } else {
                        false
                    }
                })
        })
        .count();

    correlated as f64 >= row_count as f64 * CORRELATION_FRACTION
}

#[cfg(test)]
mod tests {
    use crate::tree::{Block, ElementArena, Row, StableIdAllocator, Table};
    use crate::units::UnitBuilder;

    use super::*;

    fn rows_of(texts: &[&str]) -> Vec<Unit> {
        let table = Table::new(texts.iter().map(|text| Row::from_texts([*text])).collect());
        let mut arena = ElementArena::new();
        let mut ids = StableIdAllocator::new();
        let mut builder = UnitBuilder::new(&mut arena, &mut ids, false);
        let units = builder.build_blocks(&[Block::Table(table)], &mut Vec::new());
        match units.into_iter().next() {
            Some(Unit::Group(group)) => group.children,
            _ => unreachable!("a table always builds into a group"),
        }
    }

    #[test]
    fn test_shifted_rows_trigger_realignment() {
        // Deleting row two and appending a new row keeps the count at eight
        // but shifts everything below the edit point.
        let original = rows_of(&["r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8"]);
        let revised = rows_of(&["r1", "r3", "r4", "r5", "r6", "r7", "r8", "new"]);
        assert!(should_realign_rows(&original, &revised));
    }

    #[test]
    fn test_small_tables_stay_positional() {
        let original = rows_of(&["r1", "r2", "r3"]);
        let revised = rows_of(&["r3", "r1", "r2"]);
        assert!(!should_realign_rows(&original, &revised));
    }

    #[test]
    fn test_differing_row_counts_stay_positional() {
        let original = rows_of(&["r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8"]);
        let revised = rows_of(&["r1", "r2", "r3", "r4", "r5", "r6", "r7"]);
        assert!(!should_realign_rows(&original, &revised));
    }

    #[test]
    fn test_mostly_equal_rows_stay_positional() {
        let original = rows_of(&["r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8"]);
        let revised = rows_of(&["r1", "r2", "r3", "r4", "r5", "r6", "r7", "edited"]);
        assert!(!should_realign_rows(&original, &revised));
    }

    #[test]
    fn test_unrelated_tables_stay_positional() {
        let original = rows_of(&["a1", "a2", "a3", "a4", "a5", "a6", "a7"]);
        let revised = rows_of(&["b1", "b2", "b3", "b4", "b5", "b6", "b7"]);
        assert!(!should_realign_rows(&original, &revised));
    }
}
