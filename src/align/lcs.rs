//! LCS alignment primitive.
//!
//! Dynamic-programming longest-common-subsequence over a caller-supplied
//! equality predicate, with common prefix/suffix trimming.
//!
//! * time: `O(NM)`
//! * space: `O(NM)`
//!
//! Ties are broken by preferring the earliest unmatched position of the
//! original sequence, so identical inputs always produce identical output.

use super::correlated::Correlated;

/// Aligns `original` against `revised`, returning one [`Correlated`] item per
/// input element. The output only uses the `Equal`, `Deleted` and `Inserted`
/// tags; pairing related-but-unequal items is the differ's business.
pub(crate) fn align<T, F>(original: &[T], revised: &[T], eq: F) -> Vec<Correlated>
where
    F: Fn(&T, &T) -> bool,
{
    let prefix = common_prefix_len(original, revised, &eq);
    let suffix = common_suffix_len(&original[prefix..], &revised[prefix..], &eq);

    let middle_original = &original[prefix..original.len() - suffix];
    let middle_revised = &revised[prefix..revised.len() - suffix];

    let mut result = Vec::with_capacity(original.len().max(revised.len()));
    for i in 0..prefix {
        result.push(Correlated::equal(i, i));
    }

    align_middle(middle_original, middle_revised, prefix, &eq, &mut result);

    for k in 0..suffix {
        result.push(Correlated::equal(
            original.len() - suffix + k,
            revised.len() - suffix + k,
        ));
    }

    result
}

fn align_middle<T, F>(
    original: &[T],
    revised: &[T],
    offset: usize,
    eq: &F,
    result: &mut Vec<Correlated>,
) where
    F: Fn(&T, &T) -> bool,
{
    let n = original.len();
    let m = revised.len();
    if n == 0 && m == 0 {
        return;
    }

    // lengths[i * (m + 1) + j] = LCS length of original[i..] and revised[j..]
    let mut lengths = vec![0_u32; (n + 1) * (m + 1)];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lengths[i * (m + 1) + j] = if eq(&original[i], &revised[j]) {
                lengths[(i + 1) * (m + 1) + j + 1] + 1
            } else {
                lengths[(i + 1) * (m + 1) + j].max(lengths[i * (m + 1) + j + 1])
            };
        }
    }

    let mut i = 0;
    let mut j = 0;
    while i < n && j < m {
        if eq(&original[i], &revised[j]) {
            result.push(Correlated::equal(offset + i, offset + j));
            i += 1;
            j += 1;
        } else if lengths[(i + 1) * (m + 1) + j] >= lengths[i * (m + 1) + j + 1] {
            result.push(Correlated::deleted(offset + i));
            i += 1;
        } else {
            result.push(Correlated::inserted(offset + j));
            j += 1;
        }
    }
    while i < n {
        result.push(Correlated::deleted(offset + i));
        i += 1;
    }
    while j < m {
        result.push(Correlated::inserted(offset + j));
        j += 1;
    }
}

fn common_prefix_len<T, F>(original: &[T], revised: &[T], eq: &F) -> usize
where
    F: Fn(&T, &T) -> bool,
{
    original
        .iter()
        .zip(revised)
        .take_while(|(a, b)| eq(a, b))
        .count()
}

fn common_suffix_len<T, F>(original: &[T], revised: &[T], eq: &F) -> usize
where
    F: Fn(&T, &T) -> bool,
{
    original
        .iter()
        .rev()
        .zip(revised.iter().rev())
        .take_while(|(a, b)| eq(a, b))
        .count()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use crate::align::correlated::CorrelationTag;

    use super::*;

    fn tags(items: &[Correlated]) -> Vec<CorrelationTag> {
        items.iter().map(|item| item.tag).collect()
    }

    #[test]
    fn test_empty() {
        assert_eq!(align::<u8, _>(&[], &[], |a, b| a == b), vec![]);
    }

    #[test]
    fn test_identical() {
        let items = align(&[1, 2, 3], &[1, 2, 3], |a, b| a == b);
        assert_eq!(tags(&items), vec![CorrelationTag::Equal; 3]);
    }

    #[test]
    fn test_substitution_in_the_middle() {
        let items = align(&[1, 2, 3], &[1, 9, 3], |a, b| a == b);
        assert_eq!(
            tags(&items),
            vec![
                CorrelationTag::Equal,
                CorrelationTag::Deleted,
                CorrelationTag::Inserted,
                CorrelationTag::Equal,
            ]
        );
    }

    #[test]
    fn test_tie_prefers_deleting_the_earlier_original_position() {
        // [1,2,3] vs [2,1,3] has two equally long subsequences; the
        // deterministic choice deletes 1 first rather than inserting 2.
        let items = align(&[1, 2, 3], &[2, 1, 3], |a, b| a == b);
        assert_eq!(
            items[0],
            Correlated::deleted(0),
            "tie must consume the original side first"
        );
        assert_eq!(tags(&items)[1], CorrelationTag::Equal);
    }

    #[test]
    fn test_one_sided_inputs() {
        let deleted = align(&[1, 2], &[], |a, b| a == b);
        assert_eq!(tags(&deleted), vec![CorrelationTag::Deleted; 2]);
        let inserted = align(&[], &[1, 2], |a, b| a == b);
        assert_eq!(tags(&inserted), vec![CorrelationTag::Inserted; 2]);
    }

    proptest! {
        /// Alignment is total: every input index appears in exactly one item
        /// and in increasing order on both sides.
        #[test]
        fn test_alignment_covers_every_index(
            original in proptest::collection::vec(0_u8..6, 0..40),
            revised in proptest::collection::vec(0_u8..6, 0..40),
        ) {
            let items = align(&original, &revised, |a, b| a == b);

            let original_indices: Vec<usize> =
                items.iter().filter_map(|item| item.original).collect();
            let revised_indices: Vec<usize> =
                items.iter().filter_map(|item| item.revised).collect();

            prop_assert_eq!(&original_indices, &(0..original.len()).collect::<Vec<_>>());
            prop_assert_eq!(&revised_indices, &(0..revised.len()).collect::<Vec<_>>());
        }

        /// Aligning a sequence with itself yields only `Equal` items.
        #[test]
        fn test_self_alignment_is_all_equal(
            sequence in proptest::collection::vec(0_u8..6, 0..40),
        ) {
            let items = align(&sequence, &sequence, |a, b| a == b);
            prop_assert!(items.iter().all(|item| item.tag == CorrelationTag::Equal));
        }
    }
}
