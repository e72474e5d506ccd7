use std::collections::HashSet;
use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier attached once to a structural element of a source document and
/// carried through comparison for correlation and reconstruction.
///
/// Adapters may pre-assign ids (for instance when round-tripping a document
/// that has been compared before); elements without one get an id from the
/// per-comparison allocator.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StableId(pub u64);

impl Display for StableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Per-document id allocator. Pre-assigned ids are preserved the first time
/// they are seen; a duplicate pre-assigned id is treated as absent and the
/// element gets a fresh id instead of corrupting correlation.
#[derive(Debug, Default)]
pub(crate) struct StableIdAllocator {
    next: u64,
    seen: HashSet<StableId>,
}

impl StableIdAllocator {
    pub(crate) fn new() -> Self {
        Self {
            next: 1,
            seen: HashSet::new(),
        }
    }

    pub(crate) fn assign(&mut self, existing: Option<StableId>) -> StableId {
        if let Some(id) = existing
            && self.seen.insert(id)
        {
            self.next = self.next.max(id.0 + 1);
            return id;
        }
        loop {
            let id = StableId(self.next);
            self.next += 1;
            if self.seen.insert(id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_fresh_ids_are_sequential() {
        let mut allocator = StableIdAllocator::new();
        assert_eq!(allocator.assign(None), StableId(1));
        assert_eq!(allocator.assign(None), StableId(2));
    }

    #[test]
    fn test_pre_assigned_ids_are_preserved() {
        let mut allocator = StableIdAllocator::new();
        assert_eq!(allocator.assign(Some(StableId(7))), StableId(7));
        assert_eq!(allocator.assign(None), StableId(8));
    }

    #[test]
    fn test_duplicate_pre_assigned_id_gets_a_fresh_one() {
        let mut allocator = StableIdAllocator::new();
        assert_eq!(allocator.assign(Some(StableId(3))), StableId(3));
        let replacement = allocator.assign(Some(StableId(3)));
        assert_ne!(replacement, StableId(3));
        let next = allocator.assign(None);
        assert_ne!(next, replacement);
    }
}
