//! Content digests used to correlate comparison units.
//!
//! Every unit carries two SHA-256 digests: an exact hash that is sensitive to
//! ordering and formatting, used for whole-unit equality, and a content hash
//! covering only normalized text content, used to recognize repositioned or
//! reformatted units (table-row realignment, move detection).

use std::fmt;

use sha2::{Digest as _, Sha256};

/// A SHA-256 digest. Compared by value; rendered as a short hex prefix in
/// debug output.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Digest([u8; 32]);

impl Digest {
    /// Digest of the concatenation of `parts`, each length-prefixed so that
    /// part boundaries cannot be forged by adjacent content.
    pub(crate) fn of_parts<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(u64::try_from(part.len()).unwrap_or(u64::MAX).to_le_bytes());
            hasher.update(part);
        }
        Self(hasher.finalize().into())
    }

    pub(crate) fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", hex::encode(&self.0[..8]))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_same_parts_same_digest() {
        let a = Digest::of_parts([b"word".as_slice(), b"bold".as_slice()]);
        let b = Digest::of_parts([b"word".as_slice(), b"bold".as_slice()]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_part_boundaries_matter() {
        let joined = Digest::of_parts([b"ab".as_slice()]);
        let split = Digest::of_parts([b"a".as_slice(), b"b".as_slice()]);
        assert_ne!(joined, split);
    }

    #[test]
    fn test_debug_is_short_hex() {
        let digest = Digest::of_parts([b"x".as_slice()]);
        let rendered = format!("{digest:?}");
        assert!(rendered.starts_with("Digest("));
        assert_eq!(rendered.len(), "Digest(".len() + 16 + 1);
    }
}
