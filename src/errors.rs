use thiserror::Error;

use crate::revision::{MoveGroupId, RevisionId};

/// Error type for the compare API.
///
/// The `Invalid*` variants reject bad configuration synchronously, before any
/// comparison work begins. The remaining variants report violated internal
/// invariants: they indicate an implementation bug rather than bad input, and
/// abort the whole comparison instead of emitting a corrupt result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompareError {
    /// The detail threshold must lie within `0.0..=1.0`.
    #[error("invalid detail threshold {0}: must be within 0.0..=1.0")]
    InvalidDetailThreshold(f64),

    /// The move similarity threshold must lie within `0.0..=1.0`.
    #[error("invalid move similarity threshold {0}: must be within 0.0..=1.0")]
    InvalidMoveThreshold(f64),

    /// Two unrelated revision-markup elements ended up with the same id.
    #[error("duplicate revision id {id} in the reconstructed output")]
    DuplicateRevisionId { id: RevisionId },

    /// A move range bracket has no partner with the same id.
    #[error("unpaired move range bracket {id} for {group}")]
    UnpairedMoveRange { id: RevisionId, group: MoveGroupId },
}
