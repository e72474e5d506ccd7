use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of one revision-markup element. Strictly increasing within a
/// comparison; only the paired start/end brackets of one move range share an
/// id.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RevisionId(pub u64);

impl Display for RevisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Identifier shared by the source and destination halves of one detected
/// move.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoveGroupId(pub u64);

impl Display for MoveGroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "move{}", self.0)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevisionKind {
    Inserted,
    Deleted,
    Moved,
    FormatChanged,
}

/// Old and new property sets of a formatting-only change, plus the names of
/// the properties that differ.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatChange {
    pub old_properties: BTreeMap<String, String>,
    pub new_properties: BTreeMap<String, String>,
    pub changed_property_names: Vec<String>,
}

/// One entry of the flat revision list derived from the reconstructed tree.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Revision {
    pub author: String,
    pub date: DateTime<Utc>,
    pub kind: RevisionKind,
    /// The text the revision covers; empty for pure paragraph-mark or
    /// object revisions.
    pub text: String,
    pub move_group: Option<MoveGroupId>,
    /// `Some(true)` for the source half of a move, `Some(false)` for the
    /// destination, `None` for non-move revisions.
    pub is_move_source: Option<bool>,
    pub format_change: Option<FormatChange>,
}
