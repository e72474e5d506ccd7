use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CompareError;

/// Per-call configuration of one comparison. There is no global or
/// environment state; two comparisons with different settings can run
/// concurrently on separate threads.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CompareSettings {
    /// Author recorded on every produced revision.
    pub author: String,
    /// Timestamp recorded on every produced revision.
    pub date: DateTime<Utc>,
    /// Changed-atom fraction within one paragraph-level alignment at or
    /// above which two related paragraphs are reported as a full
    /// delete+insert instead of one paragraph with embedded word-level
    /// changes. Must lie within `0.0..=1.0`.
    pub detail_threshold: f64,
    /// Case-fold text for comparison and move detection.
    pub case_insensitive: bool,
    /// Reclassify matching deletion/insertion pairs as moves.
    pub detect_moves: bool,
    /// Minimum Jaccard word-set similarity for a move pairing. Must lie
    /// within `0.0..=1.0`.
    pub move_similarity_threshold: f64,
    /// Minimum number of words on each side of a move pairing.
    pub move_minimum_word_count: usize,
}

impl CompareSettings {
    #[must_use]
    pub fn new(author: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            author: author.into(),
            date,
            ..Self::default()
        }
    }

    /// Rejects out-of-range thresholds before any comparison work begins.
    pub fn validate(&self) -> Result<(), CompareError> {
        if !(0.0..=1.0).contains(&self.detail_threshold) {
            return Err(CompareError::InvalidDetailThreshold(self.detail_threshold));
        }
        if !(0.0..=1.0).contains(&self.move_similarity_threshold) {
            return Err(CompareError::InvalidMoveThreshold(
                self.move_similarity_threshold,
            ));
        }
        Ok(())
    }
}

impl Default for CompareSettings {
    fn default() -> Self {
        Self {
            author: "redmark".to_owned(),
            date: Utc::now(),
            detail_threshold: 0.15,
            case_insensitive: false,
            detect_moves: true,
            move_similarity_threshold: 0.8,
            move_minimum_word_count: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(CompareSettings::default().validate().is_ok());
    }

    #[test_case(-0.1; "negative")]
    #[test_case(1.1; "above one")]
    #[test_case(f64::NAN; "not a number")]
    fn test_detail_threshold_is_rejected(threshold: f64) {
        let settings = CompareSettings {
            detail_threshold: threshold,
            ..CompareSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(CompareError::InvalidDetailThreshold(_))
        ));
    }

    #[test_case(-0.1; "negative")]
    #[test_case(2.0; "above one")]
    fn test_move_threshold_is_rejected(threshold: f64) {
        let settings = CompareSettings {
            move_similarity_threshold: threshold,
            ..CompareSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(CompareError::InvalidMoveThreshold(_))
        ));
    }
}
