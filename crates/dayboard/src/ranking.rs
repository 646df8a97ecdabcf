//! Ranking order shared by trimming and presentation.
//!
//! Higher `wpm` ranks first, then higher `accuracy`, then the earlier
//! `timestamp`. Floats compare with [`f64::total_cmp`] so the order is total.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::entry::Entry;

/// The ranking-relevant projection of an [`Entry`], stored alongside each
/// submitter in the ranking structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreMarker {
    pub wpm: f64,
    pub accuracy: f64,
    pub timestamp: i64,
}

impl ScoreMarker {
    /// `Less` means `self` ranks above `other`.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .wpm
            .total_cmp(&self.wpm)
            .then_with(|| other.accuracy.total_cmp(&self.accuracy))
            .then_with(|| self.timestamp.cmp(&other.timestamp))
    }
}

/// Compare two entries for leaderboard order. `Less` means `a` ranks first.
pub fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    a.marker().rank_cmp(&b.marker())
}

/// Sort entries best-first. Stable, so full ties keep their input order.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(compare_entries);
}
