use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::LeaderboardError;
use crate::ranking::ScoreMarker;

/// One atomic write against a single leaderboard partition.
#[derive(Debug, Clone)]
pub struct PartitionWrite {
    /// Key of the ranking structure (submitter id -> score marker).
    pub scores_key: String,
    /// Key of the results structure (submitter id -> serialized entry).
    pub results_key: String,
    /// Upper bound on identities retained after the write.
    pub max_results: usize,
    /// Absolute expiry of both structures, epoch seconds.
    pub expire_at_secs: i64,
    pub submitter_id: String,
    pub marker: ScoreMarker,
    /// Serialized [`Entry`](crate::entry::Entry).
    pub record: String,
}

/// What an atomic submit did to the partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Identities left in the partition.
    pub retained: usize,
    /// Identities evicted by the trim.
    pub evicted: usize,
}

/// Shared ranking store backing the daily leaderboards.
#[async_trait]
pub trait LeaderboardStorage: Send + Sync {
    /// Whether the store can currently be reached.
    async fn is_available(&self) -> bool;

    /// Upsert the submitter's score marker and record, evict the
    /// lowest-ranked identities from both structures until at most
    /// `max_results` remain, then set both structures to expire at
    /// `expire_at_secs`.
    ///
    /// The whole operation is indivisible with respect to any other
    /// `atomic_submit` on the same partition. On error nothing is applied.
    async fn atomic_submit(&self, write: &PartitionWrite)
        -> Result<SubmitOutcome, LeaderboardError>;

    /// Every record in a results structure, keyed by submitter id.
    /// A missing or expired key yields an empty map.
    async fn read_all_results(
        &self,
        results_key: &str,
    ) -> Result<BTreeMap<String, String>, LeaderboardError>;
}
