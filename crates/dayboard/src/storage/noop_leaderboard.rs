use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::LeaderboardError;
use crate::leaderboard_storage::{LeaderboardStorage, PartitionWrite, SubmitOutcome};

/// Storage for deployments without a ranking store. Always unreachable, so
/// submissions are dropped and snapshots come back absent.
pub struct NoopLeaderboardStorage;

fn unavailable() -> LeaderboardError {
    LeaderboardError::StoreUnavailable {
        reason: "no leaderboard store configured".to_string(),
        source: None,
    }
}

#[async_trait]
impl LeaderboardStorage for NoopLeaderboardStorage {
    async fn is_available(&self) -> bool {
        false
    }

    async fn atomic_submit(
        &self,
        _write: &PartitionWrite,
    ) -> Result<SubmitOutcome, LeaderboardError> {
        Err(unavailable())
    }

    async fn read_all_results(
        &self,
        _results_key: &str,
    ) -> Result<BTreeMap<String, String>, LeaderboardError> {
        Err(unavailable())
    }
}
