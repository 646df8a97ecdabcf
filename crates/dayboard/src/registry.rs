use std::sync::Arc;

use dashmap::DashMap;

use crate::clock::Clock;
use crate::config::DailyLeaderboardConfig;
use crate::leaderboard::DailyLeaderboard;
use crate::leaderboard_storage::LeaderboardStorage;
use crate::metrics::LeaderboardMetrics;
use crate::types::Category;

/// Gate and cache for [`DailyLeaderboard`] handles.
///
/// A handle is created on the first valid lookup of a category and reused
/// from then on. The cache only grows; its size is bounded in practice by
/// the configured pattern lists, since unmatched categories never get in.
pub struct LeaderboardRegistry {
    handles: DashMap<String, Arc<DailyLeaderboard>>,
    storage: Arc<dyn LeaderboardStorage>,
    clock: Arc<dyn Clock>,
    metrics: Arc<LeaderboardMetrics>,
}

impl LeaderboardRegistry {
    pub fn new(storage: Arc<dyn LeaderboardStorage>, clock: Arc<dyn Clock>) -> Self {
        Self::with_metrics(storage, clock, Arc::new(LeaderboardMetrics::unregistered()))
    }

    pub fn with_metrics(
        storage: Arc<dyn LeaderboardStorage>,
        clock: Arc<dyn Clock>,
        metrics: Arc<LeaderboardMetrics>,
    ) -> Self {
        Self {
            handles: DashMap::new(),
            storage,
            clock,
            metrics,
        }
    }

    /// Get the leaderboard for `(language, mode, mode2)`.
    ///
    /// Returns `None` when the feature is disabled or any component fails
    /// to match its configured patterns. Never touches the store.
    pub fn get(
        &self,
        language: &str,
        mode: &str,
        mode2: &str,
        config: &DailyLeaderboardConfig,
    ) -> Option<Arc<DailyLeaderboard>> {
        if !config.enabled || !config.accepts(language, mode, mode2) {
            return None;
        }

        let category = Category::new(language, mode, mode2);
        let handle = self
            .handles
            .entry(category.key())
            .or_insert_with(|| {
                tracing::info!(category = %category, "creating daily leaderboard");
                self.metrics.handles.inc();
                Arc::new(DailyLeaderboard::new(
                    category.clone(),
                    Arc::clone(&self.storage),
                    Arc::clone(&self.clock),
                    Arc::clone(&self.metrics),
                ))
            })
            .clone();
        Some(handle)
    }

    pub fn metrics(&self) -> &Arc<LeaderboardMetrics> {
        &self.metrics
    }

    /// Number of cached handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
