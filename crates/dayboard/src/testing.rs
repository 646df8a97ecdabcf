//! In-memory leaderboard harness for unit and integration testing.
//!
//! Bundles a [`MemoryLeaderboardStorage`], a [`ManualClock`] shared with it,
//! and a [`LeaderboardRegistry`] over both, so tests can move between days
//! and take the store offline without external dependencies.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use crate::clock::{Clock, ManualClock};
use crate::config::{DailyLeaderboardConfig, PatternList};
use crate::leaderboard::DailyLeaderboard;
use crate::registry::LeaderboardRegistry;
use crate::storage::memory_leaderboard::MemoryLeaderboardStorage;

/// A single-process leaderboard setup for testing.
///
/// # Example
///
/// ```ignore
/// let boards = TestLeaderboards::new();
/// let board = boards.board("english", "time", "60").unwrap();
/// board.submit("uid-1", &entry, boards.config()).await.unwrap();
/// boards.clock().advance_days(1);
/// assert_eq!(board.top_results().await.unwrap(), Some(vec![]));
/// ```
pub struct TestLeaderboards {
    clock: Arc<ManualClock>,
    storage: Arc<MemoryLeaderboardStorage>,
    registry: LeaderboardRegistry,
    config: DailyLeaderboardConfig,
}

impl TestLeaderboards {
    /// Enabled config accepting any category, clock at 2024-03-10T12:00:00Z.
    pub fn new() -> Self {
        Self::with_config(Self::default_config())
    }

    pub fn with_config(config: DailyLeaderboardConfig) -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 3, 10, 12, 0, 0)
            .single()
            .expect("valid start instant");
        let clock = Arc::new(ManualClock::at(start));
        let storage = Arc::new(MemoryLeaderboardStorage::with_clock(clock.clone()));
        let registry = LeaderboardRegistry::new(storage.clone(), clock.clone());
        Self {
            clock,
            storage,
            registry,
            config,
        }
    }

    /// Enabled, 10 results, 1 day expiry, every category accepted.
    pub fn default_config() -> DailyLeaderboardConfig {
        let any = || PatternList::new([".*"]).expect("valid pattern");
        DailyLeaderboardConfig {
            enabled: true,
            max_results: 10,
            leaderboard_expiration_time_in_days: 1.0,
            valid_language_patterns: any(),
            valid_mode_patterns: any(),
            valid_mode2_patterns: any(),
        }
    }

    /// Look up a board through the registry with the harness config.
    pub fn board(&self, language: &str, mode: &str, mode2: &str) -> Option<Arc<DailyLeaderboard>> {
        self.registry.get(language, mode, mode2, &self.config)
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn storage(&self) -> &MemoryLeaderboardStorage {
        &self.storage
    }

    pub fn registry(&self) -> &LeaderboardRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DailyLeaderboardConfig {
        &self.config
    }

    /// Current day boundary of the harness clock.
    pub fn today(&self) -> i64 {
        self.clock.current_day_boundary()
    }
}

impl Default for TestLeaderboards {
    fn default() -> Self {
        Self::new()
    }
}
