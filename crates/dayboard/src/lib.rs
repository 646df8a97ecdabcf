//! Per-day, per-category bounded leaderboards.
//!
//! A [`LeaderboardRegistry`] validates a `(language, mode, mode2)` category
//! against configured patterns and hands out a cached [`DailyLeaderboard`].
//! Each submission lands in the partition for the current UTC day, where one
//! atomic store operation upserts the submitter's entry, trims the board to
//! `max_results` and refreshes its expiry. Snapshots come back ordered by
//! wpm, then accuracy, then the earlier timestamp.
//!
//! The store is pluggable through [`LeaderboardStorage`]: an in-memory
//! implementation, a PostgreSQL one behind the `sql` feature, and a noop
//! one for deployments without a store.
//!
//! # Example
//!
//! ```text
//! let registry = LeaderboardRegistry::new(storage, Arc::new(SystemClock));
//! if let Some(board) = registry.get("english", "time", "60", &config) {
//!     board.submit(&uid, &entry, &config).await?;
//!     let top = board.top_results().await?;
//! }
//! ```

pub mod clock;
pub mod config;
pub mod entry;
pub mod error;
pub mod hash;
pub mod leaderboard;
pub mod leaderboard_storage;
pub mod metrics;
pub mod ranking;
pub mod registry;
pub mod storage;
pub mod testing;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{DailyLeaderboardConfig, PatternList};
pub use entry::Entry;
pub use error::LeaderboardError;
pub use leaderboard::DailyLeaderboard;
pub use leaderboard_storage::LeaderboardStorage;
pub use registry::LeaderboardRegistry;
