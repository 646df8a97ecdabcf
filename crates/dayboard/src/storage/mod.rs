pub mod memory_leaderboard;
pub mod noop_leaderboard;

#[cfg(feature = "sql")]
pub mod sql_leaderboard;
