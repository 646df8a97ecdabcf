//! SQL-backed leaderboard storage using PostgreSQL via sqlx.
//!
//! Tables:
//! - `daily_leaderboard_scores`: ranking structure, one row per submitter per partition
//! - `daily_leaderboard_results`: serialized entries keyed the same way
//!
//! PostgreSQL has no key TTL, so every row carries `expire_at`. Expired rows
//! are invisible to reads, are cleared from a partition before it is written
//! again, and can be removed in bulk with [`SqlLeaderboardStorage::purge_expired`].
//!
//! This module is only available when the `sql` feature is enabled.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::Row;

use crate::error::LeaderboardError;
use crate::hash::partition_lock_key;
use crate::leaderboard_storage::{LeaderboardStorage, PartitionWrite, SubmitOutcome};

/// Classify a sqlx error: connection-level failures mean the store is
/// unreachable, everything else is a rejected operation.
fn store_error(context: &str, e: sqlx::Error) -> LeaderboardError {
    let reason = format!("{context}: {e}");
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => LeaderboardError::StoreUnavailable {
            reason,
            source: Some(Box::new(e)),
        },
        _ => LeaderboardError::Persistence {
            reason,
            source: Some(Box::new(e)),
        },
    }
}

/// PostgreSQL-backed leaderboard storage.
pub struct SqlLeaderboardStorage {
    pool: PgPool,
}

impl SqlLeaderboardStorage {
    /// Create a new SQL leaderboard storage with the given connection pool.
    ///
    /// Call [`migrate()`](Self::migrate) before first use.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations. Safe to call multiple times.
    pub async fn migrate(&self) -> Result<(), LeaderboardError> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(|e| LeaderboardError::Persistence {
                reason: format!("migration failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        tracing::info!("daily leaderboard migrations applied");
        Ok(())
    }

    /// Delete every expired row from both tables. Returns the number of rows removed.
    pub async fn purge_expired(&self) -> Result<u64, LeaderboardError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error("begin transaction failed", e))?;

        let scores = sqlx::query("DELETE FROM daily_leaderboard_scores WHERE expire_at <= NOW()")
            .execute(&mut *tx)
            .await
            .map_err(|e| store_error("purge expired scores failed", e))?
            .rows_affected();
        let results = sqlx::query("DELETE FROM daily_leaderboard_results WHERE expire_at <= NOW()")
            .execute(&mut *tx)
            .await
            .map_err(|e| store_error("purge expired results failed", e))?
            .rows_affected();

        tx.commit()
            .await
            .map_err(|e| store_error("commit transaction failed", e))?;

        let purged = scores + results;
        if purged > 0 {
            tracing::info!(scores, results, "purged expired leaderboard rows");
        }
        Ok(purged)
    }
}

#[async_trait]
impl LeaderboardStorage for SqlLeaderboardStorage {
    async fn is_available(&self) -> bool {
        !self.pool.is_closed()
    }

    async fn atomic_submit(
        &self,
        write: &PartitionWrite,
    ) -> Result<SubmitOutcome, LeaderboardError> {
        let expire_at = DateTime::<Utc>::from_timestamp(write.expire_at_secs, 0).ok_or_else(|| {
            LeaderboardError::Persistence {
                reason: format!("expiry out of range: {}", write.expire_at_secs),
                source: None,
            }
        })?;
        let max_results = i64::try_from(write.max_results).unwrap_or(i64::MAX);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error("begin transaction failed", e))?;

        // Serializes writers to this partition until commit.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(partition_lock_key(&write.scores_key))
            .execute(&mut *tx)
            .await
            .map_err(|e| store_error("partition lock failed", e))?;

        // An expired partition behaves like a missing key.
        sqlx::query(
            "DELETE FROM daily_leaderboard_scores WHERE board_key = $1 AND expire_at <= NOW()",
        )
        .bind(&write.scores_key)
        .execute(&mut *tx)
        .await
        .map_err(|e| store_error("clear expired scores failed", e))?;
        sqlx::query(
            "DELETE FROM daily_leaderboard_results WHERE board_key = $1 AND expire_at <= NOW()",
        )
        .bind(&write.results_key)
        .execute(&mut *tx)
        .await
        .map_err(|e| store_error("clear expired results failed", e))?;

        sqlx::query(
            r#"
            INSERT INTO daily_leaderboard_scores
                (board_key, member, wpm, accuracy, submitted_at, expire_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (board_key, member) DO UPDATE
                SET wpm = EXCLUDED.wpm,
                    accuracy = EXCLUDED.accuracy,
                    submitted_at = EXCLUDED.submitted_at
            "#,
        )
        .bind(&write.scores_key)
        .bind(&write.submitter_id)
        .bind(write.marker.wpm)
        .bind(write.marker.accuracy)
        .bind(write.marker.timestamp)
        .bind(expire_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| store_error("upsert score failed", e))?;

        sqlx::query(
            r#"
            INSERT INTO daily_leaderboard_results (board_key, member, record, expire_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (board_key, member) DO UPDATE SET record = EXCLUDED.record
            "#,
        )
        .bind(&write.results_key)
        .bind(&write.submitter_id)
        .bind(&write.record)
        .bind(expire_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| store_error("upsert result failed", e))?;

        let evicted: Vec<String> = sqlx::query(
            r#"
            DELETE FROM daily_leaderboard_scores
            WHERE board_key = $1 AND member IN (
                SELECT member FROM daily_leaderboard_scores
                WHERE board_key = $1
                ORDER BY wpm DESC, accuracy DESC, submitted_at ASC, member ASC
                OFFSET $2
            )
            RETURNING member
            "#,
        )
        .bind(&write.scores_key)
        .bind(max_results)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| store_error("trim scores failed", e))?
        .iter()
        .map(|row| row.try_get("member"))
        .collect::<Result<_, _>>()
        .map_err(|e| store_error("trim scores: failed to read 'member' column", e))?;

        if !evicted.is_empty() {
            sqlx::query(
                "DELETE FROM daily_leaderboard_results WHERE board_key = $1 AND member = ANY($2)",
            )
            .bind(&write.results_key)
            .bind(&evicted)
            .execute(&mut *tx)
            .await
            .map_err(|e| store_error("trim results failed", e))?;
        }

        sqlx::query("UPDATE daily_leaderboard_scores SET expire_at = $2 WHERE board_key = $1")
            .bind(&write.scores_key)
            .bind(expire_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| store_error("expire scores failed", e))?;
        sqlx::query("UPDATE daily_leaderboard_results SET expire_at = $2 WHERE board_key = $1")
            .bind(&write.results_key)
            .bind(expire_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| store_error("expire results failed", e))?;

        let retained: i64 =
            sqlx::query("SELECT COUNT(*) AS n FROM daily_leaderboard_scores WHERE board_key = $1")
                .bind(&write.scores_key)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| store_error("count scores failed", e))?
                .try_get("n")
                .map_err(|e| store_error("count scores: failed to read 'n' column", e))?;

        tx.commit()
            .await
            .map_err(|e| store_error("commit transaction failed", e))?;

        Ok(SubmitOutcome {
            retained: usize::try_from(retained).unwrap_or(0),
            evicted: evicted.len(),
        })
    }

    async fn read_all_results(
        &self,
        results_key: &str,
    ) -> Result<BTreeMap<String, String>, LeaderboardError> {
        let rows = sqlx::query(
            "SELECT member, record FROM daily_leaderboard_results
             WHERE board_key = $1 AND expire_at > NOW()",
        )
        .bind(results_key)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("read results failed", e))?;

        let mut results = BTreeMap::new();
        for row in rows {
            let member: String = row
                .try_get("member")
                .map_err(|e| store_error("read results: failed to read 'member' column", e))?;
            let record: String = row
                .try_get("record")
                .map_err(|e| store_error("read results: failed to read 'record' column", e))?;
            results.insert(member, record);
        }
        Ok(results)
    }
}
