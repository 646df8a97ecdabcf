//! Leaderboard handle for a single category.
//!
//! A [`DailyLeaderboard`] carries no per-day state. Every call looks up the
//! current day boundary and addresses the partition for that day, so a
//! handle can be cached for the life of the process.

use std::sync::Arc;

use crate::clock::{Clock, MILLIS_PER_DAY};
use crate::config::DailyLeaderboardConfig;
use crate::entry::Entry;
use crate::error::LeaderboardError;
use crate::leaderboard_storage::{LeaderboardStorage, PartitionWrite};
use crate::metrics::LeaderboardMetrics;
use crate::ranking::sort_entries;
use crate::types::{Category, KeyPrefix, Structure};

/// Absolute expiry (epoch seconds) of the partition starting at `day_boundary`.
pub fn expire_at_secs(day_boundary: i64, expiration_days: f64) -> i64 {
    let expires_at_ms = day_boundary as f64 + expiration_days * MILLIS_PER_DAY as f64;
    (expires_at_ms / 1000.0).floor() as i64
}

/// One category's daily leaderboard.
pub struct DailyLeaderboard {
    category: Category,
    scores_prefix: KeyPrefix,
    results_prefix: KeyPrefix,
    storage: Arc<dyn LeaderboardStorage>,
    clock: Arc<dyn Clock>,
    metrics: Arc<LeaderboardMetrics>,
}

impl DailyLeaderboard {
    pub fn new(
        category: Category,
        storage: Arc<dyn LeaderboardStorage>,
        clock: Arc<dyn Clock>,
        metrics: Arc<LeaderboardMetrics>,
    ) -> Self {
        Self {
            scores_prefix: KeyPrefix::new(Structure::Scores, &category),
            results_prefix: KeyPrefix::new(Structure::Results, &category),
            category,
            storage,
            clock,
            metrics,
        }
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Ranking structure key for the partition starting at `day_boundary`.
    pub fn scores_key(&self, day_boundary: i64) -> String {
        self.scores_prefix.partition(day_boundary)
    }

    /// Results structure key for the partition starting at `day_boundary`.
    pub fn results_key(&self, day_boundary: i64) -> String {
        self.results_prefix.partition(day_boundary)
    }

    /// Record `entry` as `submitter_id`'s result for today.
    ///
    /// Does nothing when the feature is disabled or the store cannot be
    /// reached. A later submission from the same id replaces the earlier
    /// one. Errors when `config` fails [`DailyLeaderboardConfig::validate`],
    /// when `entry` carries a non-finite score, or when the store rejects
    /// the write.
    pub async fn submit(
        &self,
        submitter_id: &str,
        entry: &Entry,
        config: &DailyLeaderboardConfig,
    ) -> Result<(), LeaderboardError> {
        if !config.enabled {
            self.metrics.submissions_skipped.inc();
            return Ok(());
        }
        if let Err(e) = config.validate().and_then(|()| entry.validate()) {
            self.metrics.submission_failures.inc();
            tracing::warn!(category = %self.category, submitter_id, error = %e, "leaderboard submission refused");
            return Err(e);
        }
        if !self.storage.is_available().await {
            self.metrics.submissions_skipped.inc();
            tracing::debug!(category = %self.category, "leaderboard store unavailable, submission dropped");
            return Ok(());
        }

        let day = self.clock.current_day_boundary();
        let write = PartitionWrite {
            scores_key: self.scores_key(day),
            results_key: self.results_key(day),
            max_results: config.max_results,
            expire_at_secs: expire_at_secs(day, config.leaderboard_expiration_time_in_days),
            submitter_id: submitter_id.to_string(),
            marker: entry.marker(),
            record: entry.to_record()?,
        };

        match self.storage.atomic_submit(&write).await {
            Ok(outcome) => {
                self.metrics.submissions.inc();
                self.metrics.evictions.inc_by(outcome.evicted as u64);
                tracing::debug!(
                    category = %self.category,
                    day,
                    submitter_id,
                    retained = outcome.retained,
                    evicted = outcome.evicted,
                    "leaderboard submission applied"
                );
                Ok(())
            }
            Err(e) if e.is_unavailable() => {
                self.metrics.submissions_skipped.inc();
                tracing::warn!(category = %self.category, error = %e, "leaderboard store unreachable, submission dropped");
                Ok(())
            }
            Err(e) => {
                self.metrics.submission_failures.inc();
                tracing::warn!(category = %self.category, submitter_id, error = %e, "leaderboard submission failed");
                Err(e)
            }
        }
    }

    /// Today's entries, best first.
    ///
    /// `Ok(None)` means the store could not be reached; an empty partition
    /// gives `Ok(Some(vec![]))`. Records that fail to parse are skipped.
    pub async fn top_results(&self) -> Result<Option<Vec<Entry>>, LeaderboardError> {
        if !self.storage.is_available().await {
            return Ok(None);
        }

        let results_key = self.results_key(self.clock.current_day_boundary());
        let records = match self.storage.read_all_results(&results_key).await {
            Ok(records) => records,
            Err(e) if e.is_unavailable() => {
                tracing::warn!(category = %self.category, error = %e, "leaderboard store unreachable during read");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        // BTreeMap iteration keeps full ties in submitter-id order.
        let mut entries = Vec::with_capacity(records.len());
        for (submitter_id, record) in &records {
            match Entry::from_record(record) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    self.metrics.malformed_records.inc();
                    tracing::warn!(
                        key = %results_key,
                        submitter_id = %submitter_id,
                        error = %e,
                        "skipping malformed leaderboard record"
                    );
                }
            }
        }
        sort_entries(&mut entries);
        Ok(Some(entries))
    }
}
