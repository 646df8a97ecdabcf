use prometheus::{IntCounter, IntGauge, Opts, Registry};

/// Prometheus metrics for daily leaderboards.
pub struct LeaderboardMetrics {
    /// Submissions applied to a partition.
    pub submissions: IntCounter,
    /// Submissions dropped because the feature was disabled or the store unreachable.
    pub submissions_skipped: IntCounter,
    /// Submissions the store rejected.
    pub submission_failures: IntCounter,
    /// Entries evicted by trimming.
    pub evictions: IntCounter,
    /// Records skipped while reading because they failed to parse.
    pub malformed_records: IntCounter,
    /// Leaderboard handles cached by the registry.
    pub handles: IntGauge,
}

impl LeaderboardMetrics {
    /// Create metrics and register them with the given prometheus registry.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let metrics = Self::build()?;
        registry.register(Box::new(metrics.submissions.clone()))?;
        registry.register(Box::new(metrics.submissions_skipped.clone()))?;
        registry.register(Box::new(metrics.submission_failures.clone()))?;
        registry.register(Box::new(metrics.evictions.clone()))?;
        registry.register(Box::new(metrics.malformed_records.clone()))?;
        registry.register(Box::new(metrics.handles.clone()))?;
        Ok(metrics)
    }

    /// Create metrics without registering (for testing).
    pub fn unregistered() -> Self {
        Self::build().expect("valid metric names")
    }

    fn build() -> Result<Self, prometheus::Error> {
        Ok(Self {
            submissions: IntCounter::with_opts(Opts::new(
                "daily_leaderboard_submissions_total",
                "Submissions applied to a daily leaderboard partition",
            ))?,
            submissions_skipped: IntCounter::with_opts(Opts::new(
                "daily_leaderboard_submissions_skipped_total",
                "Submissions dropped because the feature is disabled or the store is unreachable",
            ))?,
            submission_failures: IntCounter::with_opts(Opts::new(
                "daily_leaderboard_submission_failures_total",
                "Submissions rejected by the store",
            ))?,
            evictions: IntCounter::with_opts(Opts::new(
                "daily_leaderboard_evictions_total",
                "Entries evicted to keep partitions within max_results",
            ))?,
            malformed_records: IntCounter::with_opts(Opts::new(
                "daily_leaderboard_malformed_records_total",
                "Stored records skipped because they failed to parse",
            ))?,
            handles: IntGauge::with_opts(Opts::new(
                "daily_leaderboard_handles",
                "Leaderboard handles cached by the registry",
            ))?,
        })
    }
}
