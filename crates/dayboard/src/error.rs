/// Errors that can occur while maintaining daily leaderboards.
#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("store unavailable: {reason}")]
    StoreUnavailable {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("persistence error: {reason}")]
    Persistence {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("malformed record: {reason}")]
    MalformedRecord {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("invalid entry: {reason}")]
    InvalidEntry { reason: String },
}

impl LeaderboardError {
    /// Whether the error means the store could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, LeaderboardError::StoreUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = LeaderboardError::StoreUnavailable {
            reason: "connection refused".into(),
            source: None,
        };
        assert_eq!(err.to_string(), "store unavailable: connection refused");

        let err = LeaderboardError::InvalidConfig {
            reason: "max_results must be >= 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration: max_results must be >= 1"
        );

        let err = LeaderboardError::InvalidEntry {
            reason: "wpm must be finite, got NaN".into(),
        };
        assert_eq!(err.to_string(), "invalid entry: wpm must be finite, got NaN");
    }

    #[test]
    fn only_store_unavailable_is_unavailable() {
        let down = LeaderboardError::StoreUnavailable {
            reason: "down".into(),
            source: None,
        };
        let rejected = LeaderboardError::Persistence {
            reason: "script rejected".into(),
            source: None,
        };
        assert!(down.is_unavailable());
        assert!(!rejected.is_unavailable());
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LeaderboardError>();
    }
}
