use serde::{Deserialize, Serialize};

use crate::error::LeaderboardError;
use crate::ranking::ScoreMarker;

/// A single leaderboard result as submitted and as returned in snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Display name of the submitter.
    pub name: String,
    /// Words per minute. Primary ranking key.
    pub wpm: f64,
    pub raw_wpm: f64,
    /// Accuracy on a 0-100 scale.
    pub accuracy: f64,
    pub consistency: f64,
    /// Submission time in epoch milliseconds.
    pub timestamp: i64,
}

impl Entry {
    /// The fields that decide this entry's rank.
    pub fn marker(&self) -> ScoreMarker {
        ScoreMarker {
            wpm: self.wpm,
            accuracy: self.accuracy,
            timestamp: self.timestamp,
        }
    }

    /// Reject entries whose scores cannot be ranked or stored.
    ///
    /// Non-finite floats have no JSON form and would sort above every real
    /// score.
    pub fn validate(&self) -> Result<(), LeaderboardError> {
        let fields = [
            ("wpm", self.wpm),
            ("rawWpm", self.raw_wpm),
            ("accuracy", self.accuracy),
            ("consistency", self.consistency),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(LeaderboardError::InvalidEntry {
                    reason: format!("{field} must be finite, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// Serialize to the stored record form (a JSON object).
    pub fn to_record(&self) -> Result<String, LeaderboardError> {
        serde_json::to_string(self).map_err(|e| LeaderboardError::MalformedRecord {
            reason: format!("failed to serialize entry: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Parse a stored record.
    pub fn from_record(record: &str) -> Result<Self, LeaderboardError> {
        serde_json::from_str(record).map_err(|e| LeaderboardError::MalformedRecord {
            reason: format!("failed to parse entry: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Entry {
        Entry {
            name: "alice".into(),
            wpm: 112.5,
            raw_wpm: 118.25,
            accuracy: 97.3,
            consistency: 81.0,
            timestamp: 1_700_000_000_123,
        }
    }

    #[test]
    fn record_uses_camel_case_fields() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_record().unwrap()).unwrap();
        assert_eq!(json["rawWpm"], serde_json::json!(118.25));
        assert_eq!(json["timestamp"], serde_json::json!(1_700_000_000_123_i64));
        assert!(json.get("raw_wpm").is_none());
    }

    #[test]
    fn field_order_is_not_significant() {
        let record = r#"{"timestamp":5,"consistency":70,"accuracy":95,"rawWpm":101,"wpm":100,"name":"bob"}"#;
        let entry = Entry::from_record(record).unwrap();
        assert_eq!(entry.name, "bob");
        assert_eq!(entry.wpm, 100.0);
        assert_eq!(entry.timestamp, 5);
        assert_eq!(Entry::from_record(&entry.to_record().unwrap()).unwrap(), entry);
    }

    #[test]
    fn missing_field_is_malformed() {
        let err = Entry::from_record(r#"{"name":"bob","wpm":100}"#).unwrap_err();
        assert!(matches!(err, LeaderboardError::MalformedRecord { .. }));
    }

    #[test]
    fn non_finite_scores_are_invalid() {
        assert!(sample().validate().is_ok());

        let nan_wpm = Entry {
            wpm: f64::NAN,
            ..sample()
        };
        let err = nan_wpm.validate().unwrap_err();
        assert!(matches!(err, LeaderboardError::InvalidEntry { .. }));
        assert!(err.to_string().contains("wpm"), "got: {err}");

        let infinite_accuracy = Entry {
            accuracy: f64::INFINITY,
            ..sample()
        };
        assert!(infinite_accuracy.validate().is_err());

        let nan_consistency = Entry {
            consistency: f64::NAN,
            ..sample()
        };
        assert!(nan_consistency.validate().is_err());
    }

    #[test]
    fn marker_projects_ranking_fields() {
        let marker = sample().marker();
        assert_eq!(marker.wpm, 112.5);
        assert_eq!(marker.accuracy, 97.3);
        assert_eq!(marker.timestamp, 1_700_000_000_123);
    }
}
