use regex::RegexSet;
use serde::{Deserialize, Serialize};

use crate::error::LeaderboardError;

/// A list of category patterns, compiled once when the list is built.
///
/// Each pattern is a regular expression matched against the whole value,
/// so `english_\d+` accepts `english_1k` only if it spells out the full
/// string. A value is accepted when any pattern in the list matches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct PatternList {
    patterns: Vec<String>,
    compiled: RegexSet,
}

impl PatternList {
    pub fn new<I, S>(patterns: I) -> Result<Self, LeaderboardError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let compiled = RegexSet::new(patterns.iter().map(|p| format!("^(?:{p})$"))).map_err(
            |e| LeaderboardError::InvalidConfig {
                reason: format!("invalid category pattern: {e}"),
            },
        )?;
        Ok(Self { patterns, compiled })
    }

    /// Returns true when `value` fully matches at least one pattern.
    pub fn matches(&self, value: &str) -> bool {
        self.compiled.is_match(value)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for PatternList {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            compiled: RegexSet::empty(),
        }
    }
}

impl TryFrom<Vec<String>> for PatternList {
    type Error = LeaderboardError;

    fn try_from(patterns: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(patterns)
    }
}

impl From<PatternList> for Vec<String> {
    fn from(list: PatternList) -> Self {
        list.patterns
    }
}

/// Configuration for daily leaderboards.
///
/// Field names deserialize from camelCase (`maxResults`,
/// `leaderboardExpirationTimeInDays`, `validMode2Patterns`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLeaderboardConfig {
    /// Master switch. When false nothing is tracked. Default: false.
    pub enabled: bool,
    /// Maximum entries retained per category per day. Default: 250.
    pub max_results: usize,
    /// Days after a partition's day boundary before its data expires.
    /// Fractional values are allowed. Default: 1.
    pub leaderboard_expiration_time_in_days: f64,
    /// Patterns a category's language must match.
    #[serde(default)]
    pub valid_language_patterns: PatternList,
    /// Patterns a category's mode must match.
    #[serde(default)]
    pub valid_mode_patterns: PatternList,
    /// Patterns a category's sub-mode must match.
    #[serde(default)]
    pub valid_mode2_patterns: PatternList,
}

impl DailyLeaderboardConfig {
    /// Parse a JSON configuration document and validate it.
    pub fn from_json(json: &str) -> Result<Self, LeaderboardError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| LeaderboardError::InvalidConfig {
                reason: format!("failed to parse daily leaderboard config: {e}"),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks:
    /// - `max_results >= 1`
    /// - `leaderboard_expiration_time_in_days` is finite and > 0
    pub fn validate(&self) -> Result<(), LeaderboardError> {
        if self.max_results == 0 {
            return Err(LeaderboardError::InvalidConfig {
                reason: "max_results must be >= 1".to_string(),
            });
        }
        let days = self.leaderboard_expiration_time_in_days;
        if !days.is_finite() || days <= 0.0 {
            return Err(LeaderboardError::InvalidConfig {
                reason: format!("leaderboard_expiration_time_in_days must be > 0, got {days}"),
            });
        }
        Ok(())
    }

    /// Whether all three category components match their pattern lists.
    pub fn accepts(&self, language: &str, mode: &str, mode2: &str) -> bool {
        self.valid_language_patterns.matches(language)
            && self.valid_mode_patterns.matches(mode)
            && self.valid_mode2_patterns.matches(mode2)
    }
}

impl Default for DailyLeaderboardConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_results: 250,
            leaderboard_expiration_time_in_days: 1.0,
            valid_language_patterns: PatternList::default(),
            valid_mode_patterns: PatternList::default(),
            valid_mode2_patterns: PatternList::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = DailyLeaderboardConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.max_results, 250);
        assert_eq!(config.leaderboard_expiration_time_in_days, 1.0);
        assert!(config.valid_language_patterns.is_empty());
    }

    #[test]
    fn default_config_is_valid() {
        DailyLeaderboardConfig::default().validate().unwrap();
    }

    #[test]
    fn validate_zero_max_results() {
        let config = DailyLeaderboardConfig {
            max_results: 0,
            ..Default::default()
        };
        let msg = config.validate().unwrap_err().to_string();
        assert!(msg.contains("max_results"), "got: {msg}");
    }

    #[test]
    fn validate_non_positive_expiration() {
        for days in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = DailyLeaderboardConfig {
                leaderboard_expiration_time_in_days: days,
                ..Default::default()
            };
            let msg = config.validate().unwrap_err().to_string();
            assert!(
                msg.contains("leaderboard_expiration_time_in_days"),
                "got: {msg}"
            );
        }
    }

    #[test]
    fn patterns_match_whole_value() {
        let list = PatternList::new(["english", r"english_\d+k"]).unwrap();
        assert!(list.matches("english"));
        assert!(list.matches("english_10k"));
        assert!(!list.matches("english_10k_extra"));
        assert!(!list.matches("old_english"));
        assert!(!list.matches("English"));
    }

    #[test]
    fn empty_pattern_list_matches_nothing() {
        let list = PatternList::default();
        assert!(!list.matches(""));
        assert!(!list.matches("english"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = PatternList::new(["(unclosed"]).unwrap_err();
        assert!(matches!(err, LeaderboardError::InvalidConfig { .. }));
    }

    #[test]
    fn from_json_uses_camel_case_names() {
        let config = DailyLeaderboardConfig::from_json(
            r#"{
                "enabled": true,
                "maxResults": 3,
                "leaderboardExpirationTimeInDays": 1.5,
                "validLanguagePatterns": ["english", "spanish"],
                "validModePatterns": ["time"],
                "validMode2Patterns": ["15", "60"]
            }"#,
        )
        .unwrap();
        assert!(config.enabled);
        assert_eq!(config.max_results, 3);
        assert_eq!(config.leaderboard_expiration_time_in_days, 1.5);
        assert!(config.accepts("spanish", "time", "60"));
        assert!(!config.accepts("spanish", "words", "60"));
        assert_eq!(config.valid_mode2_patterns.patterns(), ["15", "60"]);
    }

    #[test]
    fn from_json_rejects_bad_pattern_and_bad_values() {
        let bad_pattern = r#"{
            "enabled": true,
            "maxResults": 3,
            "leaderboardExpirationTimeInDays": 1,
            "validLanguagePatterns": ["["]
        }"#;
        assert!(DailyLeaderboardConfig::from_json(bad_pattern).is_err());

        let zero_results = r#"{
            "enabled": true,
            "maxResults": 0,
            "leaderboardExpirationTimeInDays": 1
        }"#;
        let msg = DailyLeaderboardConfig::from_json(zero_results)
            .unwrap_err()
            .to_string();
        assert!(msg.contains("max_results"), "got: {msg}");
    }

    #[test]
    fn serializes_patterns_as_plain_strings() {
        let config = DailyLeaderboardConfig {
            valid_mode_patterns: PatternList::new(["time", "words"]).unwrap(),
            ..Default::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["validModePatterns"], serde_json::json!(["time", "words"]));
        assert_eq!(json["maxResults"], serde_json::json!(250));
    }
}
