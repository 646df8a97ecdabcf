use std::fmt;

use super::Category;

/// Root namespace for every key this crate writes.
pub const NAMESPACE: &str = "monkeytypes:dailyleaderboard";

/// Which of the two store-side structures a key addresses.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Structure {
    /// Submitter id -> score marker, used for ranking and trimming.
    Scores,
    /// Submitter id -> serialized entry.
    Results,
}

impl Structure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Structure::Scores => "scores",
            Structure::Results => "results",
        }
    }
}

/// Partition-independent key prefix for one structure of one category,
/// e.g. `monkeytypes:dailyleaderboard:scores:english:time:60`.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct KeyPrefix(String);

impl KeyPrefix {
    pub fn new(structure: Structure, category: &Category) -> Self {
        Self(format!("{NAMESPACE}:{}:{category}", structure.as_str()))
    }

    /// Key for the partition starting at `day_boundary` (epoch millis).
    pub fn partition(&self, day_boundary: i64) -> String {
        format!("{}:{day_boundary}", self.0)
    }
}

impl fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for KeyPrefix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
