use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one logical leaderboard: a `(language, mode, mode2)` triple.
///
/// Equality is exact and case-sensitive on all three components.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub language: String,
    pub mode: String,
    pub mode2: String,
}

impl Category {
    pub fn new(
        language: impl Into<String>,
        mode: impl Into<String>,
        mode2: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            mode: mode.into(),
            mode2: mode2.into(),
        }
    }

    /// Stable key `language:mode:mode2`.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.language, self.mode, self.mode2)
    }
}
