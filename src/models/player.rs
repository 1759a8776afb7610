//! Players appearing alongside or against the tracked player.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Goals and assists credited to one named player in a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerContribution {
    pub name: String,
    #[serde(default)]
    pub goals: u32,
    #[serde(default)]
    pub assists: u32,
}

impl PlayerContribution {
    pub fn new(name: impl Into<String>, goals: u32, assists: u32) -> Self {
        Self {
            name: name.into(),
            goals,
            assists,
        }
    }

    /// Normalized key for this player's name, `None` when the name is blank.
    pub fn key(&self) -> Option<PlayerKey> {
        PlayerKey::new(&self.name)
    }
}

/// Normalized player name: trimmed and lower-cased.
///
/// Every per-player aggregation is keyed by this, so "Leo ", "leo" and "LEO"
/// count as the same person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerKey(String);

impl PlayerKey {
    /// Returns `None` for names that are empty after trimming.
    pub fn new(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_lowercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if `name` normalizes to this key.
    pub fn matches(&self, name: &str) -> bool {
        PlayerKey::new(name).as_ref() == Some(self)
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
