//! Streak-based achievement conditions.

use serde::{Deserialize, Serialize};

/// What an achievement condition measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementMetric {
    WinStreak,
    LossStreak,
    UndefeatedStreak,
    WinlessStreak,
    GoalStreak,
    AssistStreak,
    GoalDrought,
    AssistDrought,
    /// A win straight after at least `threshold` losses in a row
    BreakWinAfterLossStreak,
    /// A non-loss straight after at least `threshold` winless matches
    BreakUndefeatedAfterWinlessStreak,
}

/// "Reach `threshold` on `metric` within the last `window` matches."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementCondition {
    pub metric: AchievementMetric,
    pub threshold: u32,

    /// Number of most recent matches to look at; 0 means the whole history
    #[serde(default)]
    pub window: usize,
}

impl AchievementCondition {
    pub fn new(metric: AchievementMetric, threshold: u32, window: usize) -> Self {
        Self {
            metric,
            threshold,
            window,
        }
    }
}
