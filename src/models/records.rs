//! Streak and peak-performance records.

use serde::{Deserialize, Serialize};

use super::MatchResult;

/// A record magnitude and how many times that exact maximum was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HistoricalRecord {
    pub value: u32,
    pub count: u32,
}

impl HistoricalRecord {
    pub fn new(value: u32, count: u32) -> Self {
        Self { value, count }
    }
}

/// All-time records derived from the full match history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HistoricalRecords {
    pub longest_win_streak: HistoricalRecord,
    pub longest_undefeated_streak: HistoricalRecord,
    pub longest_draw_streak: HistoricalRecord,
    pub longest_loss_streak: HistoricalRecord,
    pub longest_winless_streak: HistoricalRecord,

    pub longest_goal_streak: HistoricalRecord,
    pub longest_assist_streak: HistoricalRecord,
    pub longest_goal_drought: HistoricalRecord,
    pub longest_assist_drought: HistoricalRecord,

    pub best_goal_performance: HistoricalRecord,
    pub best_assist_performance: HistoricalRecord,
}

/// The run of identical results ending at the most recent match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultStreak {
    pub result: MatchResult,
    pub count: u32,
}

/// Streaks still active at the most recent match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CurrentStreaks {
    /// Only reported once at least two identical results are in a row
    pub result_streak: Option<ResultStreak>,
    pub goal_streak: u32,
    pub assist_streak: u32,
    pub goal_drought: u32,
    pub assist_drought: u32,
    pub winless_streak: u32,
}
