//! Per-season and per-tournament aggregate tables.

use serde::{Deserialize, Serialize};

use super::{MatchRecord, WinLossRecord};

/// Aggregate statistics for one period (a year or a tournament).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    /// Year ("2025") or tournament label
    pub label: String,
    pub matches_played: u32,
    pub record: WinLossRecord,
    pub points: u32,
    pub win_rate: f64,
    pub effectiveness: f64,
    pub goals: u32,
    pub assists: u32,
    pub goals_per_match: f64,
    pub assists_per_match: f64,
    pub contributions_per_match: f64,
}

impl PeriodStats {
    /// Empty row for a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            matches_played: 0,
            record: WinLossRecord::default(),
            points: 0,
            win_rate: 0.0,
            effectiveness: 0.0,
            goals: 0,
            assists: 0,
            goals_per_match: 0.0,
            assists_per_match: 0.0,
            contributions_per_match: 0.0,
        }
    }

    /// Fold one match into the totals and refresh the derived rates.
    pub fn add(&mut self, m: &MatchRecord) {
        self.matches_played += 1;
        self.record.add(m.result);
        self.goals += m.goals_for;
        self.assists += m.assists;

        let n = self.matches_played as f64;
        self.points = self.record.points();
        self.win_rate = self.record.win_rate();
        self.effectiveness = self.record.effectiveness();
        self.goals_per_match = self.goals as f64 / n;
        self.assists_per_match = self.assists as f64 / n;
        self.contributions_per_match = (self.goals + self.assists) as f64 / n;
    }
}

/// Year-by-year and tournament-by-tournament tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SeasonTable {
    /// Most recent year first
    pub years: Vec<PeriodStats>,

    /// Most points first
    pub tournaments: Vec<PeriodStats>,
}
