//! Teammate and opponent statistics.

use serde::{Deserialize, Serialize};

use super::{PlayerKey, Trend, WinLossRecord};

/// Movement of a player in the impact ranking since one match earlier.
pub type RankChange = Trend;

/// Which side of the pitch a player was on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuelRole {
    Teammate,
    Opponent,
}

/// Aggregated head-to-head statistics for one teammate or opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelStats {
    /// Display name (first spelling seen)
    pub name: String,

    pub role: DuelRole,

    /// Matches shared with the tracked player
    pub matches_played: u32,

    /// Team record in those matches, from the tracked player's side
    pub record: WinLossRecord,

    /// The player's own goals
    pub own_goals: u32,

    /// The player's own assists
    pub own_assists: u32,

    /// Tracked player's goals in shared matches
    pub tracked_goals: u32,

    /// Tracked player's assists in shared matches
    pub tracked_assists: u32,

    /// Win rate percentage (0.0 to 100.0)
    pub win_rate: f64,

    pub goals_per_match: f64,
    pub assists_per_match: f64,
    pub contributions_per_match: f64,

    /// Shrinkage-regularized per-match impact (signed)
    pub impact_score: f64,

    pub rank_change: RankChange,
}

impl DuelStats {
    /// Tracked player's goals plus assists in shared matches.
    pub fn tracked_contributions(&self) -> u32 {
        self.tracked_goals + self.tracked_assists
    }
}

/// Impact rankings for both roles, each sorted by descending impact score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DuelReport {
    pub teammates: Vec<DuelStats>,
    pub opponents: Vec<DuelStats>,
}

/// Top and bottom slices of a [`DuelReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DuelInsights {
    pub best_partners: Vec<DuelStats>,
    pub worst_partners: Vec<DuelStats>,
    pub favourite_rivals: Vec<DuelStats>,
    pub nemesis_rivals: Vec<DuelStats>,
}

impl DuelReport {
    /// Best/worst partners and favourite/nemesis rivals, at most `limit` each.
    pub fn insights(&self, limit: usize) -> DuelInsights {
        DuelInsights {
            best_partners: self.teammates.iter().take(limit).cloned().collect(),
            worst_partners: self.teammates.iter().rev().take(limit).cloned().collect(),
            favourite_rivals: self.opponents.iter().take(limit).cloned().collect(),
            nemesis_rivals: self.opponents.iter().rev().take(limit).cloned().collect(),
        }
    }

    /// Find a player's row in either list by name (case-insensitive).
    pub fn find(&self, role: DuelRole, name: &str) -> Option<&DuelStats> {
        let list = match role {
            DuelRole::Teammate => &self.teammates,
            DuelRole::Opponent => &self.opponents,
        };
        let key = PlayerKey::new(name)?;
        list.iter().find(|d| key.matches(&d.name))
    }
}

/// One row of the flat players leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub matches_played: u32,

    /// Results from the tracked player's side
    pub record: WinLossRecord,

    /// 3 per win, 1 per draw
    pub points: u32,

    /// Win rate percentage (0.0 to 100.0)
    pub win_rate: f64,

    /// points / (matches * 3), as a percentage
    pub effectiveness: f64,

    /// The player's own goals
    pub goals: u32,

    /// The player's own assists
    pub assists: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(name: &str, role: DuelRole, impact: f64) -> DuelStats {
        DuelStats {
            name: name.to_string(),
            role,
            matches_played: 1,
            record: WinLossRecord::new(1, 0, 0),
            own_goals: 0,
            own_assists: 0,
            tracked_goals: 1,
            tracked_assists: 2,
            win_rate: 100.0,
            goals_per_match: 1.0,
            assists_per_match: 2.0,
            contributions_per_match: 3.0,
            impact_score: impact,
            rank_change: Trend::New,
        }
    }

    #[test]
    fn test_insights_slices() {
        let report = DuelReport {
            teammates: vec![
                stats("A", DuelRole::Teammate, 3.0),
                stats("B", DuelRole::Teammate, 2.0),
                stats("C", DuelRole::Teammate, 1.0),
            ],
            opponents: vec![stats("X", DuelRole::Opponent, 0.5)],
        };

        let insights = report.insights(2);
        let best: Vec<_> = insights.best_partners.iter().map(|d| d.name.as_str()).collect();
        let worst: Vec<_> = insights.worst_partners.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(best, vec!["A", "B"]);
        assert_eq!(worst, vec!["C", "B"]);
        assert_eq!(insights.favourite_rivals.len(), 1);
        assert_eq!(insights.nemesis_rivals.len(), 1);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let report = DuelReport {
            teammates: vec![stats("Ana", DuelRole::Teammate, 1.0)],
            opponents: vec![],
        };
        assert!(report.find(DuelRole::Teammate, "ana").is_some());
        assert!(report.find(DuelRole::Opponent, "ana").is_none());
    }

    #[test]
    fn test_tracked_contributions() {
        assert_eq!(stats("A", DuelRole::Teammate, 0.0).tracked_contributions(), 3);
    }
}
