//! Morale models.

use serde::{Deserialize, Serialize};

use super::WinLossRecord;

/// Morale tier, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoraleLevel {
    Legendary,
    Stellar,
    Inspired,
    Confident,
    Solid,
    Steady,
    Doubtful,
    Blocked,
    FreeFall,
    Unrecognizable,
}

impl MoraleLevel {
    /// Every tier, best first.
    pub const ALL: [MoraleLevel; 10] = [
        MoraleLevel::Legendary,
        MoraleLevel::Stellar,
        MoraleLevel::Inspired,
        MoraleLevel::Confident,
        MoraleLevel::Solid,
        MoraleLevel::Steady,
        MoraleLevel::Doubtful,
        MoraleLevel::Blocked,
        MoraleLevel::FreeFall,
        MoraleLevel::Unrecognizable,
    ];

    /// Bucket a 0-100 score into its tier. Lower bounds are inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            MoraleLevel::Legendary
        } else if score >= 80.0 {
            MoraleLevel::Stellar
        } else if score >= 70.0 {
            MoraleLevel::Inspired
        } else if score >= 60.0 {
            MoraleLevel::Confident
        } else if score >= 50.0 {
            MoraleLevel::Solid
        } else if score >= 40.0 {
            MoraleLevel::Steady
        } else if score >= 30.0 {
            MoraleLevel::Doubtful
        } else if score >= 20.0 {
            MoraleLevel::Blocked
        } else if score >= 10.0 {
            MoraleLevel::FreeFall
        } else {
            MoraleLevel::Unrecognizable
        }
    }
}

impl std::fmt::Display for MoraleLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MoraleLevel::Legendary => "Legendary",
            MoraleLevel::Stellar => "Stellar",
            MoraleLevel::Inspired => "Inspired",
            MoraleLevel::Confident => "Confident",
            MoraleLevel::Solid => "Solid",
            MoraleLevel::Steady => "Steady",
            MoraleLevel::Doubtful => "Doubtful",
            MoraleLevel::Blocked => "Blocked",
            MoraleLevel::FreeFall => "Free Fall",
            MoraleLevel::Unrecognizable => "Unrecognizable",
        };
        write!(f, "{}", label)
    }
}

/// Direction of change against an earlier snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Same,
    /// No earlier snapshot to compare against
    New,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Same => write!(f, "same"),
            Trend::New => write!(f, "new"),
        }
    }
}

/// Descriptive totals for the matches a morale score was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RecentWindowSummary {
    pub matches_considered: u32,
    pub record: WinLossRecord,
    pub goals: u32,
    pub assists: u32,
}

/// Current morale of the tracked player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMorale {
    pub level: MoraleLevel,

    /// 0.0 to 100.0
    pub score: f64,

    pub trend: Trend,

    pub recent: RecentWindowSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_score_boundaries() {
        assert_eq!(MoraleLevel::from_score(100.0), MoraleLevel::Legendary);
        assert_eq!(MoraleLevel::from_score(90.0), MoraleLevel::Legendary);
        assert_eq!(MoraleLevel::from_score(89.99), MoraleLevel::Stellar);
        assert_eq!(MoraleLevel::from_score(70.0), MoraleLevel::Inspired);
        assert_eq!(MoraleLevel::from_score(50.0), MoraleLevel::Solid);
        assert_eq!(MoraleLevel::from_score(49.0), MoraleLevel::Steady);
        assert_eq!(MoraleLevel::from_score(10.0), MoraleLevel::FreeFall);
        assert_eq!(MoraleLevel::from_score(9.99), MoraleLevel::Unrecognizable);
        assert_eq!(MoraleLevel::from_score(0.0), MoraleLevel::Unrecognizable);
    }

    #[test]
    fn test_levels_cover_every_decile_once() {
        let levels: Vec<MoraleLevel> = (0..10)
            .rev()
            .map(|decile| MoraleLevel::from_score(decile as f64 * 10.0 + 5.0))
            .collect();
        assert_eq!(levels, MoraleLevel::ALL.to_vec());
    }

    #[test]
    fn test_level_ordering_best_first() {
        assert!(MoraleLevel::Legendary < MoraleLevel::Solid);
        assert!(MoraleLevel::FreeFall < MoraleLevel::Unrecognizable);
    }

    #[test]
    fn test_trend_serialization() {
        assert_eq!(serde_json::to_string(&Trend::New).unwrap(), "\"new\"");
        assert_eq!(format!("{}", Trend::Down), "down");
    }

    #[test]
    fn test_level_display() {
        assert_eq!(format!("{}", MoraleLevel::FreeFall), "Free Fall");
        assert_eq!(
            serde_json::to_string(&MoraleLevel::FreeFall).unwrap(),
            "\"free_fall\""
        );
    }
}
