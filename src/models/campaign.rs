//! Campaign mode: bracket progress and the archive of finished attempts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Bracket stage, in playing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStage {
    Group,
    RoundOf16,
    Quarters,
    Semis,
    Final,
}

impl CampaignStage {
    /// The stage reached by winning this one, `None` after the final.
    pub fn next(&self) -> Option<CampaignStage> {
        match self {
            CampaignStage::Group => Some(CampaignStage::RoundOf16),
            CampaignStage::RoundOf16 => Some(CampaignStage::Quarters),
            CampaignStage::Quarters => Some(CampaignStage::Semis),
            CampaignStage::Semis => Some(CampaignStage::Final),
            CampaignStage::Final => None,
        }
    }
}

impl std::fmt::Display for CampaignStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CampaignStage::Group => write!(f, "Group stage"),
            CampaignStage::RoundOf16 => write!(f, "Round of 16"),
            CampaignStage::Quarters => write!(f, "Quarter-finals"),
            CampaignStage::Semis => write!(f, "Semi-finals"),
            CampaignStage::Final => write!(f, "Final"),
        }
    }
}

/// Where an archived campaign ended. `Final` covers a lost and a won final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalStage {
    EliminatedGroup,
    RoundOf16,
    Quarters,
    Semis,
    Final,
}

impl From<CampaignStage> for FinalStage {
    fn from(stage: CampaignStage) -> Self {
        match stage {
            CampaignStage::Group => FinalStage::EliminatedGroup,
            CampaignStage::RoundOf16 => FinalStage::RoundOf16,
            CampaignStage::Quarters => FinalStage::Quarters,
            CampaignStage::Semis => FinalStage::Semis,
            CampaignStage::Final => FinalStage::Final,
        }
    }
}

impl std::fmt::Display for FinalStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinalStage::EliminatedGroup => write!(f, "Eliminated in group"),
            FinalStage::RoundOf16 => write!(f, "Round of 16"),
            FinalStage::Quarters => write!(f, "Quarter-finals"),
            FinalStage::Semis => write!(f, "Semi-finals"),
            FinalStage::Final => write!(f, "Final"),
        }
    }
}

/// Group stage standings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GroupStage {
    /// 0 to 3
    pub matches_played: u32,
    pub points: u32,
}

/// Matches played in the group before it is decided.
pub const GROUP_MATCHES: u32 = 3;

/// Group points needed to reach the knockout rounds.
pub const GROUP_QUALIFYING_POINTS: u32 = 4;

/// Progress of the current campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignProgress {
    /// Monotonic attempt number, starting at 1
    pub campaign_number: u32,

    pub current_stage: CampaignStage,

    /// Date of the first match of this attempt (None until one is played)
    pub start_date: Option<NaiveDate>,

    pub group_stage: GroupStage,

    /// Stages already cleared, in order
    pub completed_stages: Vec<CampaignStage>,

    /// Set to `campaign_number` once the final is won; freezes progress
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub champion_of_campaign: Option<u32>,
}

impl CampaignProgress {
    /// A fresh group stage for the given attempt.
    pub fn fresh(campaign_number: u32) -> Self {
        Self {
            campaign_number,
            current_stage: CampaignStage::Group,
            start_date: None,
            group_stage: GroupStage::default(),
            completed_stages: Vec::new(),
            champion_of_campaign: None,
        }
    }

    pub fn is_champion(&self) -> bool {
        self.champion_of_campaign.is_some()
    }
}

impl Default for CampaignProgress {
    fn default() -> Self {
        Self::fresh(1)
    }
}

/// A finished campaign. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignHistoryEntry {
    pub campaign_number: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub final_stage: FinalStage,

    /// True only for a won final
    #[serde(default)]
    pub champion: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let mut stage = CampaignStage::Group;
        let mut visited = vec![stage];
        while let Some(next) = stage.next() {
            assert!(next > stage);
            visited.push(next);
            stage = next;
        }
        assert_eq!(visited.len(), 5);
        assert_eq!(stage, CampaignStage::Final);
    }

    #[test]
    fn test_final_stage_from_campaign_stage() {
        assert_eq!(FinalStage::from(CampaignStage::Group), FinalStage::EliminatedGroup);
        assert_eq!(FinalStage::from(CampaignStage::Semis), FinalStage::Semis);
    }

    #[test]
    fn test_default_progress() {
        let progress = CampaignProgress::default();
        assert_eq!(progress.campaign_number, 1);
        assert_eq!(progress.current_stage, CampaignStage::Group);
        assert!(progress.start_date.is_none());
        assert!(!progress.is_champion());
    }

    #[test]
    fn test_progress_serialization() {
        let progress = CampaignProgress::fresh(3);
        let json = serde_json::to_string(&progress).unwrap();
        assert!(!json.contains("champion_of_campaign"));
        assert!(json.contains("\"current_stage\":\"group\""));

        let deserialized: CampaignProgress = serde_json::from_str(&json).unwrap();
        assert_eq!(progress, deserialized);
    }

    #[test]
    fn test_history_entry_serialization() {
        let entry = CampaignHistoryEntry {
            campaign_number: 2,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
            final_stage: FinalStage::EliminatedGroup,
            champion: false,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"eliminated_group\""));

        let legacy = r#"{"campaign_number":1,"start_date":"2025-01-01","end_date":"2025-01-02","final_stage":"final"}"#;
        let parsed: CampaignHistoryEntry = serde_json::from_str(legacy).unwrap();
        assert!(!parsed.champion);
    }
}
