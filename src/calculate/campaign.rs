//! Campaign bracket progression.
//!
//! A campaign is one run through Group -> Round of 16 -> Quarters -> Semis ->
//! Final. Each newly logged match moves the bracket forward, ends the
//! campaign (archiving it and opening the next one) or, once the final is
//! won, is ignored until the champion is cleared.
//!
//! Unlike the other calculators this is a fold: the same matches applied in
//! a different order can produce a different history.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    CampaignHistoryEntry, CampaignProgress, CampaignStage, FinalStage, MatchRecord, MatchResult,
    GROUP_MATCHES, GROUP_QUALIFYING_POINTS,
};

use super::creation_order;

/// Campaign state transition errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CampaignError {
    #[error("campaign {0} has no champion to clear")]
    NoChampion(u32),
}

/// What a single match did to the bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// Champion already crowned; the match was ignored
    Frozen,
    /// Group match played, group not decided yet
    GroupMatch,
    /// Stage cleared, moved to the next one
    Advanced,
    /// Final won
    Champion,
    /// Campaign over; the next one has started
    Eliminated,
}

/// Result of applying one match to the campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignStep {
    pub progress: CampaignProgress,

    /// History entry to append, if the campaign ended with this match
    pub archived: Option<CampaignHistoryEntry>,

    pub outcome: StepOutcome,
}

/// History entry for the campaign in `progress`, ended on `end_date`.
///
/// `None` when the campaign never had a start date.
fn archive(
    progress: &CampaignProgress,
    end_date: chrono::NaiveDate,
    champion: bool,
) -> Option<CampaignHistoryEntry> {
    progress.start_date.map(|start_date| CampaignHistoryEntry {
        campaign_number: progress.campaign_number,
        start_date,
        end_date,
        final_stage: FinalStage::from(progress.current_stage),
        champion,
    })
}

fn eliminated(progress: &CampaignProgress, m: &MatchRecord) -> CampaignStep {
    CampaignStep {
        progress: CampaignProgress::fresh(progress.campaign_number + 1),
        archived: archive(progress, m.date, false),
        outcome: StepOutcome::Eliminated,
    }
}

/// Apply one newly created match to the campaign progress.
pub fn apply_match(progress: &CampaignProgress, m: &MatchRecord) -> CampaignStep {
    if progress.is_champion() {
        return CampaignStep {
            progress: progress.clone(),
            archived: None,
            outcome: StepOutcome::Frozen,
        };
    }

    let mut next = progress.clone();
    next.start_date.get_or_insert(m.date);

    let stage = next.current_stage;
    if stage == CampaignStage::Group {
        next.group_stage.matches_played += 1;
        next.group_stage.points += m.result.points();

        if next.group_stage.matches_played < GROUP_MATCHES {
            return CampaignStep {
                progress: next,
                archived: None,
                outcome: StepOutcome::GroupMatch,
            };
        }
        if next.group_stage.points < GROUP_QUALIFYING_POINTS {
            return eliminated(&next, m);
        }
    } else if m.result != MatchResult::Win {
        return eliminated(&next, m);
    }

    next.completed_stages.push(stage);
    match stage.next() {
        Some(following) => {
            next.current_stage = following;
            CampaignStep {
                progress: next,
                archived: None,
                outcome: StepOutcome::Advanced,
            }
        }
        None => {
            next.champion_of_campaign = Some(next.campaign_number);
            let archived = archive(&next, m.date, true);
            CampaignStep {
                progress: next,
                archived,
                outcome: StepOutcome::Champion,
            }
        }
    }
}

/// Start the next campaign after a championship.
///
/// Returns `None` if no champion is set. No history entry is produced; the
/// win was archived when the final was played.
pub fn clear_champion(progress: &CampaignProgress) -> Option<CampaignProgress> {
    progress
        .champion_of_campaign
        .map(|_| CampaignProgress::fresh(progress.campaign_number + 1))
}

/// Persisted campaign progress together with its archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CampaignState {
    pub progress: CampaignProgress,
    pub history: Vec<CampaignHistoryEntry>,
}

impl CampaignState {
    pub fn new(progress: CampaignProgress, history: Vec<CampaignHistoryEntry>) -> Self {
        Self { progress, history }
    }

    /// Fold one match in and return the step that was taken.
    pub fn apply(&mut self, m: &MatchRecord) -> CampaignStep {
        let step = apply_match(&self.progress, m);
        self.progress = step.progress.clone();
        if let Some(entry) = &step.archived {
            self.history.push(entry.clone());
        }
        step
    }

    pub fn clear_champion(&mut self) -> Result<(), CampaignError> {
        self.progress = clear_champion(&self.progress)
            .ok_or(CampaignError::NoChampion(self.progress.campaign_number))?;
        Ok(())
    }
}

/// Rebuild the campaign from scratch by folding matches in creation order.
pub fn replay_campaign(matches: &[MatchRecord]) -> CampaignState {
    let mut state = CampaignState::default();
    for m in creation_order(matches) {
        state.apply(m);
    }
    state
}
