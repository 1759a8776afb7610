//! The match ledger: the single writer for the match log and campaign state.
//!
//! Recording a match appends it to the log and folds it into the campaign.
//! Edits and deletes rewrite the log but never touch the campaign; the
//! analytics are recomputed from the log on demand, while the campaign only
//! moves forward as matches are created. `rebuild_campaign` replays the whole
//! log in creation order when that is wanted.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::calculate::campaign::CampaignError;
use crate::calculate::{replay_campaign, CampaignState, CampaignStep};
use crate::models::{CampaignProgress, MatchId, MatchRecord, NewMatch};
use crate::storage::jsonl::{append_match, read_matches, write_matches};
use crate::storage::state::{
    append_campaign_history, load_campaign_progress, read_campaign_history,
    save_campaign_progress, write_campaign_history,
};
use crate::storage::{StorageConfig, StorageError};

/// Ledger errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("Campaign error: {0}")]
    Campaign(#[from] CampaignError),
}

/// In-memory view of the stored match log and campaign.
pub struct MatchLedger {
    storage: StorageConfig,
    matches: Vec<MatchRecord>,
    campaign: CampaignState,
}

impl MatchLedger {
    /// Load everything under the storage directory.
    pub fn open(storage: StorageConfig) -> Result<Self, LedgerError> {
        let matches = read_matches(&storage)?;
        let campaign = CampaignState::new(
            load_campaign_progress(&storage)?,
            read_campaign_history(&storage)?,
        );

        info!(
            "Opened ledger at {:?}: {} matches, campaign {}",
            storage.data_dir,
            matches.len(),
            campaign.progress.campaign_number
        );

        Ok(Self {
            storage,
            matches,
            campaign,
        })
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    /// All matches, in creation order.
    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn get(&self, id: &MatchId) -> Option<&MatchRecord> {
        self.matches.iter().find(|m| &m.id == id)
    }

    pub fn campaign(&self) -> &CampaignState {
        &self.campaign
    }

    /// Record a new match created now.
    pub fn record_match(&mut self, new: NewMatch) -> Result<(MatchRecord, CampaignStep), LedgerError> {
        self.record_match_at(new, Utc::now())
    }

    /// Record a new match with an explicit creation instant.
    ///
    /// Creation instants are kept strictly increasing so every match gets a
    /// distinct ID and a well-defined place in the campaign fold.
    ///
    /// The in-memory state only changes once the match, any archived campaign
    /// and the new progress are all on disk. If a campaign write fails the
    /// match log is restored to what it was.
    pub fn record_match_at(
        &mut self,
        new: NewMatch,
        created_at: DateTime<Utc>,
    ) -> Result<(MatchRecord, CampaignStep), LedgerError> {
        let created_at = match self.matches.iter().map(|m| m.created_at).max() {
            Some(latest) if created_at <= latest => latest + Duration::microseconds(1),
            _ => created_at,
        };

        let record = new.into_record(created_at);
        let mut campaign = self.campaign.clone();
        let step = campaign.apply(&record);

        append_match(&self.storage, &record)?;
        if let Err(e) = self.persist_step(&step) {
            self.restore_files();
            return Err(e);
        }

        self.matches.push(record.clone());
        self.campaign = campaign;

        info!(
            id = %record.id,
            date = %record.date,
            result = %record.result,
            outcome = ?step.outcome,
            "Recorded match"
        );
        Ok((record, step))
    }

    /// Archive first, so progress never points past a campaign missing from
    /// the history file.
    fn persist_step(&self, step: &CampaignStep) -> Result<(), LedgerError> {
        if let Some(entry) = &step.archived {
            append_campaign_history(&self.storage, entry)?;
        }
        save_campaign_progress(&self.storage, &step.progress)?;
        Ok(())
    }

    /// Best-effort rewrite of the files to the in-memory state after a
    /// failed write.
    fn restore_files(&self) {
        warn!("Write failed, restoring ledger files");
        let mut matches = self.matches.clone();
        if let Err(e) = write_matches(&self.storage, &mut matches) {
            error!("Failed to restore match log: {}", e);
        }
        if let Err(e) = write_campaign_history(&self.storage, &self.campaign.history) {
            error!("Failed to restore campaign history: {}", e);
        }
        if let Err(e) = save_campaign_progress(&self.storage, &self.campaign.progress) {
            error!("Failed to restore campaign progress: {}", e);
        }
    }

    /// Replace a match's editable fields. The campaign is left as is.
    pub fn update_match(&mut self, id: &MatchId, edit: NewMatch) -> Result<MatchRecord, LedgerError> {
        let mut matches = self.matches.clone();
        let record = matches
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| LedgerError::MatchNotFound(id.clone()))?;
        record.apply_edit(edit);
        let updated = record.clone();

        write_matches(&self.storage, &mut matches)?;
        self.matches = matches;
        info!(id = %id, "Updated match");
        Ok(updated)
    }

    /// Remove a match. The campaign is left as is.
    pub fn delete_match(&mut self, id: &MatchId) -> Result<MatchRecord, LedgerError> {
        let mut matches = self.matches.clone();
        let index = matches
            .iter()
            .position(|m| &m.id == id)
            .ok_or_else(|| LedgerError::MatchNotFound(id.clone()))?;
        let removed = matches.remove(index);

        write_matches(&self.storage, &mut matches)?;
        self.matches = matches;
        info!(id = %id, "Deleted match");
        Ok(removed)
    }

    /// Start the next campaign after a championship.
    pub fn clear_champion(&mut self) -> Result<&CampaignProgress, LedgerError> {
        let mut campaign = self.campaign.clone();
        if let Err(e) = campaign.clear_champion() {
            warn!("Clear champion rejected: {}", e);
            return Err(e.into());
        }
        save_campaign_progress(&self.storage, &campaign.progress)?;
        self.campaign = campaign;

        info!(
            campaign = self.campaign.progress.campaign_number,
            "Cleared champion, new campaign started"
        );
        Ok(&self.campaign.progress)
    }

    /// Replay every match in creation order and overwrite the campaign files.
    pub fn rebuild_campaign(&mut self) -> Result<&CampaignState, LedgerError> {
        let rebuilt = replay_campaign(&self.matches);
        debug!(
            "Replayed {} matches into {} archived campaigns",
            self.matches.len(),
            rebuilt.history.len()
        );

        let written = write_campaign_history(&self.storage, &rebuilt.history)
            .and_then(|_| save_campaign_progress(&self.storage, &rebuilt.progress));
        if let Err(e) = written {
            self.restore_files();
            return Err(e.into());
        }
        self.campaign = rebuilt;

        info!(
            campaign = self.campaign.progress.campaign_number,
            archived = self.campaign.history.len(),
            "Rebuilt campaign"
        );
        Ok(&self.campaign)
    }
}
