//! Campaign state files.

use std::fs;

use tracing::{debug, info};

use crate::models::{CampaignHistoryEntry, CampaignProgress};

use super::{JsonlReader, JsonlWriter, StorageConfig, StorageError};

/// Load the current campaign, or a fresh first campaign if none was saved.
pub fn load_campaign_progress(config: &StorageConfig) -> Result<CampaignProgress, StorageError> {
    let path = config.campaign_progress_path();
    if !path.exists() {
        debug!("No campaign progress at {:?}, starting fresh", path);
        return Ok(CampaignProgress::default());
    }

    let content = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Persist the current campaign.
pub fn save_campaign_progress(
    config: &StorageConfig,
    progress: &CampaignProgress,
) -> Result<(), StorageError> {
    fs::create_dir_all(config.state_dir())?;

    let path = config.campaign_progress_path();
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, serde_json::to_string_pretty(progress)?)?;
    fs::rename(&tmp_path, &path)?;

    debug!(
        campaign = progress.campaign_number,
        stage = %progress.current_stage,
        "Saved campaign progress"
    );
    Ok(())
}

pub fn read_campaign_history(
    config: &StorageConfig,
) -> Result<Vec<CampaignHistoryEntry>, StorageError> {
    JsonlReader::new(config.campaign_history_path()).read_all()
}

/// Append a finished campaign to the archive.
pub fn append_campaign_history(
    config: &StorageConfig,
    entry: &CampaignHistoryEntry,
) -> Result<(), StorageError> {
    JsonlWriter::new(config.campaign_history_path()).append(entry)?;
    info!(
        campaign = entry.campaign_number,
        final_stage = %entry.final_stage,
        champion = entry.champion,
        "Archived campaign"
    );
    Ok(())
}

/// Replace the whole archive. Only used when rebuilding the campaign.
pub fn write_campaign_history(
    config: &StorageConfig,
    history: &[CampaignHistoryEntry],
) -> Result<usize, StorageError> {
    JsonlWriter::new(config.campaign_history_path()).write_all(history)
}
