use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::CampaignState;
use crate::models::CampaignProgress;

/// Current campaign progress and the archive of finished campaigns.
pub async fn get_campaign(State(state): State<AppState>) -> Json<CampaignState> {
    Json(state.ledger.lock().await.campaign().clone())
}

pub async fn clear_champion(
    State(state): State<AppState>,
) -> Result<Json<CampaignProgress>, ApiError> {
    let mut ledger = state.ledger.lock().await;
    let progress = ledger.clear_champion()?.clone();
    Ok(Json(progress))
}
