use std::cmp::Reverse;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{matches_in_year, recent_form, CampaignStep};
use crate::models::{MatchId, MatchRecord, NewMatch};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct MatchListResponse {
    /// Most recently played first
    pub matches: Vec<MatchRecord>,
    pub total: usize,
    /// Last five results, oldest first (e.g. "WWDLW")
    pub form: String,
}

const FORM_LENGTH: usize = 5;

#[derive(Debug, Serialize)]
pub struct CreateMatchResponse {
    #[serde(rename = "match")]
    pub record: MatchRecord,
    pub campaign: CampaignStep,
}

fn validate(new: &NewMatch) -> Result<(), ApiError> {
    let blank = new
        .teammates
        .iter()
        .chain(&new.opponents)
        .any(|p| p.name.trim().is_empty());
    if blank {
        return Err(ApiError::BadRequest("player names must not be blank".to_string()));
    }
    Ok(())
}

pub async fn list_matches(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<MatchListResponse> {
    let ledger = state.ledger.lock().await;
    let mut matches = match params.year {
        Some(year) => matches_in_year(ledger.matches(), year),
        None => ledger.matches().to_vec(),
    };
    drop(ledger);

    let form = recent_form(&matches, FORM_LENGTH);
    matches.sort_by_key(|m| Reverse((m.date, m.created_at)));
    Json(MatchListResponse {
        total: matches.len(),
        matches,
        form,
    })
}

pub async fn create_match(
    State(state): State<AppState>,
    Json(new): Json<NewMatch>,
) -> Result<(StatusCode, Json<CreateMatchResponse>), ApiError> {
    validate(&new)?;
    let (record, campaign) = state.ledger.lock().await.record_match(new)?;
    Ok((
        StatusCode::CREATED,
        Json(CreateMatchResponse { record, campaign }),
    ))
}

pub async fn update_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(edit): Json<NewMatch>,
) -> Result<Json<MatchRecord>, ApiError> {
    validate(&edit)?;
    let updated = state
        .ledger
        .lock()
        .await
        .update_match(&MatchId::from(id), edit)?;
    Ok(Json(updated))
}

pub async fn delete_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MatchRecord>, ApiError> {
    let removed = state.ledger.lock().await.delete_match(&MatchId::from(id))?;
    Ok(Json(removed))
}
