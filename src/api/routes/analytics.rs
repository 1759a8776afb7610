use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::calculate::{
    available_tournaments, compute_season_table, matches_in_year, AnalyticsSnapshot,
};
use crate::models::{
    CurrentStreaks, DuelInsights, DuelStats, HistoricalRecords, LeaderboardEntry, MatchRecord,
    PeriodStats, PlayerMorale,
};

const DEFAULT_INSIGHT_LIMIT: usize = 3;

#[derive(Debug, Deserialize)]
pub struct YearParams {
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct DuelParams {
    pub year: Option<i32>,
    pub limit: Option<usize>,
}

/// Snapshot of the ledger's matches, optionally narrowed to one year.
async fn selected_matches(state: &AppState, year: Option<i32>) -> Vec<MatchRecord> {
    let ledger = state.ledger.lock().await;
    match year {
        Some(year) => matches_in_year(ledger.matches(), year),
        None => ledger.matches().to_vec(),
    }
}

async fn snapshot(state: &AppState, year: Option<i32>) -> Arc<AnalyticsSnapshot> {
    let matches = selected_matches(state, year).await;
    state
        .cache
        .lock()
        .await
        .get_or_compute(&matches, &state.player)
}

pub async fn records(
    State(state): State<AppState>,
    Query(params): Query<YearParams>,
) -> Json<HistoricalRecords> {
    Json(snapshot(&state, params.year).await.records.clone())
}

pub async fn current_streaks(
    State(state): State<AppState>,
    Query(params): Query<YearParams>,
) -> Json<CurrentStreaks> {
    Json(snapshot(&state, params.year).await.current_streaks)
}

/// `null` until a match has been logged.
pub async fn morale(
    State(state): State<AppState>,
    Query(params): Query<YearParams>,
) -> Json<Option<PlayerMorale>> {
    Json(snapshot(&state, params.year).await.morale.clone())
}

#[derive(Debug, Serialize)]
pub struct DuelsResponse {
    pub teammates: Vec<DuelStats>,
    pub opponents: Vec<DuelStats>,
    pub insights: DuelInsights,
}

pub async fn duels(
    State(state): State<AppState>,
    Query(params): Query<DuelParams>,
) -> Json<DuelsResponse> {
    let snapshot = snapshot(&state, params.year).await;
    let insights = snapshot
        .duels
        .insights(params.limit.unwrap_or(DEFAULT_INSIGHT_LIMIT));

    Json(DuelsResponse {
        teammates: snapshot.duels.teammates.clone(),
        opponents: snapshot.duels.opponents.clone(),
        insights,
    })
}

pub async fn players(
    State(state): State<AppState>,
    Query(params): Query<YearParams>,
) -> Json<Vec<LeaderboardEntry>> {
    Json(snapshot(&state, params.year).await.leaderboard.clone())
}

#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub years: Vec<PeriodStats>,
    pub tournaments: Vec<PeriodStats>,
    pub available_tournaments: Vec<String>,
}

pub async fn table(
    State(state): State<AppState>,
    Query(params): Query<YearParams>,
) -> Json<TableResponse> {
    let matches = selected_matches(&state, params.year).await;
    let table = compute_season_table(&matches);

    Json(TableResponse {
        years: table.years,
        tournaments: table.tournaments,
        available_tournaments: available_tournaments(&matches),
    })
}
