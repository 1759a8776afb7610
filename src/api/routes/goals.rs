use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::compute_goal_progress;
use crate::models::{Goal, GoalMetric, GoalPeriod, GoalProgress, GoalType, YearMonth};

#[derive(Debug, Deserialize)]
pub struct GoalParams {
    pub metric: GoalMetric,
    /// Defaults to the metric's first goal type
    pub goal_type: Option<GoalType>,
    pub target: f64,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub from: Option<YearMonth>,
    pub to: Option<YearMonth>,
}

impl GoalParams {
    fn into_goal(self) -> Result<Goal, ApiError> {
        let goal_type = self
            .goal_type
            .unwrap_or_else(|| self.metric.default_goal_type());
        let period = GoalPeriod::from_parts(self.year, self.from, self.to)?;
        let goal = Goal::new(self.metric, goal_type, self.target)?.with_period(period)?;
        Ok(match self.title {
            Some(title) => goal.with_title(title),
            None => goal,
        })
    }
}

/// Progress of a goal described in the query string.
pub async fn goal_progress(
    State(state): State<AppState>,
    Query(params): Query<GoalParams>,
) -> Result<Json<GoalProgress>, ApiError> {
    let goal = params.into_goal()?;
    let ledger = state.ledger.lock().await;
    Ok(Json(compute_goal_progress(&goal, ledger.matches())))
}
