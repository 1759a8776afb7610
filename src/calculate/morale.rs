//! Morale: a recency-weighted form score over the latest matches.
//!
//! Each match is valued from its result and the tracked player's goals and
//! assists, normalized to `[0, 1]`. The most recent matches weigh more
//! (geometric decay), and the weighted mean is scaled to 0-100 and bucketed
//! into a [`MoraleLevel`]. The trend compares the recent window with the
//! window of the same size right before it.

use crate::models::{
    MatchRecord, MoraleLevel, PlayerMorale, RecentWindowSummary, Trend, WinLossRecord,
};

use super::chronological;

/// Matches in the recent (and prior) window.
pub const MORALE_WINDOW: usize = 5;

/// Weight ratio between a match and the one played right after it.
pub const RECENCY_DECAY: f64 = 0.8;

/// Score difference the trend must exceed to count as up or down.
pub const TREND_TOLERANCE: f64 = 5.0;

const GOAL_WEIGHT: f64 = 1.0;
const ASSIST_WEIGHT: f64 = 0.75;

/// Raw value of a standout match (a win with two goals and an assist or so).
const MATCH_VALUE_CEILING: f64 = 6.0;

/// Value of one match in `[0, 1]`.
fn match_value(m: &MatchRecord) -> f64 {
    let raw = m.result.points() as f64
        + m.goals_for as f64 * GOAL_WEIGHT
        + m.assists as f64 * ASSIST_WEIGHT;
    (raw / MATCH_VALUE_CEILING).clamp(0.0, 1.0)
}

/// Recency-weighted score of a chronological window, 0-100.
fn window_score(window: &[&MatchRecord]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }

    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for (age, m) in window.iter().rev().enumerate() {
        let weight = RECENCY_DECAY.powi(age as i32);
        weighted += weight * match_value(m);
        total_weight += weight;
    }

    (weighted / total_weight * 100.0).clamp(0.0, 100.0)
}

fn summarize(window: &[&MatchRecord]) -> RecentWindowSummary {
    let mut record = WinLossRecord::default();
    let mut goals = 0;
    let mut assists = 0;
    for m in window {
        record.add(m.result);
        goals += m.goals_for;
        assists += m.assists;
    }

    RecentWindowSummary {
        matches_considered: window.len() as u32,
        record,
        goals,
        assists,
    }
}

/// Compare two window scores.
pub fn trend_between(recent: f64, prior: f64) -> Trend {
    let delta = recent - prior;
    if delta > TREND_TOLERANCE {
        Trend::Up
    } else if delta < -TREND_TOLERANCE {
        Trend::Down
    } else {
        Trend::Same
    }
}

/// Compute the tracked player's morale, `None` with no matches.
pub fn compute_morale(matches: &[MatchRecord]) -> Option<PlayerMorale> {
    if matches.is_empty() {
        return None;
    }

    let sorted = chronological(matches);
    let recent_start = sorted.len().saturating_sub(MORALE_WINDOW);
    let recent = &sorted[recent_start..];
    let score = window_score(recent);

    let trend = if sorted.len() < MORALE_WINDOW * 2 {
        Trend::New
    } else {
        let prior = &sorted[recent_start - MORALE_WINDOW..recent_start];
        trend_between(score, window_score(prior))
    };

    Some(PlayerMorale {
        level: MoraleLevel::from_score(score),
        score,
        trend,
        recent: summarize(recent),
    })
}
