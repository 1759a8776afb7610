//! Progress towards personal goals.

use std::collections::BTreeMap;

use chrono::Datelike;

use super::{compute_historical_records, per_match};
use crate::models::{
    Goal, GoalDifficulty, GoalMetric, GoalProgress, GoalType, HistoricalRecords, MatchRecord,
    WinLossRecord,
};

/// Target multiple of the historical best above which a goal is epic.
const EPIC_FACTOR: f64 = 1.5;

fn records(matches: &[&MatchRecord]) -> HistoricalRecords {
    let owned: Vec<MatchRecord> = matches.iter().map(|m| (*m).clone()).collect();
    compute_historical_records(&owned)
}

/// Value of `metric` over `matches`, read the way `goal_type` reads it.
fn metric_value(metric: GoalMetric, goal_type: GoalType, matches: &[&MatchRecord]) -> f64 {
    if goal_type == GoalType::Peak {
        let records = records(matches);
        return match metric {
            GoalMetric::Assists => records.best_assist_performance.value as f64,
            _ => records.best_goal_performance.value as f64,
        };
    }

    let mut record = WinLossRecord::default();
    let mut goals = 0;
    let mut assists = 0;
    for m in matches {
        record.add(m.result);
        goals += m.goals_for;
        assists += m.assists;
    }
    let played = record.total_games();

    match metric {
        GoalMetric::Goals => goals as f64,
        GoalMetric::Assists => assists as f64,
        GoalMetric::Wins => record.wins as f64,
        GoalMetric::WinRate => record.win_rate(),
        GoalMetric::UndefeatedRate => per_match(record.wins + record.draws, played) * 100.0,
        GoalMetric::GoalsPerMatch => per_match(goals, played),
        GoalMetric::LongestWinStreak => records(matches).longest_win_streak.value as f64,
        GoalMetric::LongestUndefeatedStreak => {
            records(matches).longest_undefeated_streak.value as f64
        }
    }
}

/// Best value the metric has reached: all-time for peaks and streaks, the
/// best calendar year for everything else.
fn historical_best(goal: &Goal, matches: &[MatchRecord], current: f64) -> f64 {
    if goal.bounds().is_none() {
        return current;
    }

    let all: Vec<&MatchRecord> = matches.iter().collect();
    if goal.goal_type == GoalType::Streak {
        return metric_value(goal.metric, goal.goal_type, &all);
    }

    let mut seasons: BTreeMap<i32, Vec<&MatchRecord>> = BTreeMap::new();
    for m in matches {
        seasons.entry(m.date.year()).or_default().push(m);
    }
    seasons
        .values()
        .map(|season| metric_value(goal.metric, goal.goal_type, season))
        .fold(0.0, f64::max)
}

fn difficulty(target: f64, current: f64, best: f64) -> GoalDifficulty {
    if target <= current {
        GoalDifficulty::Easy
    } else if target <= best {
        GoalDifficulty::Challenging
    } else if target > best * EPIC_FACTOR {
        GoalDifficulty::Epic
    } else {
        GoalDifficulty::NewRecord
    }
}

/// Measure a goal against the logged matches.
///
/// Only matches inside the goal's dates count towards `current`. Peak goals
/// carry no dates and always look at every match.
pub fn compute_goal_progress(goal: &Goal, matches: &[MatchRecord]) -> GoalProgress {
    let relevant: Vec<&MatchRecord> = matches.iter().filter(|m| goal.covers(m.date)).collect();
    let current = metric_value(goal.metric, goal.goal_type, &relevant);
    let best = historical_best(goal, matches, current);
    let percent = (current / goal.target * 100.0).min(100.0);

    GoalProgress {
        goal: goal.clone(),
        current,
        historical_best: best,
        target: goal.target,
        achieved: current >= goal.target,
        percent,
        difficulty: difficulty(goal.target, current, best),
    }
}
