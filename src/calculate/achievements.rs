//! Streak-based achievement conditions.

use crate::models::{AchievementCondition, AchievementMetric, MatchRecord, MatchResult};

use super::chronological;
use super::records::StreakTracker;

/// Whether a match extends the run the metric counts.
fn extends_run(metric: AchievementMetric, m: &MatchRecord) -> bool {
    match metric {
        AchievementMetric::WinStreak => m.is_win(),
        AchievementMetric::LossStreak | AchievementMetric::BreakWinAfterLossStreak => {
            m.result == MatchResult::Loss
        }
        AchievementMetric::UndefeatedStreak => m.result != MatchResult::Loss,
        AchievementMetric::WinlessStreak
        | AchievementMetric::BreakUndefeatedAfterWinlessStreak => !m.is_win(),
        AchievementMetric::GoalStreak => m.goals_for > 0,
        AchievementMetric::AssistStreak => m.assists > 0,
        AchievementMetric::GoalDrought => m.goals_for == 0,
        AchievementMetric::AssistDrought => m.assists == 0,
    }
}

/// For the "break" metrics, whether a match ends the run in style.
/// `None` for plain streak metrics.
fn breaks_run(metric: AchievementMetric, m: &MatchRecord) -> Option<bool> {
    match metric {
        AchievementMetric::BreakWinAfterLossStreak => Some(m.is_win()),
        AchievementMetric::BreakUndefeatedAfterWinlessStreak => {
            Some(m.result != MatchResult::Loss)
        }
        _ => None,
    }
}

/// True if the condition is met within its window of most recent matches.
///
/// Streak metrics need a run of at least `threshold` matches. Break metrics
/// need such a run to be followed directly by the breaking match.
pub fn evaluate_condition(condition: &AchievementCondition, matches: &[MatchRecord]) -> bool {
    let sorted = chronological(matches);
    let start = match condition.window {
        0 => 0,
        window => sorted.len().saturating_sub(window),
    };
    let metric = condition.metric;

    let mut tracker = StreakTracker::default();
    let mut is_break_metric = false;
    for m in &sorted[start..] {
        if let Some(breaks) = breaks_run(metric, m) {
            is_break_metric = true;
            if breaks && tracker.current() >= condition.threshold {
                return true;
            }
        }
        tracker.observe(extends_run(metric, m));
    }

    !is_break_metric && !sorted[start..].is_empty() && tracker.best() >= condition.threshold
}
