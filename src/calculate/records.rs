//! Longest streaks, peak performances and active streaks.

use crate::models::{
    CurrentStreaks, HistoricalRecord, HistoricalRecords, MatchRecord, MatchResult, ResultStreak,
};

use super::chronological;

/// Running state for one streak predicate.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StreakTracker {
    current: u32,
    best: u32,
    best_runs: u32,
}

impl StreakTracker {
    /// Extend the current run on `hit`, reset it otherwise.
    pub(crate) fn observe(&mut self, hit: bool) {
        if !hit {
            self.current = 0;
            return;
        }

        self.current += 1;
        if self.current > self.best {
            self.best = self.current;
            self.best_runs = 1;
        } else if self.current == self.best {
            self.best_runs += 1;
        }
    }

    /// Length of the run ending at the last observation.
    pub(crate) fn current(&self) -> u32 {
        self.current
    }

    pub(crate) fn best(&self) -> u32 {
        self.best
    }

    fn record(&self) -> HistoricalRecord {
        HistoricalRecord::new(self.best, self.best_runs)
    }
}

/// Highest single-match value and how many matches tied it.
fn peak(values: impl Iterator<Item = u32> + Clone) -> HistoricalRecord {
    let max = values.clone().max().unwrap_or(0);
    if max == 0 {
        return HistoricalRecord::default();
    }
    let count = values.filter(|v| *v == max).count() as u32;
    HistoricalRecord::new(max, count)
}

/// Compute all-time streak and peak records in one pass over the history.
pub fn compute_historical_records(matches: &[MatchRecord]) -> HistoricalRecords {
    let sorted = chronological(matches);

    let mut win = StreakTracker::default();
    let mut undefeated = StreakTracker::default();
    let mut draw = StreakTracker::default();
    let mut loss = StreakTracker::default();
    let mut winless = StreakTracker::default();
    let mut goal = StreakTracker::default();
    let mut assist = StreakTracker::default();
    let mut goal_drought = StreakTracker::default();
    let mut assist_drought = StreakTracker::default();

    for m in &sorted {
        win.observe(m.result == MatchResult::Win);
        undefeated.observe(m.result != MatchResult::Loss);
        draw.observe(m.result == MatchResult::Draw);
        loss.observe(m.result == MatchResult::Loss);
        winless.observe(m.result != MatchResult::Win);
        goal.observe(m.goals_for > 0);
        assist.observe(m.assists > 0);
        goal_drought.observe(m.goals_for == 0);
        assist_drought.observe(m.assists == 0);
    }

    HistoricalRecords {
        longest_win_streak: win.record(),
        longest_undefeated_streak: undefeated.record(),
        longest_draw_streak: draw.record(),
        longest_loss_streak: loss.record(),
        longest_winless_streak: winless.record(),
        longest_goal_streak: goal.record(),
        longest_assist_streak: assist.record(),
        longest_goal_drought: goal_drought.record(),
        longest_assist_drought: assist_drought.record(),
        best_goal_performance: peak(sorted.iter().map(|m| m.goals_for)),
        best_assist_performance: peak(sorted.iter().map(|m| m.assists)),
    }
}

/// Count back from the most recent match while `predicate` holds.
fn trailing_run(sorted: &[&MatchRecord], predicate: impl Fn(&MatchRecord) -> bool) -> u32 {
    sorted.iter().rev().take_while(|m| predicate(m)).count() as u32
}

/// Results of the last `n` matches as letters, oldest first.
pub fn recent_form(matches: &[MatchRecord], n: usize) -> String {
    let sorted = chronological(matches);
    let start = sorted.len().saturating_sub(n);
    sorted[start..].iter().map(|m| m.result.letter()).collect()
}

/// Streaks still running at the most recent match.
pub fn compute_current_streaks(matches: &[MatchRecord]) -> CurrentStreaks {
    let sorted = chronological(matches);
    let Some(last) = sorted.last() else {
        return CurrentStreaks::default();
    };

    let same_result = trailing_run(&sorted, |m| m.result == last.result);
    let result_streak = (same_result >= 2).then_some(ResultStreak {
        result: last.result,
        count: same_result,
    });

    CurrentStreaks {
        result_streak,
        goal_streak: trailing_run(&sorted, |m| m.goals_for > 0),
        assist_streak: trailing_run(&sorted, |m| m.assists > 0),
        goal_drought: trailing_run(&sorted, |m| m.goals_for == 0),
        assist_drought: trailing_run(&sorted, |m| m.assists == 0),
        winless_streak: trailing_run(&sorted, |m| m.result != MatchResult::Win),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::{from_results, played};
    use pretty_assertions::assert_eq;
    use crate::models::MatchResult::{Draw as D, Loss as L, Win as W};

    #[test]
    fn test_empty_history_is_all_zero() {
        assert_eq!(compute_historical_records(&[]), HistoricalRecords::default());
    }

    #[test]
    fn test_two_distinct_runs_reaching_max() {
        let records = compute_historical_records(&from_results(&[W, W, L, W, W, D]));
        assert_eq!(records.longest_win_streak, HistoricalRecord::new(2, 2));
        assert_eq!(records.longest_undefeated_streak, HistoricalRecord::new(3, 1));
        assert_eq!(records.longest_loss_streak, HistoricalRecord::new(1, 1));
        assert_eq!(records.longest_draw_streak, HistoricalRecord::new(1, 1));
        assert_eq!(records.longest_winless_streak, HistoricalRecord::new(1, 2));
    }

    #[test]
    fn test_longer_run_resets_count() {
        let records = compute_historical_records(&from_results(&[W, L, W, L, W, W, W]));
        assert_eq!(records.longest_win_streak, HistoricalRecord::new(3, 1));
    }

    #[test]
    fn test_run_that_passes_old_max_is_counted_once() {
        // A 2-run, then a 3-run that passes through length 2 on the way.
        let records = compute_historical_records(&from_results(&[W, W, L, W, W, W]));
        assert_eq!(records.longest_win_streak, HistoricalRecord::new(3, 1));
    }

    #[test]
    fn test_streaks_use_date_order_not_input_order() {
        let matches = vec![played(3, W), played(1, W), played(2, L), played(0, W)];
        // Chronological: W(0) W(1) L(2) W(3)
        let records = compute_historical_records(&matches);
        assert_eq!(records.longest_win_streak, HistoricalRecord::new(2, 1));
    }

    #[test]
    fn test_goal_and_assist_streaks_and_droughts() {
        let matches = vec![
            played(0, W).with_output(1, 0),
            played(1, W).with_output(2, 0),
            played(2, L).with_output(0, 1),
            played(3, D).with_output(0, 1),
            played(4, D).with_output(0, 0),
            played(5, W).with_output(3, 2),
        ];
        let records = compute_historical_records(&matches);
        assert_eq!(records.longest_goal_streak, HistoricalRecord::new(2, 1));
        assert_eq!(records.longest_goal_drought, HistoricalRecord::new(3, 1));
        assert_eq!(records.longest_assist_streak, HistoricalRecord::new(2, 1));
        assert_eq!(records.longest_assist_drought, HistoricalRecord::new(2, 1));
    }

    #[test]
    fn test_best_goal_performance_counts_ties() {
        let matches = vec![
            played(0, W).with_output(4, 1),
            played(1, L).with_output(2, 0),
            played(2, W).with_output(4, 0),
        ];
        let records = compute_historical_records(&matches);
        assert_eq!(records.best_goal_performance, HistoricalRecord::new(4, 2));
        assert_eq!(records.best_assist_performance, HistoricalRecord::new(1, 1));
    }

    #[test]
    fn test_peak_of_zero_is_not_a_record() {
        let records = compute_historical_records(&from_results(&[W, L]));
        assert_eq!(records.best_goal_performance, HistoricalRecord::new(0, 0));
    }

    #[test]
    fn test_records_idempotent() {
        let matches = from_results(&[W, D, L, W, W]);
        assert_eq!(
            compute_historical_records(&matches),
            compute_historical_records(&matches)
        );
    }

    #[test]
    fn test_recent_form() {
        let matches = from_results(&[L, W, W, D, L, W]);
        assert_eq!(recent_form(&matches, 5), "WWDLW");
        assert_eq!(recent_form(&matches, 10), "LWWDLW");
        assert_eq!(recent_form(&[], 5), "");
    }

    #[test]
    fn test_current_streaks_empty() {
        assert_eq!(compute_current_streaks(&[]), CurrentStreaks::default());
    }

    #[test]
    fn test_current_streaks() {
        let matches = vec![
            played(0, W).with_output(1, 1),
            played(1, L).with_output(0, 1),
            played(2, L).with_output(0, 2),
            played(3, L).with_output(0, 1),
        ];
        let streaks = compute_current_streaks(&matches);
        assert_eq!(
            streaks.result_streak,
            Some(ResultStreak {
                result: L,
                count: 3
            })
        );
        assert_eq!(streaks.goal_streak, 0);
        assert_eq!(streaks.goal_drought, 3);
        assert_eq!(streaks.assist_streak, 4);
        assert_eq!(streaks.assist_drought, 0);
        assert_eq!(streaks.winless_streak, 3);
    }

    #[test]
    fn test_single_result_is_not_a_result_streak() {
        let streaks = compute_current_streaks(&from_results(&[L, W]));
        assert!(streaks.result_streak.is_none());
        assert_eq!(streaks.winless_streak, 0);
    }
}
