//! Statistics calculation engine.
//!
//! Computes derived metrics from the logged matches:
//! - Longest streaks, peak performances and active streaks
//! - Morale score and trend
//! - Teammate/opponent impact rankings and the players leaderboard
//! - Campaign bracket progression
//! - Season and tournament tables, achievement conditions
//! - Progress towards personal goals
//!
//! Everything except the campaign fold is a pure function of the match list
//! and does not care about the order matches are passed in.

pub mod achievements;
pub mod cache;
pub mod campaign;
pub mod duels;
pub mod goals;
pub mod leaderboard;
pub mod morale;
pub mod records;
pub mod table;

pub use achievements::evaluate_condition;
pub use cache::{AnalyticsCache, AnalyticsSnapshot};
pub use campaign::{apply_match, clear_champion, replay_campaign, CampaignState, CampaignStep};
pub use duels::compute_duel_stats;
pub use goals::compute_goal_progress;
pub use leaderboard::compute_leaderboard;
pub use morale::compute_morale;
pub use records::{compute_current_streaks, compute_historical_records, recent_form};
pub use table::{available_tournaments, compute_season_table, matches_in_year};

use crate::models::MatchRecord;

/// Matches in the order they were played.
///
/// Same-day matches are ordered by creation time, then by input position.
pub fn chronological(matches: &[MatchRecord]) -> Vec<&MatchRecord> {
    let mut sorted: Vec<&MatchRecord> = matches.iter().collect();
    sorted.sort_by_key(|m| (m.date, m.created_at));
    sorted
}

/// Matches in the order they were logged.
pub fn creation_order(matches: &[MatchRecord]) -> Vec<&MatchRecord> {
    let mut sorted: Vec<&MatchRecord> = matches.iter().collect();
    sorted.sort_by_key(|m| m.created_at);
    sorted
}

/// Calculate a per-match rate, 0 when no matches were played.
pub fn per_match(total: u32, matches: u32) -> f64 {
    if matches == 0 {
        0.0
    } else {
        total as f64 / matches as f64
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchResult;
    use chrono::Duration;

    #[test]
    fn test_chronological_sorts_by_date() {
        let matches = vec![
            fixtures::played(5, MatchResult::Win),
            fixtures::played(1, MatchResult::Loss),
            fixtures::played(3, MatchResult::Draw),
        ];
        let sorted: Vec<_> = chronological(&matches).iter().map(|m| m.result).collect();
        assert_eq!(
            sorted,
            vec![MatchResult::Loss, MatchResult::Draw, MatchResult::Win]
        );
    }

    #[test]
    fn test_chronological_same_day_uses_creation_time() {
        let mut late = fixtures::played(2, MatchResult::Win);
        late.created_at += Duration::hours(1);
        let early = fixtures::played(2, MatchResult::Loss);

        let matches = vec![late, early];
        let sorted = chronological(&matches);
        assert_eq!(sorted[0].result, MatchResult::Loss);
        assert_eq!(sorted[1].result, MatchResult::Win);
    }

    #[test]
    fn test_chronological_full_tie_keeps_input_order() {
        let a = fixtures::played(2, MatchResult::Win);
        let mut b = fixtures::played(2, MatchResult::Draw);
        b.created_at = a.created_at;

        let matches = vec![b, a];
        let sorted = chronological(&matches);
        assert_eq!(sorted[0].result, MatchResult::Draw);
        assert_eq!(sorted[1].result, MatchResult::Win);
    }

    #[test]
    fn test_creation_order_ignores_match_date() {
        let mut first_logged = fixtures::played(10, MatchResult::Win);
        first_logged.created_at -= Duration::days(30);
        let second_logged = fixtures::played(1, MatchResult::Loss);

        let matches = vec![second_logged, first_logged];
        let sorted = creation_order(&matches);
        assert_eq!(sorted[0].result, MatchResult::Win);
    }

    #[test]
    fn test_per_match() {
        assert_eq!(per_match(6, 3), 2.0);
        assert_eq!(per_match(5, 0), 0.0);
    }
}
