//! Teammate and opponent impact rankings.
//!
//! Every shared match adds a weighted score to each listed player: the
//! result (weighted differently for teammates and opponents), the tracked
//! player's goals and assists, the goal differential, and the player's own
//! goals and assists (credited to teammates, debited to opponents). The
//! accumulated score is divided by `matches + K`, which shrinks small
//! samples toward zero.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::models::{
    DuelReport, DuelRole, DuelStats, MatchRecord, MatchResult, PlayerContribution, PlayerKey,
    Trend, WinLossRecord,
};

use super::{chronological, per_match};

/// Ghost matches added to every impact denominator.
pub const SMOOTHING_MATCHES: f64 = 5.0;

const TRACKED_GOAL_WEIGHT: f64 = 1.5;
const TRACKED_ASSIST_WEIGHT: f64 = 1.0;
const GOAL_DIFFERENTIAL_WEIGHT: f64 = 0.25;

/// Weights that depend on which side the player was on.
struct RoleWeights {
    win: f64,
    draw: f64,
    loss: f64,
    own_goal: f64,
    own_assist: f64,
}

const TEAMMATE_WEIGHTS: RoleWeights = RoleWeights {
    win: 3.0,
    draw: 1.0,
    loss: -1.0,
    own_goal: 0.75,
    own_assist: 0.5,
};

const OPPONENT_WEIGHTS: RoleWeights = RoleWeights {
    win: 3.0,
    draw: 1.0,
    loss: -2.0,
    own_goal: -0.75,
    own_assist: -0.5,
};

impl RoleWeights {
    fn for_role(role: DuelRole) -> &'static RoleWeights {
        match role {
            DuelRole::Teammate => &TEAMMATE_WEIGHTS,
            DuelRole::Opponent => &OPPONENT_WEIGHTS,
        }
    }

    fn result(&self, result: MatchResult) -> f64 {
        match result {
            MatchResult::Win => self.win,
            MatchResult::Draw => self.draw,
            MatchResult::Loss => self.loss,
        }
    }
}

/// Shrink an accumulated score by the number of shared matches.
pub fn impact_score(accumulated: f64, matches_played: u32) -> f64 {
    accumulated / (matches_played as f64 + SMOOTHING_MATCHES)
}

/// Score one match adds to a player listed in it.
fn match_score(m: &MatchRecord, role: DuelRole, own_goals: u32, own_assists: u32) -> f64 {
    let weights = RoleWeights::for_role(role);
    weights.result(m.result)
        + m.goals_for as f64 * TRACKED_GOAL_WEIGHT
        + m.assists as f64 * TRACKED_ASSIST_WEIGHT
        + m.goal_differential.unwrap_or(0) as f64 * GOAL_DIFFERENTIAL_WEIGHT
        + own_goals as f64 * weights.own_goal
        + own_assists as f64 * weights.own_assist
}

#[derive(Debug, Default)]
struct Accumulator {
    name: String,
    matches_played: u32,
    record: WinLossRecord,
    own_goals: u32,
    own_assists: u32,
    tracked_goals: u32,
    tracked_assists: u32,
    raw_score: f64,
}

impl Accumulator {
    fn impact(&self) -> f64 {
        impact_score(self.raw_score, self.matches_played)
    }
}

/// Players listed on one side of a match, merged by key.
///
/// A name listed twice in the same match counts as one appearance with the
/// summed goals and assists.
fn listed_players<'a>(
    players: &'a [PlayerContribution],
    exclude: Option<&PlayerKey>,
) -> BTreeMap<PlayerKey, (&'a str, u32, u32)> {
    let mut listed: BTreeMap<PlayerKey, (&'a str, u32, u32)> = BTreeMap::new();
    for p in players {
        let Some(key) = p.key() else { continue };
        if exclude == Some(&key) {
            continue;
        }
        let entry = listed.entry(key).or_insert((p.name.trim(), 0, 0));
        entry.1 += p.goals;
        entry.2 += p.assists;
    }
    listed
}

/// Aggregate one role over chronologically sorted matches.
fn aggregate(
    sorted: &[&MatchRecord],
    role: DuelRole,
    tracked: Option<&PlayerKey>,
) -> HashMap<PlayerKey, Accumulator> {
    let mut players: HashMap<PlayerKey, Accumulator> = HashMap::new();

    for m in sorted {
        let (list, exclude) = match role {
            DuelRole::Teammate => (&m.teammates, tracked),
            DuelRole::Opponent => (&m.opponents, None),
        };

        for (key, (name, goals, assists)) in listed_players(list, exclude) {
            let acc = players.entry(key).or_insert_with(|| Accumulator {
                name: name.to_string(),
                ..Default::default()
            });
            acc.matches_played += 1;
            acc.record.add(m.result);
            acc.own_goals += goals;
            acc.own_assists += assists;
            acc.tracked_goals += m.goals_for;
            acc.tracked_assists += m.assists;
            acc.raw_score += match_score(m, role, goals, assists);
        }
    }

    players
}

/// Sort by descending impact, ties by key.
fn ranked(players: HashMap<PlayerKey, Accumulator>) -> Vec<(PlayerKey, Accumulator)> {
    let mut rows: Vec<(PlayerKey, Accumulator)> = players.into_iter().collect();
    rows.sort_by(|(ka, a), (kb, b)| match b.impact().total_cmp(&a.impact()) {
        Ordering::Equal => ka.cmp(kb),
        other => other,
    });
    rows
}

fn rank_change(now: usize, before: Option<usize>) -> Trend {
    match before {
        None => Trend::New,
        Some(before) => match now.cmp(&before) {
            Ordering::Less => Trend::Up,
            Ordering::Greater => Trend::Down,
            Ordering::Equal => Trend::Same,
        },
    }
}

fn role_ranking(sorted: &[&MatchRecord], role: DuelRole, tracked: Option<&PlayerKey>) -> Vec<DuelStats> {
    let current = ranked(aggregate(sorted, role, tracked));

    let previous_positions: HashMap<PlayerKey, usize> = if sorted.len() > 1 {
        ranked(aggregate(&sorted[..sorted.len() - 1], role, tracked))
            .into_iter()
            .enumerate()
            .map(|(i, (key, _))| (key, i))
            .collect()
    } else {
        HashMap::new()
    };

    current
        .into_iter()
        .enumerate()
        .map(|(position, (key, acc))| {
            let impact = acc.impact();
            let n = acc.matches_played;
            DuelStats {
                role,
                matches_played: n,
                record: acc.record,
                own_goals: acc.own_goals,
                own_assists: acc.own_assists,
                tracked_goals: acc.tracked_goals,
                tracked_assists: acc.tracked_assists,
                win_rate: acc.record.win_rate(),
                goals_per_match: per_match(acc.tracked_goals, n),
                assists_per_match: per_match(acc.tracked_assists, n),
                contributions_per_match: per_match(acc.tracked_goals + acc.tracked_assists, n),
                impact_score: impact,
                rank_change: rank_change(position, previous_positions.get(&key).copied()),
                name: acc.name,
            }
        })
        .collect()
}

/// Rank every teammate and opponent of the tracked player by impact.
///
/// `tracked_player` is only used to drop the tracked player from teammate
/// lists; a blank name excludes nobody.
pub fn compute_duel_stats(matches: &[MatchRecord], tracked_player: &str) -> DuelReport {
    let sorted = chronological(matches);
    let tracked = PlayerKey::new(tracked_player);

    DuelReport {
        teammates: role_ranking(&sorted, DuelRole::Teammate, tracked.as_ref()),
        opponents: role_ranking(&sorted, DuelRole::Opponent, tracked.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::played;
    use crate::models::MatchResult::{Draw as D, Loss as L, Win as W};

    fn mate(name: &str) -> PlayerContribution {
        PlayerContribution::new(name, 0, 0)
    }

    fn names(rows: &[DuelStats]) -> Vec<&str> {
        rows.iter().map(|d| d.name.as_str()).collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(compute_duel_stats(&[], "Me"), DuelReport::default());
    }

    #[test]
    fn test_teammate_score_terms() {
        let m = played(0, W)
            .with_output(1, 1)
            .with_goal_differential(2)
            .with_teammate(PlayerContribution::new("Ana", 1, 0));
        let report = compute_duel_stats(&[m], "Me");

        let ana = &report.teammates[0];
        // 3 + 1.5 + 1.0 + 0.5 + 0.75
        assert!(close(ana.impact_score, 6.75 / 6.0));
        assert_eq!(ana.matches_played, 1);
        assert_eq!(ana.record, WinLossRecord::new(1, 0, 0));
        assert_eq!(ana.own_goals, 1);
        assert_eq!(ana.tracked_contributions(), 2);
        assert_eq!(ana.role, DuelRole::Teammate);
    }

    #[test]
    fn test_opponent_own_output_is_subtracted() {
        let m = played(0, W)
            .with_output(1, 1)
            .with_goal_differential(2)
            .with_opponent(PlayerContribution::new("Bruno", 1, 1));
        let report = compute_duel_stats(&[m], "Me");

        // 3 + 1.5 + 1.0 + 0.5 - 0.75 - 0.5
        assert!(close(report.opponents[0].impact_score, 4.75 / 6.0));
        assert!(report.teammates.is_empty());
    }

    #[test]
    fn test_loss_weights_are_asymmetric() {
        let m = played(0, L).with_teammate(mate("Ana")).with_opponent(mate("Bruno"));
        let report = compute_duel_stats(&[m], "Me");
        assert!(close(report.teammates[0].impact_score, -1.0 / 6.0));
        assert!(close(report.opponents[0].impact_score, -2.0 / 6.0));
    }

    #[test]
    fn test_missing_goal_differential_counts_as_zero() {
        let with_zero = played(0, D).with_goal_differential(0).with_teammate(mate("Ana"));
        let without = played(0, D).with_teammate(mate("Ana"));
        assert_eq!(
            compute_duel_stats(&[with_zero], "Me").teammates[0].impact_score,
            compute_duel_stats(&[without], "Me").teammates[0].impact_score
        );
    }

    #[test]
    fn test_tracked_player_excluded_from_teammates() {
        let m = played(0, W).with_teammate(mate(" me ")).with_teammate(mate("Ana"));
        let report = compute_duel_stats(&[m], "Me");
        assert_eq!(names(&report.teammates), vec!["Ana"]);
    }

    #[test]
    fn test_names_merge_case_insensitively_keeping_first_spelling() {
        let matches = vec![
            played(1, W).with_teammate(mate("ana ")),
            played(0, W).with_teammate(mate("Ana")),
        ];
        let report = compute_duel_stats(&matches, "Me");
        assert_eq!(report.teammates.len(), 1);
        assert_eq!(report.teammates[0].name, "Ana");
        assert_eq!(report.teammates[0].matches_played, 2);
    }

    #[test]
    fn test_blank_names_skipped() {
        let m = played(0, W).with_teammate(mate("  ")).with_opponent(mate(""));
        assert_eq!(compute_duel_stats(&[m], "Me"), DuelReport::default());
    }

    #[test]
    fn test_duplicate_listing_counts_one_match() {
        let m = played(0, W)
            .with_teammate(PlayerContribution::new("Ana", 1, 0))
            .with_teammate(PlayerContribution::new("ANA", 1, 1));
        let report = compute_duel_stats(&[m], "Me");
        let ana = &report.teammates[0];
        assert_eq!(ana.matches_played, 1);
        assert_eq!(ana.own_goals, 2);
        assert_eq!(ana.own_assists, 1);
    }

    #[test]
    fn test_sorted_by_descending_impact() {
        let matches = vec![
            played(0, L).with_teammate(mate("Low")),
            played(1, W).with_teammate(mate("High")),
            played(2, D).with_teammate(mate("Mid")),
        ];
        let report = compute_duel_stats(&matches, "Me");
        assert_eq!(names(&report.teammates), vec!["High", "Mid", "Low"]);
    }

    #[test]
    fn test_rank_change_against_one_match_earlier() {
        let matches = vec![
            played(0, W).with_teammate(mate("A")).with_opponent(mate("D")),
            played(1, W).with_teammate(mate("B")),
            played(2, W).with_teammate(mate("B")).with_teammate(mate("C")),
        ];
        let report = compute_duel_stats(&matches, "Me");

        // Before the last match A and B tie and A wins on name.
        assert_eq!(names(&report.teammates), vec!["B", "A", "C"]);
        let trends: Vec<Trend> = report.teammates.iter().map(|d| d.rank_change).collect();
        assert_eq!(trends, vec![Trend::Up, Trend::Down, Trend::New]);
        assert_eq!(report.opponents[0].rank_change, Trend::Same);
    }

    #[test]
    fn test_single_match_everyone_new() {
        let m = played(0, W).with_teammate(mate("A")).with_opponent(mate("B"));
        let report = compute_duel_stats(&[m], "Me");
        assert_eq!(report.teammates[0].rank_change, Trend::New);
        assert_eq!(report.opponents[0].rank_change, Trend::New);
    }

    #[test]
    fn test_impact_monotonic_in_raw_score() {
        for n in 1..20 {
            assert!(impact_score(10.0, n) > impact_score(9.5, n));
            assert!(impact_score(-9.5, n) > impact_score(-10.0, n));
        }
    }

    #[test]
    fn test_impact_approaches_unshrunk_average() {
        let average = 3.0;
        let mut last = 0.0;
        for n in [1u32, 2, 5, 10, 50, 200] {
            let matches: Vec<MatchRecord> = (0..n as i64)
                .map(|d| played(d, W).with_teammate(mate("Ana")))
                .collect();
            let impact = compute_duel_stats(&matches, "Me").teammates[0].impact_score;
            assert!(impact > last);
            assert!(impact < average);
            last = impact;
        }
        assert!(average - last < 0.1);
    }

    #[test]
    fn test_per_match_rates_use_tracked_output() {
        let matches = vec![
            played(0, W).with_output(2, 0).with_teammate(mate("Ana")),
            played(1, L).with_output(0, 1).with_teammate(mate("Ana")),
        ];
        let ana = &compute_duel_stats(&matches, "Me").teammates[0];
        assert!(close(ana.goals_per_match, 1.0));
        assert!(close(ana.assists_per_match, 0.5));
        assert!(close(ana.contributions_per_match, 1.5));
        assert!(close(ana.win_rate, 50.0));
    }

    #[test]
    fn test_duels_idempotent() {
        let matches = vec![
            played(0, W).with_teammate(mate("A")).with_opponent(mate("X")),
            played(1, L).with_teammate(mate("B")).with_opponent(mate("X")),
        ];
        assert_eq!(
            compute_duel_stats(&matches, "Me"),
            compute_duel_stats(&matches, "Me")
        );
    }
}
