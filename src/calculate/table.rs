//! Season and tournament tables.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;

use crate::models::{MatchRecord, PeriodStats, SeasonTable};

fn tournament_label(m: &MatchRecord) -> Option<&str> {
    m.tournament
        .as_deref()
        .map(str::trim)
        .filter(|label| !label.is_empty())
}

/// Aggregate matches per calendar year and per tournament.
pub fn compute_season_table(matches: &[MatchRecord]) -> SeasonTable {
    let mut years: BTreeMap<i32, PeriodStats> = BTreeMap::new();
    let mut tournaments: BTreeMap<&str, PeriodStats> = BTreeMap::new();

    for m in matches {
        let year = m.date.year();
        years
            .entry(year)
            .or_insert_with(|| PeriodStats::new(year.to_string()))
            .add(m);

        if let Some(label) = tournament_label(m) {
            tournaments
                .entry(label)
                .or_insert_with(|| PeriodStats::new(label))
                .add(m);
        }
    }

    let mut tournaments: Vec<PeriodStats> = tournaments.into_values().collect();
    // Stable sort keeps label order for equal points.
    tournaments.sort_by(|a, b| b.points.cmp(&a.points));

    SeasonTable {
        years: years.into_values().rev().collect(),
        tournaments,
    }
}

/// Distinct tournament labels, sorted.
pub fn available_tournaments(matches: &[MatchRecord]) -> Vec<String> {
    matches
        .iter()
        .filter_map(tournament_label)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Matches played in the given calendar year.
pub fn matches_in_year(matches: &[MatchRecord], year: i32) -> Vec<MatchRecord> {
    matches
        .iter()
        .filter(|m| m.date.year() == year)
        .cloned()
        .collect()
}
