//! Flat players leaderboard across both roles.

use std::collections::HashMap;

use crate::models::{LeaderboardEntry, MatchRecord, PlayerContribution, PlayerKey, WinLossRecord};

use super::chronological;

struct Row {
    name: String,
    record: WinLossRecord,
    goals: u32,
    assists: u32,
}

/// One player's listing in a match: key, spelling, goals, assists.
type Appearance<'a> = (PlayerKey, &'a str, u32, u32);

fn merge<'a>(out: &mut Vec<Appearance<'a>>, key: PlayerKey, p: &'a PlayerContribution) {
    match out.iter_mut().find(|a| a.0 == key) {
        Some(existing) => {
            existing.2 += p.goals;
            existing.3 += p.assists;
        }
        None => out.push((key, p.name.trim(), p.goals, p.assists)),
    }
}

/// Players listed in a match, teammates first. A name on both sides counts
/// only as a teammate.
fn appearances<'a>(m: &'a MatchRecord, tracked: Option<&PlayerKey>) -> Vec<Appearance<'a>> {
    let mut out = Vec::new();
    for p in &m.teammates {
        let Some(key) = p.key() else { continue };
        if tracked != Some(&key) {
            merge(&mut out, key, p);
        }
    }

    let teammates = out.len();
    for p in &m.opponents {
        let Some(key) = p.key() else { continue };
        if tracked == Some(&key) || out[..teammates].iter().any(|a| a.0 == key) {
            continue;
        }
        merge(&mut out, key, p);
    }
    out
}

/// Build one leaderboard row per distinct player.
///
/// A player listed as a teammate in a match is counted there; otherwise an
/// opponent listing counts. Results are from the tracked player's side.
pub fn compute_leaderboard(matches: &[MatchRecord], tracked_player: &str) -> Vec<LeaderboardEntry> {
    let tracked = PlayerKey::new(tracked_player);
    let mut rows: HashMap<PlayerKey, Row> = HashMap::new();

    for m in chronological(matches) {
        for (key, name, goals, assists) in appearances(m, tracked.as_ref()) {
            let row = rows.entry(key).or_insert_with(|| Row {
                name: name.to_string(),
                record: WinLossRecord::default(),
                goals: 0,
                assists: 0,
            });
            row.record.add(m.result);
            row.goals += goals;
            row.assists += assists;
        }
    }

    let mut entries: Vec<LeaderboardEntry> = rows
        .into_values()
        .map(|row| LeaderboardEntry {
            matches_played: row.record.total_games(),
            points: row.record.points(),
            win_rate: row.record.win_rate(),
            effectiveness: row.record.effectiveness(),
            record: row.record,
            goals: row.goals,
            assists: row.assists,
            name: row.name,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.matches_played
            .cmp(&a.matches_played)
            .then(b.points.cmp(&a.points))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    entries
}
