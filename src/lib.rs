//! # Pitch Ledger
//!
//! A personal football match log with streak, morale, duel and campaign
//! analytics.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (matches, players, records, campaign)
//! - **calculate**: Statistics and derived metrics computation
//! - **ledger**: Match log and campaign state with persistence
//! - **storage**: Filesystem storage (JSONL match log, campaign state)
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod ledger;
pub mod models;
pub mod storage;

pub use models::*;

/// Parse a player contribution written as `name[:goals[:assists]]`
/// (e.g., "Ana", "Ana:2", "Ana:1:3").
pub fn parse_contribution(s: &str) -> Result<PlayerContribution, String> {
    let mut parts = s.split(':');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(format!("missing player name in '{}'", s));
    }

    let mut count = |what: &str| -> Result<u32, String> {
        match parts.next() {
            None => Ok(0),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| format!("invalid {} count in '{}'", what, s)),
        }
    };
    let goals = count("goal")?;
    let assists = count("assist")?;

    if parts.next().is_some() {
        return Err(format!("too many fields in '{}' (expected name:goals:assists)", s));
    }
    Ok(PlayerContribution::new(name, goals, assists))
}
