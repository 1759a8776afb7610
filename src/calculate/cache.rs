//! Memoized analytics keyed by a content hash of the match list.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::models::{
    CurrentStreaks, DuelReport, HistoricalRecords, LeaderboardEntry, MatchRecord, PlayerKey,
    PlayerMorale,
};

use super::{
    compute_current_streaks, compute_duel_stats, compute_historical_records, compute_leaderboard,
    compute_morale,
};

/// Every pure analytic for one match list and tracked player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub records: HistoricalRecords,
    pub current_streaks: CurrentStreaks,
    pub morale: Option<PlayerMorale>,
    pub duels: DuelReport,
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl AnalyticsSnapshot {
    pub fn compute(matches: &[MatchRecord], tracked_player: &str) -> Self {
        Self {
            records: compute_historical_records(matches),
            current_streaks: compute_current_streaks(matches),
            morale: compute_morale(matches),
            duels: compute_duel_stats(matches, tracked_player),
            leaderboard: compute_leaderboard(matches, tracked_player),
        }
    }
}

/// SHA256 over the serialized matches and the normalized player name.
///
/// `None` if a match fails to serialize.
pub fn fingerprint(matches: &[MatchRecord], tracked_player: &str) -> Option<String> {
    let mut hasher = Sha256::new();
    for m in matches {
        hasher.update(serde_json::to_vec(m).ok()?);
        hasher.update(b"\n");
    }
    hasher.update(b"|");
    if let Some(key) = PlayerKey::new(tracked_player) {
        hasher.update(key.as_str().as_bytes());
    }
    Some(hex::encode(hasher.finalize()))
}

/// Holds the most recently computed snapshot.
#[derive(Debug, Default)]
pub struct AnalyticsCache {
    last: Option<(String, Arc<AnalyticsSnapshot>)>,
}

impl AnalyticsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot if the inputs are unchanged, else recompute.
    pub fn get_or_compute(
        &mut self,
        matches: &[MatchRecord],
        tracked_player: &str,
    ) -> Arc<AnalyticsSnapshot> {
        let Some(key) = fingerprint(matches, tracked_player) else {
            return Arc::new(AnalyticsSnapshot::compute(matches, tracked_player));
        };

        if let Some((cached_key, snapshot)) = &self.last {
            if *cached_key == key {
                debug!(fingerprint = %&key[..12], "analytics cache hit");
                return Arc::clone(snapshot);
            }
        }

        debug!(fingerprint = %&key[..12], matches = matches.len(), "analytics cache miss");
        let snapshot = Arc::new(AnalyticsSnapshot::compute(matches, tracked_player));
        self.last = Some((key, Arc::clone(&snapshot)));
        snapshot
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::{from_results, played};
    use crate::models::MatchResult::{Loss as L, Win as W};
    use crate::models::PlayerContribution;

    #[test]
    fn test_fingerprint_stable_and_sensitive() {
        let matches = from_results(&[W, L]);
        assert_eq!(fingerprint(&matches, "Me"), fingerprint(&matches, " me "));
        assert_ne!(fingerprint(&matches, "Me"), fingerprint(&matches, "You"));
        assert_ne!(fingerprint(&matches, "Me"), fingerprint(&matches[..1], "Me"));
        assert_eq!(fingerprint(&matches, "Me").unwrap().len(), 64);
    }

    #[test]
    fn test_cache_hit_returns_same_snapshot() {
        let matches = from_results(&[W, W, L]);
        let mut cache = AnalyticsCache::new();
        let first = cache.get_or_compute(&matches, "Me");
        let second = cache.get_or_compute(&matches, "Me");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_cache_miss_after_change() {
        let mut matches = from_results(&[W, W, L]);
        let mut cache = AnalyticsCache::new();
        let before = cache.get_or_compute(&matches, "Me");

        matches.push(played(3, W).with_teammate(PlayerContribution::new("Ana", 0, 0)));
        let after = cache.get_or_compute(&matches, "Me");
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.duels.teammates.len(), 1);
        assert_eq!(*after, AnalyticsSnapshot::compute(&matches, "Me"));
    }

    #[test]
    fn test_clear_forces_recompute() {
        let matches = from_results(&[W]);
        let mut cache = AnalyticsCache::new();
        let first = cache.get_or_compute(&matches, "Me");
        cache.clear();
        let second = cache.get_or_compute(&matches, "Me");
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }
}
