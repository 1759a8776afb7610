use std::sync::Arc;

use tokio::sync::Mutex;

use crate::calculate::AnalyticsCache;
use crate::ledger::MatchLedger;

#[derive(Clone)]
pub struct AppState {
    /// Single writer for matches and campaign state
    pub ledger: Arc<Mutex<MatchLedger>>,
    pub cache: Arc<Mutex<AnalyticsCache>>,
    /// Tracked player's name
    pub player: Arc<String>,
}

impl AppState {
    pub fn new(ledger: MatchLedger, player: impl Into<String>) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
            cache: Arc::new(Mutex::new(AnalyticsCache::new())),
            player: Arc::new(player.into()),
        }
    }
}
