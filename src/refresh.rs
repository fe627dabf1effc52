use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::interval;
use tracing::{error, info};

use crate::db::GameSource;
use crate::error::Result;
use crate::query::TrendEngine;

/// Periodically reloads every sport from the store so new rows in
/// `raw_games` become visible without a restart. A failed cycle keeps the
/// pools already cached.
pub struct CacheRefresher<S> {
    engine: Arc<TrendEngine<S>>,
    period: Duration,
}

impl<S: GameSource> CacheRefresher<S> {
    pub fn new(engine: Arc<TrendEngine<S>>, period: Duration) -> Self {
        Self { engine, period }
    }

    pub async fn run(self) {
        let mut ticker = interval(self.period);
        ticker.tick().await; // first tick fires immediately; startup already warmed

        loop {
            ticker.tick().await;
            if let Err(e) = self.refresh().await {
                error!("[CACHE] refresh failed: {e}");
            }
        }
    }

    /// One reload cycle. Pools are swapped in only after every sport loaded;
    /// queries running during the cycle keep the pools they already hold.
    async fn refresh(&self) -> Result<usize> {
        let started = Instant::now();
        let games = self.engine.reload().await?;
        info!(
            games,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "[CACHE] refresh complete: {games} games"
        );
        Ok(games)
    }
}
