use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;

use crate::error::{AppError, Result};
use crate::types::{Game, Sport};

/// One sport's slot. The `OnceCell` is the single-population guard: every
/// caller that finds the slot cold awaits the same load.
type Slot = Arc<OnceCell<Arc<[Game]>>>;

// ---------------------------------------------------------------------------
// GameCache
// ---------------------------------------------------------------------------

/// Lazily populated per-sport game pools.
///
/// Readers see either nothing or a complete pool, never a partial one.
/// A failed load leaves the slot cold so the next caller retries. Pools stay
/// until `invalidate` / `invalidate_sport` drops them; queries already
/// holding an `Arc` keep reading the old pool.
pub struct GameCache {
    /// sport → pool slot
    slots: DashMap<Sport, Slot>,
    /// Completed loads since startup.
    loads: AtomicU64,
}

impl GameCache {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
            loads: AtomicU64::new(0),
        }
    }

    /// Return the cached pool for `sport`, running `load` if the slot is cold.
    /// Concurrent cold callers share one `load`.
    pub async fn get_or_load<F, Fut>(&self, sport: Sport, load: F) -> Result<Arc<[Game]>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Game>>>,
    {
        // Clone the slot out so no shard lock is held across the await.
        let slot: Slot = Arc::clone(self.slots.entry(sport).or_default().value());

        let pool = slot
            .get_or_try_init(|| async move {
                let games = load().await?;
                self.loads.fetch_add(1, Ordering::Relaxed);
                Ok::<_, AppError>(Arc::from(games))
            })
            .await?;
        Ok(Arc::clone(pool))
    }

    /// Install a freshly loaded pool for `sport`, replacing whatever the slot
    /// held. Queries already holding the old `Arc` keep reading it.
    pub fn replace(&self, sport: Sport, games: Vec<Game>) {
        let pool: Arc<[Game]> = Arc::from(games);
        self.slots.insert(sport, Arc::new(OnceCell::new_with(Some(pool))));
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    /// Drop every pool.
    pub fn invalidate(&self) {
        self.slots.clear();
    }

    pub fn invalidate_sport(&self, sport: Sport) {
        self.slots.remove(&sport);
    }

    /// Number of cached games for `sport`, `None` when the slot is cold.
    pub fn cached_games(&self, sport: Sport) -> Option<usize> {
        let slot = self.slots.get(&sport)?;
        slot.get().map(|pool| pool.len())
    }

    pub fn load_count(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }
}

impl Default for GameCache {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
