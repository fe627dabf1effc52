use std::future::Future;

use tracing::{debug, warn};

use crate::db::models::RawGameRow;
use crate::error::{AppError, Result};
use crate::types::{RawRecord, Sport};

/// Where raw provider records come from. One call per cold cache slot.
pub trait GameSource: Send + Sync {
    /// Every raw record for `sport`, in store order.
    /// `AppError::MissingData` when the store holds nothing for the sport.
    fn load(&self, sport: Sport) -> impl Future<Output = Result<Vec<RawRecord>>> + Send;
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

/// Reads `raw_games` rows; each payload is one JSON object.
#[derive(Clone)]
pub struct SqliteSource {
    pool: sqlx::SqlitePool,
}

impl SqliteSource {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

impl GameSource for SqliteSource {
    async fn load(&self, sport: Sport) -> Result<Vec<RawRecord>> {
        let rows = sqlx::query_as::<_, RawGameRow>(
            "SELECT id, sport, payload FROM raw_games WHERE sport = ? ORDER BY id",
        )
        .bind(sport.as_str())
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Err(AppError::MissingData(sport));
        }

        let total = rows.len();
        let mut records = Vec::with_capacity(total);
        for row in rows {
            match serde_json::from_str::<serde_json::Value>(&row.payload) {
                Ok(serde_json::Value::Object(record)) => records.push(record),
                Ok(other) => {
                    warn!(sport = %row.sport, id = row.id, "[STORE] payload is not an object ({other}), skipping");
                }
                Err(e) => {
                    warn!(sport = %row.sport, id = row.id, "[STORE] unparsable payload, skipping: {e}");
                }
            }
        }

        debug!(sport = %sport, total, kept = records.len(), "[STORE] loaded raw records");
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// In-memory source for engine tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    pub struct MemorySource {
        records: HashMap<Sport, Vec<RawRecord>>,
        pub loads: AtomicUsize,
        /// When set, every load fails as if the store were unreachable.
        pub offline: AtomicBool,
    }

    impl MemorySource {
        pub fn with(mut self, sport: Sport, records: Vec<serde_json::Value>) -> Self {
            let records = records
                .into_iter()
                .filter_map(|v| v.as_object().cloned())
                .collect();
            self.records.insert(sport, records);
            self
        }
    }

    impl GameSource for MemorySource {
        async fn load(&self, sport: Sport) -> Result<Vec<RawRecord>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.offline.load(Ordering::SeqCst) {
                return Err(AppError::Config("record store offline".to_string()));
            }
            match self.records.get(&sport) {
                Some(records) if !records.is_empty() => Ok(records.clone()),
                _ => Err(AppError::MissingData(sport)),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
