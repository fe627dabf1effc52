use crate::error::{AppError, Result};

/// Hour (UTC) every game date is anchored to before deriving calendar fields.
/// A single fixed time-of-day keeps late-night games from drifting into the
/// neighbouring day, month or year.
pub const REFERENCE_HOUR_UTC: u32 = 12;

/// NFL rest days at or above this count mean the team is coming off a bye.
pub const BYE_REST_DAYS: i32 = 13;

/// NFL kickoffs at or after this local hour are primetime slots.
pub const PRIMETIME_KICKOFF_HOUR: u32 = 20;

/// Sort field used when a query carries no explicit sort.
pub const DEFAULT_SORT_FIELD: &str = "gameDate";

/// Upper bound on `limit` when MAX_QUERY_LIMIT is not set.
pub const DEFAULT_MAX_QUERY_LIMIT: usize = 1000;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub db_path: String,
    pub api_port: u16,
    /// Seconds between cache invalidate + re-warm cycles (CACHE_REFRESH_SECS). 0 disables.
    pub cache_refresh_secs: u64,
    /// Largest `limit` a query may request (MAX_QUERY_LIMIT).
    pub max_query_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "trends.db".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            cache_refresh_secs: std::env::var("CACHE_REFRESH_SECS")
                .unwrap_or_else(|_| "0".to_string())
                .parse::<u64>()
                .map_err(|_| {
                    AppError::Config("CACHE_REFRESH_SECS must be a whole number of seconds".to_string())
                })?,
            max_query_limit: std::env::var("MAX_QUERY_LIMIT")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_MAX_QUERY_LIMIT),
        })
    }
}
