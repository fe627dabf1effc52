mod api;
mod config;
mod db;
mod error;
mod normalize;
mod query;
mod refresh;
mod state;
mod types;

use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::SqliteConnectOptions;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::health::HealthState;
use crate::api::latency::QueryLatency;
use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::db::SqliteSource;
use crate::error::Result;
use crate::query::TrendEngine;
use crate::refresh::CacheRefresher;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Database setup ---
    let options = SqliteConnectOptions::new()
        .filename(&cfg.db_path)
        .create_if_missing(true);
    let pool = sqlx::SqlitePool::connect_with(options).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database ready at {}", cfg.db_path);

    // --- Engine + cache warm-up ---
    let engine = Arc::new(TrendEngine::new(SqliteSource::new(pool), cfg.max_query_limit));
    match engine.warm().await {
        Ok(games) => info!("Cache warm: {games} games across all sports"),
        // Not fatal: the next query retries the cold slot.
        Err(e) => warn!("Cache warm-up failed, serving cold: {e}"),
    }

    // --- Background cache refresh ---
    if cfg.cache_refresh_secs > 0 {
        let refresher = CacheRefresher::new(
            Arc::clone(&engine),
            Duration::from_secs(cfg.cache_refresh_secs),
        );
        tokio::spawn(async move { refresher.run().await });
        info!("Cache refresh every {}s", cfg.cache_refresh_secs);
    }

    // --- HTTP API server ---
    let api_state = ApiState {
        engine,
        health: Arc::new(HealthState::new()),
        latency: Arc::new(QueryLatency::new()),
    };
    let app = router(api_state);
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
