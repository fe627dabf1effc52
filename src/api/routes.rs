use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::health::HealthState;
use crate::api::latency::QueryLatency;
use crate::db::GameSource;
use crate::error::AppError;
use crate::query::{Query, QueryResult, TrendEngine};
use crate::types::Sport;

pub struct ApiState<S> {
    pub engine: Arc<TrendEngine<S>>,
    pub health: Arc<HealthState>,
    pub latency: Arc<QueryLatency>,
}

impl<S> Clone for ApiState<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            health: Arc::clone(&self.health),
            latency: Arc::clone(&self.latency),
        }
    }
}

pub fn router<S: GameSource + 'static>(state: ApiState<S>) -> Router {
    Router::new()
        .route("/trends", post(post_trends::<S>))
        .route("/cache/invalidate", post(post_invalidate::<S>))
        .route("/health", get(get_health::<S>))
        .route("/stats/latency", get(get_stats_latency::<S>))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct InvalidateRequest {
    /// Omit to drop every sport.
    #[serde(default)]
    pub sport: Option<Sport>,
}

#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    pub invalidated: Vec<Sport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSlotStatus {
    pub sport: Sport,
    /// `None` while the slot is cold.
    pub games: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache: Vec<CacheSlotStatus>,
    pub cache_loads: u64,
    pub queries_served: u64,
    pub queries_failed: u64,
    pub last_query_at_ns: u64,
}

#[derive(Debug, Serialize)]
pub struct LatencyResponse {
    pub samples: u64,
    pub p50_ms: Option<f64>,
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// A body that is not a query maps to `AppError` (400).
async fn post_trends<S: GameSource>(
    State(state): State<ApiState<S>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<QueryResult>, AppError> {
    if !body.is_object() {
        state.health.record_failure();
        return Err(AppError::InvalidQuery("query body must be a JSON object".to_string()));
    }
    let query: Query = serde_json::from_value(body).map_err(|e| {
        state.health.record_failure();
        AppError::from(e)
    })?;

    let started = Instant::now();
    match state.engine.run(query).await {
        Ok(result) => {
            state.latency.record(started.elapsed());
            state.health.record_success();
            Ok(Json(result))
        }
        Err(e) => {
            state.health.record_failure();
            warn!("[QUERY] failed: {e}");
            Err(e)
        }
    }
}

/// An empty body drops every sport.
async fn post_invalidate<S: GameSource>(
    State(state): State<ApiState<S>>,
    body: Bytes,
) -> Result<Json<InvalidateResponse>, AppError> {
    let req: InvalidateRequest = if body.iter().all(u8::is_ascii_whitespace) {
        InvalidateRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };
    let invalidated = match req.sport {
        Some(sport) => {
            state.engine.cache().invalidate_sport(sport);
            vec![sport]
        }
        None => {
            state.engine.cache().invalidate();
            Sport::ALL.to_vec()
        }
    };
    info!(sports = ?invalidated, "[CACHE] invalidated on request");
    Ok(Json(InvalidateResponse { invalidated }))
}

async fn get_health<S: GameSource>(State(state): State<ApiState<S>>) -> Json<HealthResponse> {
    let cache = state.engine.cache();
    Json(HealthResponse {
        status: "ok",
        cache: Sport::ALL
            .into_iter()
            .map(|sport| CacheSlotStatus {
                sport,
                games: cache.cached_games(sport),
            })
            .collect(),
        cache_loads: cache.load_count(),
        queries_served: state.health.queries_served(),
        queries_failed: state.health.queries_failed(),
        last_query_at_ns: state.health.last_query_at_ns(),
    })
}

async fn get_stats_latency<S: GameSource>(State(state): State<ApiState<S>>) -> Json<LatencyResponse> {
    let to_ms = |us: u64| us as f64 / 1_000.0;
    let percentiles = state.latency.percentiles();
    Json(LatencyResponse {
        samples: state.latency.len(),
        p50_ms: percentiles.map(|(p50, _, _)| to_ms(p50)),
        p95_ms: percentiles.map(|(_, p95, _)| to_ms(p95)),
        p99_ms: percentiles.map(|(_, _, p99)| to_ms(p99)),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
