use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_SORT_FIELD;
use crate::db::GameSource;
use crate::error::{AppError, Result};
use crate::normalize::normalize_all;
use crate::query::aggregate::summarize;
use crate::query::perspective::{match_team, resolve_side};
use crate::query::predicate::{compare, matches};
use crate::query::resolver::resolve;
use crate::query::{Operator, Query, QueryResult, SortDirection};
use crate::state::GameCache;
use crate::types::{Game, Sport};

// ---------------------------------------------------------------------------
// TrendEngine
// ---------------------------------------------------------------------------

/// Owns the record source and the per-sport cache; runs queries against them.
pub struct TrendEngine<S> {
    source: S,
    cache: GameCache,
    max_limit: usize,
}

impl<S: GameSource> TrendEngine<S> {
    pub fn new(source: S, max_limit: usize) -> Self {
        Self {
            source,
            cache: GameCache::new(),
            max_limit,
        }
    }

    pub fn cache(&self) -> &GameCache {
        &self.cache
    }

    #[cfg(test)]
    pub(crate) fn source(&self) -> &S {
        &self.source
    }

    /// Load whatever the query's sport selector needs, then evaluate.
    pub async fn run(&self, query: Query) -> Result<QueryResult> {
        let mut pools = Vec::new();
        for sport in query.sport.sports() {
            pools.push(self.games(sport).await?);
        }

        let started = Instant::now();
        let result = execute(pools.iter().flat_map(|pool| pool.iter()), query, self.max_limit);
        debug!(
            matched = result.total_matched,
            returned = result.games.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "[QUERY] evaluated"
        );
        Ok(result)
    }

    /// Populate every sport's slot. Returns the number of games now cached.
    pub async fn warm(&self) -> Result<usize> {
        let mut total = 0;
        for sport in Sport::ALL {
            total += self.games(sport).await?.len();
        }
        info!(games = total, "[CACHE] warm complete");
        Ok(total)
    }

    /// Reload every sport from the source and swap the new pools in only once
    /// all of them loaded. On failure the current pools stay in place.
    pub async fn reload(&self) -> Result<usize> {
        let mut fresh = Vec::with_capacity(Sport::ALL.len());
        for sport in Sport::ALL {
            fresh.push((sport, self.load(sport).await?));
        }
        let total = fresh.iter().map(|(_, games)| games.len()).sum();
        for (sport, games) in fresh {
            self.cache.replace(sport, games);
        }
        Ok(total)
    }

    /// The cached pool for `sport`, loading it on a cold slot.
    async fn games(&self, sport: Sport) -> Result<Arc<[Game]>> {
        self.cache.get_or_load(sport, || self.load(sport)).await
    }

    /// Load and normalize one sport. A sport with no backing records is an
    /// empty pool.
    async fn load(&self, sport: Sport) -> Result<Vec<Game>> {
        let started = Instant::now();
        let records = match self.source.load(sport).await {
            Ok(records) => records,
            Err(AppError::MissingData(_)) => {
                warn!(sport = %sport, "[CACHE] no records for {sport}, using an empty pool");
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!(sport = %sport, "[CACHE] load failed: {e}");
                return Err(e);
            }
        };
        let games = normalize_all(sport, records);
        info!(
            sport = %sport,
            games = games.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "[CACHE] loaded {sport}"
        );
        Ok(games)
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Evaluate `query` over an already-loaded pool.
///
/// sport → season range → team → filters → perspective → sort → limit →
/// summary. `limit` is clamped to `max_limit`. Pure: the same pool and query
/// always produce the same ordered result.
pub fn execute<'a>(
    pool: impl IntoIterator<Item = &'a Game>,
    query: Query,
    max_limit: usize,
) -> QueryResult {
    let team = query.team_name();

    if query.perspective.needs_team() && team.is_none() {
        warn!(perspective = %query.perspective, "[QUERY] perspective needs a team, none given");
        return empty_result(query);
    }
    if let Some(op) = query.filters.iter().find_map(|f| match &f.op {
        Operator::Unknown(name) => Some(name),
        _ => None,
    }) {
        warn!(operator = %op, "[QUERY] unknown operator '{op}', no game can match");
        return empty_result(query);
    }

    let matched: Vec<&Game> = pool
        .into_iter()
        .filter(|g| query.sport.matches(g.sport))
        .filter(|g| query.season_start.map_or(true, |start| g.season >= start))
        .filter(|g| query.season_end.map_or(true, |end| g.season <= end))
        .filter(|g| team.map_or(true, |t| match_team(g, t).is_some()))
        .filter(|g| query.filters.iter().all(|f| matches(g, f)))
        .filter(|g| resolve_side(g, query.perspective, team).is_some())
        .collect();

    let mut ordered = sort_games(matched, &query);
    let total_matched = ordered.len();
    if let Some(limit) = query.limit {
        ordered.truncate(limit.min(max_limit));
    }

    let summary = summarize(ordered.iter().copied(), query.perspective, team);
    let games = ordered.into_iter().cloned().collect();

    QueryResult {
        query,
        total_matched,
        games,
        summary,
    }
}

fn empty_result(query: Query) -> QueryResult {
    let summary = summarize(std::iter::empty::<&Game>(), query.perspective, query.team_name());
    QueryResult {
        query,
        total_matched: 0,
        games: Vec::new(),
        summary,
    }
}

/// Stable sort on the resolved sort field. Absent values go last in either
/// direction.
fn sort_games<'a>(games: Vec<&'a Game>, query: &Query) -> Vec<&'a Game> {
    let (field, direction) = match &query.sort {
        Some(spec) => (spec.field.as_str(), spec.direction),
        None => (DEFAULT_SORT_FIELD, SortDirection::Desc),
    };

    let mut keyed: Vec<(Value, &Game)> = games.into_iter().map(|g| (resolve(g, field), g)).collect();
    keyed.sort_by(|(a, _), (b, _)| match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = sort_order(a, b);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
    });
    keyed.into_iter().map(|(_, g)| g).collect()
}

/// Numbers numerically, strings ordinally, `false < true`; mixed kinds tie.
fn sort_order(a: &Value, b: &Value) -> Ordering {
    compare(a, b)
        .or_else(|| match (a, b) {
            (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
            _ => None,
        })
        .unwrap_or(Ordering::Equal)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
