//! Per-sport adapters that map raw provider records into the unified `Game`.
//!
//! Each sport reads its own field-naming convention through a strict input
//! struct whose fields are all optional. Fields a sport does not carry stay
//! `None` on the resulting `Game`, and the full source record is kept in the
//! extension bag for fallback resolution.

pub mod nba;
pub mod ncaab;
pub mod nfl;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::error::Result;
use crate::types::{Game, OuResult, RawRecord, Sport, SpreadResult};

/// Normalize one raw record of the given sport.
pub fn normalize(sport: Sport, raw: RawRecord) -> Result<Game> {
    match sport {
        Sport::Nfl => nfl::normalize(raw),
        Sport::Nba => nba::normalize(raw),
        Sport::Ncaab => ncaab::normalize(raw),
    }
}

/// Normalize a batch, skipping records whose fields carry the wrong JSON type.
/// Order of the surviving records is preserved.
pub fn normalize_all(sport: Sport, records: Vec<RawRecord>) -> Vec<Game> {
    let total = records.len();
    let mut games = Vec::with_capacity(total);
    let mut skipped = 0usize;

    for raw in records {
        match normalize(sport, raw) {
            Ok(game) => games.push(game),
            Err(e) => {
                skipped += 1;
                if skipped <= 5 {
                    warn!(sport = %sport, "[NORMALIZE] skipping malformed record: {e}");
                }
            }
        }
    }

    if skipped > 0 {
        warn!(
            sport = %sport,
            total,
            skipped,
            "[NORMALIZE] {skipped}/{total} {sport} records could not be normalized"
        );
    }
    games
}

// ---------------------------------------------------------------------------
// Shared construction
// ---------------------------------------------------------------------------

/// Fields every sport provides. Scores default to 0 when the source omits
/// them; the derived totals and results are still computed from that 0.
pub(crate) struct CoreFields {
    pub sport: Sport,
    pub season: i32,
    pub game_date: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i32,
    pub away_score: i32,
    pub spread: Option<f64>,
    pub over_under: Option<f64>,
}

impl CoreFields {
    /// Build a `Game` with the derived score fields and home-side results
    /// filled in and every contextual field absent.
    pub fn into_game(self, raw: RawRecord) -> Game {
        let score_difference = self.home_score.saturating_sub(self.away_score);
        let total_points = self.home_score.saturating_add(self.away_score);
        let winner = match score_difference {
            d if d > 0 => Some(self.home_team.clone()),
            d if d < 0 => Some(self.away_team.clone()),
            _ => None,
        };
        let spread_result = self
            .spread
            .map(|spread| SpreadResult::for_home(score_difference, spread));
        let ou_result = self
            .over_under
            .map(|line| OuResult::from_total(total_points, line));

        Game {
            sport: self.sport,
            season: self.season,
            game_date: self.game_date,
            week: None,
            home_team: self.home_team,
            away_team: self.away_team,
            home_aliases: Vec::new(),
            away_aliases: Vec::new(),
            home_score: self.home_score,
            away_score: self.away_score,
            score_difference,
            winner,
            total_points,
            home_rank: None,
            away_rank: None,
            home_efficiency_rank: None,
            away_efficiency_rank: None,
            spread: self.spread,
            over_under: self.over_under,
            spread_result,
            ou_result,
            is_conference_game: None,
            is_playoff: None,
            is_neutral_site: None,
            is_primetime: None,
            home_off_bye: None,
            away_off_bye: None,
            home_back_to_back: None,
            away_back_to_back: None,
            overtimes: None,
            home_seed: None,
            away_seed: None,
            temperature: None,
            wind_speed: None,
            roof: None,
            home_rest_days: None,
            away_rest_days: None,
            home_conference: None,
            away_conference: None,
            home_adj_em: None,
            away_adj_em: None,
            raw,
        }
    }
}

/// Reduce a provider date or timestamp to `YYYY-MM-DD`.
/// Unrecognized shapes are kept as given (trimmed).
pub(crate) fn calendar_date(value: &str) -> String {
    let value = value.trim();
    if let Some(prefix) = value.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    for fmt in ["%Y%m%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    value.to_string()
}

/// Provider spellings that differ from the canonical name, deduplicated
/// case-insensitively.
pub(crate) fn aliases<'a>(canonical: &str, candidates: impl IntoIterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for candidate in candidates.into_iter().flatten() {
        let candidate = candidate.trim();
        if candidate.is_empty() || candidate.eq_ignore_ascii_case(canonical) {
            continue;
        }
        if out.iter().any(|a| a.eq_ignore_ascii_case(candidate)) {
            continue;
        }
        out.push(candidate.to_string());
    }
    out
}

/// Trimmed name, empty string when the source omits it.
pub(crate) fn team_name(value: Option<&str>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Scores arrive as floats from some feeds (`24.0`).
pub(crate) fn score(value: Option<f64>) -> i32 {
    value.map(|v| v.round() as i32).unwrap_or(0)
}

/// Serde adapter for integer fields that some feeds encode as floats
/// (`"week": 1.0`). Fractional or out-of-range numbers are a type error.
pub(crate) fn whole_number<'de, D>(deserializer: D) -> std::result::Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if value.fract() == 0.0 && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
        Ok(Some(value as i32))
    } else {
        Err(serde::de::Error::custom(format!("expected a whole number, got {value}")))
    }
}
