use chrono::{NaiveTime, Timelike};
use serde::Deserialize;

use crate::config::{BYE_REST_DAYS, PRIMETIME_KICKOFF_HOUR};
use crate::error::Result;
use crate::normalize::{aliases, calendar_date, score, team_name, whole_number, CoreFields};
use crate::types::{Game, RawRecord, Sport};

/// nflverse-style schedule row.
#[derive(Debug, Deserialize)]
struct NflRecord {
    #[serde(default, deserialize_with = "whole_number")]
    season: Option<i32>,
    #[serde(default, deserialize_with = "whole_number")]
    week: Option<i32>,
    /// `REG`, `WC`, `DIV`, `CON`, `SB`
    game_type: Option<String>,
    gameday: Option<String>,
    /// Local kickoff, `HH:MM`.
    gametime: Option<String>,
    home_team: Option<String>,
    away_team: Option<String>,
    home_team_name: Option<String>,
    away_team_name: Option<String>,
    home_score: Option<f64>,
    away_score: Option<f64>,
    /// Expected home margin: positive means home is favored.
    spread_line: Option<f64>,
    total_line: Option<f64>,
    /// `Home` or `Neutral`
    location: Option<String>,
    /// 0/1 flag
    #[serde(default, deserialize_with = "whole_number")]
    overtime: Option<i32>,
    #[serde(default, deserialize_with = "whole_number")]
    home_rest: Option<i32>,
    #[serde(default, deserialize_with = "whole_number")]
    away_rest: Option<i32>,
    roof: Option<String>,
    temp: Option<f64>,
    wind: Option<f64>,
}

pub fn normalize(raw: RawRecord) -> Result<Game> {
    let rec: NflRecord = serde_json::from_value(serde_json::Value::Object(raw.clone()))?;

    let home_team = team_name(rec.home_team.as_deref());
    let away_team = team_name(rec.away_team.as_deref());
    let home_aliases = aliases(&home_team, [rec.home_team_name.as_deref()]);
    let away_aliases = aliases(&away_team, [rec.away_team_name.as_deref()]);

    let mut game = CoreFields {
        sport: Sport::Nfl,
        season: rec.season.unwrap_or(0),
        game_date: calendar_date(rec.gameday.as_deref().unwrap_or_default()),
        home_team,
        away_team,
        home_score: score(rec.home_score),
        away_score: score(rec.away_score),
        // Flip into the unified convention where negative favors home.
        spread: rec.spread_line.map(|line| 0.0 - line),
        over_under: rec.total_line,
    }
    .into_game(raw);

    game.week = rec.week;
    game.home_aliases = home_aliases;
    game.away_aliases = away_aliases;
    game.is_playoff = rec
        .game_type
        .as_deref()
        .map(|t| !t.trim().eq_ignore_ascii_case("REG"));
    game.is_neutral_site = rec
        .location
        .as_deref()
        .map(|l| l.trim().eq_ignore_ascii_case("Neutral"));
    game.is_primetime = rec.gametime.as_deref().and_then(kickoff_is_primetime);
    game.overtimes = rec.overtime;
    game.home_rest_days = rec.home_rest;
    game.away_rest_days = rec.away_rest;
    game.home_off_bye = rec.home_rest.map(|d| d >= BYE_REST_DAYS);
    game.away_off_bye = rec.away_rest.map(|d| d >= BYE_REST_DAYS);
    game.roof = rec.roof;
    game.temperature = rec.temp;
    game.wind_speed = rec.wind;

    Ok(game)
}

fn kickoff_is_primetime(gametime: &str) -> Option<bool> {
    NaiveTime::parse_from_str(gametime.trim(), "%H:%M")
        .ok()
        .map(|t| t.hour() >= PRIMETIME_KICKOFF_HOUR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SpreadResult;
    use serde_json::json;

    fn record(v: serde_json::Value) -> RawRecord {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn flips_spread_line_into_home_negative_convention() {
        let game = normalize(record(json!({
            "season": 2023, "week": 1, "game_type": "REG",
            "gameday": "2023-09-07", "gametime": "20:20",
            "home_team": "KC", "away_team": "DET",
            "home_team_name": "Kansas City Chiefs",
            "home_score": 20, "away_score": 21,
            "spread_line": 4.5, "total_line": 53.0,
            "location": "Home", "overtime": 0,
            "home_rest": 7, "away_rest": 7,
            "roof": "outdoors", "temp": 81, "wind": 5,
            "div_game": 0
        })))
        .unwrap();

        assert_eq!(game.spread, Some(-4.5));
        assert_eq!(game.spread_result, Some(SpreadResult::Lost));
        assert_eq!(game.score_difference, -1);
        assert_eq!(game.winner.as_deref(), Some("DET"));
        assert_eq!(game.is_primetime, Some(true));
        assert_eq!(game.is_playoff, Some(false));
        assert_eq!(game.is_neutral_site, Some(false));
        assert_eq!(game.home_off_bye, Some(false));
        assert_eq!(game.home_aliases, vec!["Kansas City Chiefs".to_string()]);
        assert_eq!(game.temperature, Some(81.0));
    }

    #[test]
    fn lacks_conference_and_ranking_data() {
        let game = normalize(record(json!({
            "season": 2023, "gameday": "2024-02-11", "game_type": "SB",
            "home_team": "SF", "away_team": "KC",
            "home_score": 22, "away_score": 25, "location": "Neutral"
        })))
        .unwrap();

        assert!(game.is_conference_game.is_none());
        assert!(game.home_rank.is_none());
        assert!(game.home_back_to_back.is_none());
        assert!(game.spread.is_none());
        assert!(game.is_primetime.is_none());
        assert_eq!(game.is_playoff, Some(true));
        assert_eq!(game.is_neutral_site, Some(true));
        assert_eq!(game.raw.get("game_type"), Some(&json!("SB")));
    }

    #[test]
    fn bye_derived_from_rest_days() {
        let game = normalize(record(json!({
            "season": 2022, "gameday": "2022-11-13",
            "home_team": "BUF", "away_team": "MIN",
            "home_score": 30, "away_score": 33,
            "home_rest": 7, "away_rest": 14, "overtime": 1
        })))
        .unwrap();

        assert_eq!(game.home_off_bye, Some(false));
        assert_eq!(game.away_off_bye, Some(true));
        assert_eq!(game.overtimes, Some(1));
    }

    #[test]
    fn float_encoded_counts_are_accepted() {
        let game = normalize(record(json!({
            "season": 2023.0, "week": 1.0, "gameday": "2023-09-07",
            "home_team": "KC", "away_team": "DET",
            "home_score": 20.0, "away_score": 21.0,
            "overtime": 0.0, "home_rest": 7.0, "away_rest": 14.0
        })))
        .unwrap();

        assert_eq!(game.season, 2023);
        assert_eq!(game.week, Some(1));
        assert_eq!(game.overtimes, Some(0));
        assert_eq!(game.home_rest_days, Some(7));
        assert_eq!(game.away_off_bye, Some(true));
    }

    #[test]
    fn fractional_week_is_an_error() {
        let result = normalize(record(json!({ "season": 2023, "week": 1.5, "home_team": "KC" })));
        assert!(result.is_err());
    }

    #[test]
    fn missing_scores_become_zero() {
        let game = normalize(record(json!({
            "season": 2024, "gameday": "2024-09-05",
            "home_team": "KC", "away_team": "BAL", "spread_line": 3.0
        })))
        .unwrap();

        assert_eq!(game.home_score, 0);
        assert_eq!(game.total_points, 0);
        assert_eq!(game.spread_result, Some(SpreadResult::Lost));
    }

    #[test]
    fn wrong_type_is_an_error() {
        let result = normalize(record(json!({ "season": "twenty", "home_team": "KC" })));
        assert!(result.is_err());
    }
}
