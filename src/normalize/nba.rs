use serde::Deserialize;

use crate::error::Result;
use crate::normalize::{aliases, calendar_date, score, team_name, whole_number, CoreFields};
use crate::types::{Game, RawRecord, Sport};

#[derive(Debug, Deserialize)]
struct NbaRecord {
    /// Ending year of the season (2024 for 2023-24).
    #[serde(default, deserialize_with = "whole_number")]
    season: Option<i32>,
    game_date: Option<String>,
    home_team: Option<String>,
    away_team: Option<String>,
    home_abbr: Option<String>,
    away_abbr: Option<String>,
    home_pts: Option<f64>,
    away_pts: Option<f64>,
    /// Home line, negative means home is favored.
    home_line: Option<f64>,
    total_line: Option<f64>,
    /// `Regular Season`, `Playoffs`, `Play-In`
    season_type: Option<String>,
    national_tv: Option<bool>,
    neutral_site: Option<bool>,
    home_b2b: Option<bool>,
    away_b2b: Option<bool>,
    #[serde(default, deserialize_with = "whole_number")]
    home_rest: Option<i32>,
    #[serde(default, deserialize_with = "whole_number")]
    away_rest: Option<i32>,
    #[serde(default, deserialize_with = "whole_number")]
    ot_periods: Option<i32>,
    home_conference: Option<String>,
    away_conference: Option<String>,
}

pub fn normalize(raw: RawRecord) -> Result<Game> {
    let rec: NbaRecord = serde_json::from_value(serde_json::Value::Object(raw.clone()))?;

    let home_team = team_name(rec.home_team.as_deref());
    let away_team = team_name(rec.away_team.as_deref());
    let home_aliases = aliases(&home_team, [rec.home_abbr.as_deref()]);
    let away_aliases = aliases(&away_team, [rec.away_abbr.as_deref()]);

    let mut game = CoreFields {
        sport: Sport::Nba,
        season: rec.season.unwrap_or(0),
        game_date: calendar_date(rec.game_date.as_deref().unwrap_or_default()),
        home_team,
        away_team,
        home_score: score(rec.home_pts),
        away_score: score(rec.away_pts),
        spread: rec.home_line,
        over_under: rec.total_line,
    }
    .into_game(raw);

    game.home_aliases = home_aliases;
    game.away_aliases = away_aliases;
    game.is_playoff = rec
        .season_type
        .as_deref()
        .map(|t| t.trim().eq_ignore_ascii_case("Playoffs"));
    game.is_primetime = rec.national_tv;
    game.is_neutral_site = rec.neutral_site;
    game.home_back_to_back = rec.home_b2b;
    game.away_back_to_back = rec.away_b2b;
    game.home_rest_days = rec.home_rest;
    game.away_rest_days = rec.away_rest;
    game.overtimes = rec.ot_periods;
    game.is_conference_game = match (&rec.home_conference, &rec.away_conference) {
        (Some(h), Some(a)) => Some(h.trim().eq_ignore_ascii_case(a.trim())),
        _ => None,
    };
    game.home_conference = rec.home_conference;
    game.away_conference = rec.away_conference;

    Ok(game)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OuResult, SpreadResult};
    use serde_json::json;

    fn record(v: serde_json::Value) -> RawRecord {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn maps_nba_fields() {
        let game = normalize(record(json!({
            "season": 2024, "game_date": "2024-01-15T00:00:00",
            "home_team": "Boston Celtics", "away_team": "Toronto Raptors",
            "home_abbr": "BOS", "away_abbr": "TOR",
            "home_pts": 105, "away_pts": 104,
            "home_line": -12.5, "total_line": 231.0,
            "season_type": "Regular Season", "national_tv": false,
            "home_b2b": true, "away_b2b": false,
            "home_rest": 0, "away_rest": 2, "ot_periods": 1,
            "home_conference": "East", "away_conference": "East",
            "arena": "TD Garden"
        })))
        .unwrap();

        assert_eq!(game.game_date, "2024-01-15");
        assert_eq!(game.spread_result, Some(SpreadResult::Lost));
        assert_eq!(game.ou_result, Some(OuResult::Under));
        assert_eq!(game.is_conference_game, Some(true));
        assert_eq!(game.home_back_to_back, Some(true));
        assert_eq!(game.overtimes, Some(1));
        assert_eq!(game.home_aliases, vec!["BOS".to_string()]);
        assert_eq!(game.raw.get("arena"), Some(&json!("TD Garden")));
    }

    #[test]
    fn float_encoded_counts_are_accepted() {
        let game = normalize(record(json!({
            "season": 2024.0, "game_date": "2024-01-15",
            "home_team": "Boston Celtics", "away_team": "Miami Heat",
            "home_pts": 110.0, "away_pts": 98.0,
            "home_rest": 1.0, "away_rest": 0.0, "ot_periods": 2.0
        })))
        .unwrap();

        assert_eq!(game.season, 2024);
        assert_eq!(game.home_rest_days, Some(1));
        assert_eq!(game.away_rest_days, Some(0));
        assert_eq!(game.overtimes, Some(2));
    }

    #[test]
    fn conference_game_needs_both_conferences() {
        let game = normalize(record(json!({
            "season": 2024, "game_date": "2024-01-16",
            "home_team": "Denver Nuggets", "away_team": "Miami Heat",
            "home_pts": 110, "away_pts": 100, "home_conference": "West"
        })))
        .unwrap();

        assert!(game.is_conference_game.is_none());
        assert!(game.home_rank.is_none());
        assert!(game.home_off_bye.is_none());
        assert!(game.temperature.is_none());
    }
}
