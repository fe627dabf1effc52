use serde::Deserialize;

use crate::error::Result;
use crate::normalize::{aliases, calendar_date, score, team_name, whole_number, CoreFields};
use crate::types::{Game, RawRecord, Sport};

#[derive(Debug, Deserialize)]
struct NcaabRecord {
    #[serde(default, deserialize_with = "whole_number")]
    season: Option<i32>,
    date: Option<String>,
    home: Option<String>,
    away: Option<String>,
    /// Unresolved provider spellings.
    home_raw: Option<String>,
    away_raw: Option<String>,
    home_score: Option<f64>,
    away_score: Option<f64>,
    /// Home line, negative means home is favored.
    line: Option<f64>,
    ou: Option<f64>,
    neutral: Option<bool>,
    conf_game: Option<bool>,
    /// `NCAA`, `NIT`, `CBI`... null during the regular season.
    postseason: Option<String>,
    #[serde(default, deserialize_with = "whole_number")]
    home_ap_rank: Option<i32>,
    #[serde(default, deserialize_with = "whole_number")]
    away_ap_rank: Option<i32>,
    #[serde(default, deserialize_with = "whole_number")]
    home_kp_rank: Option<i32>,
    #[serde(default, deserialize_with = "whole_number")]
    away_kp_rank: Option<i32>,
    home_adj_em: Option<f64>,
    away_adj_em: Option<f64>,
    home_conf: Option<String>,
    away_conf: Option<String>,
    #[serde(default, deserialize_with = "whole_number")]
    home_seed: Option<i32>,
    #[serde(default, deserialize_with = "whole_number")]
    away_seed: Option<i32>,
    #[serde(default, deserialize_with = "whole_number")]
    ot: Option<i32>,
}

pub fn normalize(raw: RawRecord) -> Result<Game> {
    let rec: NcaabRecord = serde_json::from_value(serde_json::Value::Object(raw.clone()))?;

    let home_team = team_name(rec.home.as_deref());
    let away_team = team_name(rec.away.as_deref());
    let home_aliases = aliases(&home_team, [rec.home_raw.as_deref()]);
    let away_aliases = aliases(&away_team, [rec.away_raw.as_deref()]);

    let mut game = CoreFields {
        sport: Sport::Ncaab,
        season: rec.season.unwrap_or(0),
        game_date: calendar_date(rec.date.as_deref().unwrap_or_default()),
        home_team,
        away_team,
        home_score: score(rec.home_score),
        away_score: score(rec.away_score),
        spread: rec.line,
        over_under: rec.ou,
    }
    .into_game(raw);

    game.home_aliases = home_aliases;
    game.away_aliases = away_aliases;
    game.is_neutral_site = rec.neutral;
    game.is_conference_game = rec.conf_game;
    // A null postseason means regular season; a missing key means unknown.
    let has_postseason_key = game.raw.contains_key("postseason");
    game.is_playoff = has_postseason_key
        .then(|| rec.postseason.as_deref().is_some_and(|p| !p.trim().is_empty()));
    game.home_rank = rec.home_ap_rank;
    game.away_rank = rec.away_ap_rank;
    game.home_efficiency_rank = rec.home_kp_rank;
    game.away_efficiency_rank = rec.away_kp_rank;
    game.home_adj_em = rec.home_adj_em;
    game.away_adj_em = rec.away_adj_em;
    game.home_conference = rec.home_conf;
    game.away_conference = rec.away_conf;
    game.home_seed = rec.home_seed;
    game.away_seed = rec.away_seed;
    game.overtimes = rec.ot;

    Ok(game)
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
    fn maps_tournament_game() {
        let game = normalize(record(json!({
            "season": 2024, "date": "20240321",
            "home": "Houston", "away": "Longwood",
            "home_raw": "Houston Cougars", "away_raw": "Longwood Lancers",
            "home_score": 86, "away_score": 46,
            "line": -24.5, "ou": 127.5,
            "neutral": true, "conf_game": false, "postseason": "NCAA",
            "home_ap_rank": 1, "away_ap_rank": null,
            "home_kp_rank": 1, "away_kp_rank": 160,
            "home_adj_em": 32.4, "away_adj_em": 1.2,
            "home_conf": "B12", "away_conf": "BSth",
            "home_seed": 1, "away_seed": 16, "ot": 0
        })))
        .unwrap();

        assert_eq!(game.game_date, "2024-03-21");
        assert_eq!(game.spread_result, Some(SpreadResult::Covered));
        assert_eq!(game.is_playoff, Some(true));
        assert_eq!(game.home_rank, Some(1));
        assert!(game.away_rank.is_none());
        assert_eq!(game.away_efficiency_rank, Some(160));
        assert_eq!(game.away_seed, Some(16));
        assert_eq!(game.home_aliases, vec!["Houston Cougars".to_string()]);
        assert!(game.is_primetime.is_none());
        assert!(game.home_rest_days.is_none());
    }

    #[test]
    fn float_encoded_ranks_and_seeds_are_accepted() {
        let game = normalize(record(json!({
            "season": 2024.0, "date": "2024-03-21",
            "home": "Houston", "away": "Longwood",
            "home_score": 86.0, "away_score": 46.0,
            "home_ap_rank": 1.0, "away_ap_rank": null,
            "home_kp_rank": 1.0, "away_kp_rank": 160.0,
            "home_seed": 1.0, "away_seed": 16.0, "ot": 0.0
        })))
        .unwrap();

        assert_eq!(game.season, 2024);
        assert_eq!(game.home_rank, Some(1));
        assert!(game.away_rank.is_none());
        assert_eq!(game.away_efficiency_rank, Some(160));
        assert_eq!(game.away_seed, Some(16));
        assert_eq!(game.overtimes, Some(0));
    }

    #[test]
    fn conference_flag_is_not_defaulted() {
        let game = normalize(record(json!({
            "season": 2023, "date": "2022-12-01",
            "home": "Duke", "away": "Ohio St.",
            "home_score": 81, "away_score": 72, "postseason": null
        })))
        .unwrap();

        assert!(game.is_conference_game.is_none());
        assert!(game.home_conference.is_none());
        assert_eq!(game.is_playoff, Some(false));
    }

    #[test]
    fn missing_postseason_key_is_unknown() {
        let game = normalize(record(json!({
            "season": 2023, "date": "2022-12-01",
            "home": "Duke", "away": "Ohio St.",
            "home_score": 81, "away_score": 72
        })))
        .unwrap();

        assert!(game.is_playoff.is_none());
    }
}
