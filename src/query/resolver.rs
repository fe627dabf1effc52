//! Resolves a filter's field name against a `Game`.
//!
//! Resolution order, first hit wins:
//! 1. computed calendar fields (`month`, `year`, `monthName`, `dayOfWeek`)
//! 2. dot paths walked into the extension bag (`weather.temp`, `raw.odds.0`)
//! 3. schema fields by exact camelCase name
//! 4. the bare name looked up in the extension bag
//!
//! Anything unresolvable is `Value::Null`.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde_json::{json, Value};

use crate::config::REFERENCE_HOUR_UTC;
use crate::types::{Game, RawRecord};

/// Prefix that names the extension bag explicitly in a dot path.
const BAG_PREFIX: &str = "raw";

pub fn resolve(game: &Game, field: &str) -> Value {
    if let Some(computed) = ComputedField::from_name(field) {
        return computed.value(game);
    }
    if field.contains('.') {
        return walk_path(&game.raw, field);
    }
    if let Some(known) = GameField::from_name(field) {
        return known.value(game);
    }
    game.raw.get(field).cloned().unwrap_or(Value::Null)
}

// ---------------------------------------------------------------------------
// Computed calendar fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputedField {
    /// 1-12
    Month,
    Year,
    /// `January`..`December`
    MonthName,
    /// `Monday`..`Sunday`
    DayOfWeek,
}

impl ComputedField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "month" => Some(ComputedField::Month),
            "year" => Some(ComputedField::Year),
            "monthName" => Some(ComputedField::MonthName),
            "dayOfWeek" => Some(ComputedField::DayOfWeek),
            _ => None,
        }
    }

    pub fn value(self, game: &Game) -> Value {
        let Some(at) = anchored_date(&game.game_date) else {
            return Value::Null;
        };
        match self {
            ComputedField::Month => json!(at.month()),
            ComputedField::Year => json!(at.year()),
            ComputedField::MonthName => json!(at.format("%B").to_string()),
            ComputedField::DayOfWeek => json!(at.format("%A").to_string()),
        }
    }
}

/// The game date pinned to `REFERENCE_HOUR_UTC`, so calendar fields never
/// depend on the host timezone.
fn anchored_date(game_date: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(game_date.get(..10)?, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(REFERENCE_HOUR_UTC, 0, 0)?.and_utc())
}

// ---------------------------------------------------------------------------
// Extension bag paths
// ---------------------------------------------------------------------------

/// Walk `a.b.c` into the bag. A leading `raw.` is accepted and skipped;
/// numeric segments index into arrays.
fn walk_path(bag: &RawRecord, path: &str) -> Value {
    let mut segments = path.split('.').peekable();
    if segments.peek() == Some(&BAG_PREFIX) && !bag.contains_key(BAG_PREFIX) {
        segments.next();
    }

    let Some(first) = segments.next() else {
        return Value::Null;
    };
    let Some(mut current) = bag.get(first) else {
        return Value::Null;
    };

    for segment in segments {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(v) => current = v,
            None => return Value::Null,
        }
    }
    current.clone()
}

// ---------------------------------------------------------------------------
// Schema fields
// ---------------------------------------------------------------------------

/// Closed set of promoted `Game` attributes addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameField {
    Sport,
    Season,
    GameDate,
    Week,
    HomeTeam,
    AwayTeam,
    HomeScore,
    AwayScore,
    ScoreDifference,
    Winner,
    TotalPoints,
    HomeRank,
    AwayRank,
    HomeEfficiencyRank,
    AwayEfficiencyRank,
    Spread,
    OverUnder,
    SpreadResult,
    OuResult,
    IsConferenceGame,
    IsPlayoff,
    IsNeutralSite,
    IsPrimetime,
    HomeOffBye,
    AwayOffBye,
    HomeBackToBack,
    AwayBackToBack,
    Overtimes,
    HomeSeed,
    AwaySeed,
    Temperature,
    WindSpeed,
    Roof,
    HomeRestDays,
    AwayRestDays,
    HomeConference,
    AwayConference,
    HomeAdjEm,
    AwayAdjEm,
}

impl GameField {
    pub const ALL: [GameField; 39] = [
        GameField::Sport,
        GameField::Season,
        GameField::GameDate,
        GameField::Week,
        GameField::HomeTeam,
        GameField::AwayTeam,
        GameField::HomeScore,
        GameField::AwayScore,
        GameField::ScoreDifference,
        GameField::Winner,
        GameField::TotalPoints,
        GameField::HomeRank,
        GameField::AwayRank,
        GameField::HomeEfficiencyRank,
        GameField::AwayEfficiencyRank,
        GameField::Spread,
        GameField::OverUnder,
        GameField::SpreadResult,
        GameField::OuResult,
        GameField::IsConferenceGame,
        GameField::IsPlayoff,
        GameField::IsNeutralSite,
        GameField::IsPrimetime,
        GameField::HomeOffBye,
        GameField::AwayOffBye,
        GameField::HomeBackToBack,
        GameField::AwayBackToBack,
        GameField::Overtimes,
        GameField::HomeSeed,
        GameField::AwaySeed,
        GameField::Temperature,
        GameField::WindSpeed,
        GameField::Roof,
        GameField::HomeRestDays,
        GameField::AwayRestDays,
        GameField::HomeConference,
        GameField::AwayConference,
        GameField::HomeAdjEm,
        GameField::AwayAdjEm,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GameField::Sport => "sport",
            GameField::Season => "season",
            GameField::GameDate => "gameDate",
            GameField::Week => "week",
            GameField::HomeTeam => "homeTeam",
            GameField::AwayTeam => "awayTeam",
            GameField::HomeScore => "homeScore",
            GameField::AwayScore => "awayScore",
            GameField::ScoreDifference => "scoreDifference",
            GameField::Winner => "winner",
            GameField::TotalPoints => "totalPoints",
            GameField::HomeRank => "homeRank",
            GameField::AwayRank => "awayRank",
            GameField::HomeEfficiencyRank => "homeEfficiencyRank",
            GameField::AwayEfficiencyRank => "awayEfficiencyRank",
            GameField::Spread => "spread",
            GameField::OverUnder => "overUnder",
            GameField::SpreadResult => "spreadResult",
            GameField::OuResult => "ouResult",
            GameField::IsConferenceGame => "isConferenceGame",
            GameField::IsPlayoff => "isPlayoff",
            GameField::IsNeutralSite => "isNeutralSite",
            GameField::IsPrimetime => "isPrimetime",
            GameField::HomeOffBye => "homeOffBye",
            GameField::AwayOffBye => "awayOffBye",
            GameField::HomeBackToBack => "homeBackToBack",
            GameField::AwayBackToBack => "awayBackToBack",
            GameField::Overtimes => "overtimes",
            GameField::HomeSeed => "homeSeed",
            GameField::AwaySeed => "awaySeed",
            GameField::Temperature => "temperature",
            GameField::WindSpeed => "windSpeed",
            GameField::Roof => "roof",
            GameField::HomeRestDays => "homeRestDays",
            GameField::AwayRestDays => "awayRestDays",
            GameField::HomeConference => "homeConference",
            GameField::AwayConference => "awayConference",
            GameField::HomeAdjEm => "homeAdjEm",
            GameField::AwayAdjEm => "awayAdjEm",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    pub fn value(self, game: &Game) -> Value {
        match self {
            GameField::Sport => json!(game.sport.as_str()),
            GameField::Season => json!(game.season),
            GameField::GameDate => json!(game.game_date),
            GameField::Week => json!(game.week),
            GameField::HomeTeam => json!(game.home_team),
            GameField::AwayTeam => json!(game.away_team),
            GameField::HomeScore => json!(game.home_score),
            GameField::AwayScore => json!(game.away_score),
            GameField::ScoreDifference => json!(game.score_difference),
            GameField::Winner => json!(game.winner),
            GameField::TotalPoints => json!(game.total_points),
            GameField::HomeRank => json!(game.home_rank),
            GameField::AwayRank => json!(game.away_rank),
            GameField::HomeEfficiencyRank => json!(game.home_efficiency_rank),
            GameField::AwayEfficiencyRank => json!(game.away_efficiency_rank),
            GameField::Spread => json!(game.spread),
            GameField::OverUnder => json!(game.over_under),
            GameField::SpreadResult => json!(game.spread_result.map(|r| r.as_str())),
            GameField::OuResult => json!(game.ou_result.map(|r| r.as_str())),
            GameField::IsConferenceGame => json!(game.is_conference_game),
            GameField::IsPlayoff => json!(game.is_playoff),
            GameField::IsNeutralSite => json!(game.is_neutral_site),
            GameField::IsPrimetime => json!(game.is_primetime),
            GameField::HomeOffBye => json!(game.home_off_bye),
            GameField::AwayOffBye => json!(game.away_off_bye),
            GameField::HomeBackToBack => json!(game.home_back_to_back),
            GameField::AwayBackToBack => json!(game.away_back_to_back),
            GameField::Overtimes => json!(game.overtimes),
            GameField::HomeSeed => json!(game.home_seed),
            GameField::AwaySeed => json!(game.away_seed),
            GameField::Temperature => json!(game.temperature),
            GameField::WindSpeed => json!(game.wind_speed),
            GameField::Roof => json!(game.roof),
            GameField::HomeRestDays => json!(game.home_rest_days),
            GameField::AwayRestDays => json!(game.away_rest_days),
            GameField::HomeConference => json!(game.home_conference),
            GameField::AwayConference => json!(game.away_conference),
            GameField::HomeAdjEm => json!(game.home_adj_em),
            GameField::AwayAdjEm => json!(game.away_adj_em),
        }
    }
}
