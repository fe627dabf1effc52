use serde::{Deserialize, Serialize};

/// The original provider record, kept verbatim as the extension bag.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Sport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Nfl,
    Nba,
    Ncaab,
}

impl Sport {
    pub const ALL: [Sport; 3] = [Sport::Nfl, Sport::Nba, Sport::Ncaab];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Nfl => "nfl",
            Sport::Nba => "nba",
            Sport::Ncaab => "ncaab",
        }
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sport selector carried by a query: one sport, or every sport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SportSelector {
    #[default]
    All,
    Nfl,
    Nba,
    Ncaab,
}

impl SportSelector {
    /// Sports covered by this selector, in fixed load order.
    pub fn sports(&self) -> Vec<Sport> {
        match self {
            SportSelector::All => Sport::ALL.to_vec(),
            SportSelector::Nfl => vec![Sport::Nfl],
            SportSelector::Nba => vec![Sport::Nba],
            SportSelector::Ncaab => vec![Sport::Ncaab],
        }
    }

    pub fn matches(&self, sport: Sport) -> bool {
        match self {
            SportSelector::All => true,
            SportSelector::Nfl => sport == Sport::Nfl,
            SportSelector::Nba => sport == Sport::Nba,
            SportSelector::Ncaab => sport == Sport::Ncaab,
        }
    }
}

// ---------------------------------------------------------------------------
// Betting outcomes
// ---------------------------------------------------------------------------

/// Result against the spread. Stored on `Game` from the home side only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SpreadResult {
    Covered,
    Lost,
    Push,
}

impl SpreadResult {
    /// Home-side ATS result for a final margin and home line.
    /// `adjusted = score_difference + spread`.
    pub fn for_home(score_difference: i32, spread: f64) -> Self {
        let adjusted = f64::from(score_difference) + spread;
        if adjusted > 0.0 {
            SpreadResult::Covered
        } else if adjusted < 0.0 {
            SpreadResult::Lost
        } else {
            SpreadResult::Push
        }
    }

    /// Away-side ATS result: the home result mirrored.
    pub fn for_away(score_difference: i32, spread: f64) -> Self {
        SpreadResult::for_home(score_difference, spread).mirrored()
    }

    pub fn mirrored(self) -> Self {
        match self {
            SpreadResult::Covered => SpreadResult::Lost,
            SpreadResult::Lost => SpreadResult::Covered,
            SpreadResult::Push => SpreadResult::Push,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpreadResult::Covered => "COVERED",
            SpreadResult::Lost => "LOST",
            SpreadResult::Push => "PUSH",
        }
    }
}

impl std::fmt::Display for SpreadResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result against the posted total. Identical for both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OuResult {
    Over,
    Under,
    Push,
}

impl OuResult {
    pub fn from_total(total_points: i32, over_under: f64) -> Self {
        let total = f64::from(total_points);
        if total > over_under {
            OuResult::Over
        } else if total < over_under {
            OuResult::Under
        } else {
            OuResult::Push
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OuResult::Over => "OVER",
            OuResult::Under => "UNDER",
            OuResult::Push => "PUSH",
        }
    }
}

impl std::fmt::Display for OuResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Game: the unified record every sport normalizes into
// ---------------------------------------------------------------------------

/// One normalized game. Built once by a sport adapter, never mutated.
///
/// Every optional field is `None` when the source sport does not carry it;
/// adapters never substitute a sport-plausible default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub sport: Sport,
    pub season: i32,
    /// Calendar date, `YYYY-MM-DD`.
    pub game_date: String,
    pub week: Option<i32>,

    pub home_team: String,
    pub away_team: String,
    /// Provider spellings seen for each side, used for team matching.
    pub home_aliases: Vec<String>,
    pub away_aliases: Vec<String>,

    pub home_score: i32,
    pub away_score: i32,
    /// home_score - away_score
    pub score_difference: i32,
    /// None on a tie.
    pub winner: Option<String>,
    /// home_score + away_score
    pub total_points: i32,

    pub home_rank: Option<i32>,
    pub away_rank: Option<i32>,
    pub home_efficiency_rank: Option<i32>,
    pub away_efficiency_rank: Option<i32>,

    /// Home line. Negative means home is favored.
    pub spread: Option<f64>,
    pub over_under: Option<f64>,
    pub spread_result: Option<SpreadResult>,
    pub ou_result: Option<OuResult>,

    pub is_conference_game: Option<bool>,
    pub is_playoff: Option<bool>,
    pub is_neutral_site: Option<bool>,
    pub is_primetime: Option<bool>,
    pub home_off_bye: Option<bool>,
    pub away_off_bye: Option<bool>,
    pub home_back_to_back: Option<bool>,
    pub away_back_to_back: Option<bool>,
    pub overtimes: Option<i32>,
    pub home_seed: Option<i32>,
    pub away_seed: Option<i32>,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub roof: Option<String>,
    pub home_rest_days: Option<i32>,
    pub away_rest_days: Option<i32>,
    pub home_conference: Option<String>,
    pub away_conference: Option<String>,
    pub home_adj_em: Option<f64>,
    pub away_adj_em: Option<f64>,

    /// Extension bag: the untouched source record.
    pub raw: RawRecord,
}

impl Game {
    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }

    pub fn aliases(&self, side: Side) -> &[String] {
        match side {
            Side::Home => &self.home_aliases,
            Side::Away => &self.away_aliases,
        }
    }

    pub fn score(&self, side: Side) -> i32 {
        match side {
            Side::Home => self.home_score,
            Side::Away => self.away_score,
        }
    }
}

// ---------------------------------------------------------------------------
// Perspective
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn flip(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Home => write!(f, "home"),
            Side::Away => write!(f, "away"),
        }
    }
}

/// Viewpoint the side-dependent statistics are computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    #[default]
    Home,
    Away,
    Favorite,
    Underdog,
    /// The query's named team.
    Team,
    /// Whoever the query's named team played against.
    Opponent,
}

impl Perspective {
    pub fn needs_team(&self) -> bool {
        matches!(self, Perspective::Team | Perspective::Opponent)
    }
}

impl std::fmt::Display for Perspective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Perspective::Home => "home",
            Perspective::Away => "away",
            Perspective::Favorite => "favorite",
            Perspective::Underdog => "underdog",
            Perspective::Team => "team",
            Perspective::Opponent => "opponent",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    Win,
    Loss,
    Tie,
}

/// One game seen from one side. Derived on demand, never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientedGame {
    pub side: Side,
    pub team: String,
    pub opponent: String,
    pub points_for: i32,
    pub points_against: i32,
    pub margin: i32,
    pub outcome: GameOutcome,
    pub ats_result: Option<SpreadResult>,
    /// The side's own line: home keeps `spread`, away gets its negation.
    pub spread: Option<f64>,
    pub ou_result: Option<OuResult>,
}

impl OrientedGame {
    pub fn won(&self) -> bool {
        self.outcome == GameOutcome::Win
    }

    pub fn lost(&self) -> bool {
        self.outcome == GameOutcome::Loss
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Aggregate trend statistics over an oriented game set.
/// Percentages exclude ties/pushes from their denominators and are `None`
/// when the denominator is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    pub win_pct: Option<f64>,

    pub ats_covered: usize,
    pub ats_lost: usize,
    pub ats_push: usize,
    pub ats_pct: Option<f64>,

    pub overs: usize,
    pub unders: usize,
    pub ou_push: usize,
    pub over_pct: Option<f64>,
    pub under_pct: Option<f64>,

    pub avg_points_for: Option<f64>,
    pub avg_points_against: Option<f64>,
    pub avg_margin: Option<f64>,
    pub avg_total_points: Option<f64>,
    pub avg_spread: Option<f64>,
    pub avg_over_under: Option<f64>,

    pub seasons: Vec<SeasonSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonSummary {
    pub season: i32,
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub ats_covered: usize,
    pub ats_lost: usize,
    pub win_pct: Option<f64>,
    pub ats_pct: Option<f64>,
}
