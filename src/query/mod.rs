//! Trend query model and the evaluation pipeline.

pub mod aggregate;
pub mod perspective;
pub mod pipeline;
pub mod predicate;
pub mod resolver;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Game, Perspective, SportSelector, Summary};

pub use pipeline::TrendEngine;

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Comparison operator of a filter. Names outside the known set are kept as
/// `Unknown` so a query carrying one still deserializes; such a filter
/// matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Contains,
    Between,
    Unknown(String),
}

impl From<String> for Operator {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "eq" | "=" | "==" | "equals" => Operator::Eq,
            "ne" | "neq" | "!=" | "<>" => Operator::Ne,
            "gt" | ">" => Operator::Gt,
            "gte" | ">=" => Operator::Gte,
            "lt" | "<" => Operator::Lt,
            "lte" | "<=" => Operator::Lte,
            "in" => Operator::In,
            "not_in" | "nin" => Operator::NotIn,
            "contains" => Operator::Contains,
            "between" => Operator::Between,
            _ => Operator::Unknown(s),
        }
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Unknown(name) => name,
            known => known.to_string(),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::Contains => "contains",
            Operator::Between => "between",
            Operator::Unknown(name) => name.as_str(),
        };
        write!(f, "{s}")
    }
}

/// `(field, op, value)`. A query ANDs its filters together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    #[serde(alias = "operator")]
    pub op: Operator,
    #[serde(default)]
    pub value: Value,
}

#[cfg(test)]
impl Filter {
    pub fn new(field: impl Into<String>, op: &str, value: Value) -> Self {
        Self {
            field: field.into(),
            op: Operator::from(op.to_string()),
            value,
        }
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    #[serde(default)]
    pub sport: SportSelector,
    /// Restricts the game pool to this participant; also names the side
    /// for the `team` and `opponent` perspectives.
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub perspective: Perspective,
    #[serde(default)]
    pub filters: Vec<Filter>,
    /// Inclusive.
    #[serde(default)]
    pub season_start: Option<i32>,
    /// Inclusive.
    #[serde(default)]
    pub season_end: Option<i32>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub sort: Option<SortSpec>,
}

impl Query {
    /// Trimmed team name, `None` when absent or blank.
    pub fn team_name(&self) -> Option<&str> {
        self.team.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub query: Query,
    /// Matches before the limit was applied.
    pub total_matched: usize,
    pub games: Vec<Game>,
    pub summary: Summary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_deserializes_with_defaults() {
        let q: Query = serde_json::from_value(json!({
            "sport": "nfl",
            "perspective": "favorite",
            "filters": [{ "field": "spread", "operator": "between", "value": [-7, -3] }],
            "seasonStart": 2019
        }))
        .unwrap();

        assert_eq!(q.sport, SportSelector::Nfl);
        assert_eq!(q.perspective, Perspective::Favorite);
        assert_eq!(q.filters[0].op, Operator::Between);
        assert_eq!(q.season_start, Some(2019));
        assert!(q.season_end.is_none());
        assert!(q.sort.is_none());
    }

    #[test]
    fn unknown_operator_survives_round_trip_by_name() {
        let f: Filter = serde_json::from_value(json!({ "field": "spread", "op": "near", "value": 3 })).unwrap();
        assert_eq!(f.op, Operator::Unknown("near".to_string()));
        assert_eq!(serde_json::to_value(&f).unwrap()["op"], json!("near"));
    }

    #[test]
    fn operator_aliases() {
        assert_eq!(Operator::from(">=".to_string()), Operator::Gte);
        assert_eq!(Operator::from("NEQ".to_string()), Operator::Ne);
        assert_eq!(Operator::from("==".to_string()), Operator::Eq);
    }

    #[test]
    fn blank_team_is_no_team() {
        let q = Query { team: Some("   ".to_string()), ..Query::default() };
        assert!(q.team_name().is_none());
    }
}
