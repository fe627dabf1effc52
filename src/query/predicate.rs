use std::cmp::Ordering;

use serde_json::Value;
use tracing::warn;

use crate::query::resolver::resolve;
use crate::query::{Filter, Operator};
use crate::types::Game;

/// True when `game` satisfies `filter`.
pub fn matches(game: &Game, filter: &Filter) -> bool {
    let field_value = resolve(game, &filter.field);
    evaluate(&field_value, &filter.op, &filter.value)
}

/// Apply one operator to a resolved field value and the filter's value.
///
/// An absent (`null`) field only satisfies `eq null` and `ne <non-null>`.
/// String equality, membership and substring tests ignore case; numbers and
/// booleans compare exactly. Unknown operators match nothing.
pub fn evaluate(field: &Value, op: &Operator, expected: &Value) -> bool {
    if let Operator::Unknown(name) = op {
        warn!(operator = %name, "[FILTER] unknown operator '{name}', excluding game");
        return false;
    }

    if field.is_null() {
        return match op {
            Operator::Eq => expected.is_null(),
            Operator::Ne => !expected.is_null(),
            _ => false,
        };
    }

    match op {
        Operator::Eq => values_equal(field, expected),
        Operator::Ne => !values_equal(field, expected),
        Operator::Gt => compare(field, expected) == Some(Ordering::Greater),
        Operator::Gte => matches!(compare(field, expected), Some(Ordering::Greater | Ordering::Equal)),
        Operator::Lt => compare(field, expected) == Some(Ordering::Less),
        Operator::Lte => matches!(compare(field, expected), Some(Ordering::Less | Ordering::Equal)),
        Operator::In => expected
            .as_array()
            .is_some_and(|items| items.iter().any(|item| values_equal(field, item))),
        Operator::NotIn => expected
            .as_array()
            .is_some_and(|items| !items.iter().any(|item| values_equal(field, item))),
        Operator::Contains => contains(field, expected),
        Operator::Between => between(field, expected),
        Operator::Unknown(_) => false,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.to_lowercase() == y.to_lowercase(),
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
        _ => a == b,
    }
}

/// Ordering for numbers (numeric) and strings (ordinal). Other kinds do not order.
pub(crate) fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.as_str().cmp(y.as_str())),
        _ => None,
    }
}

fn contains(field: &Value, needle: &Value) -> bool {
    match (field, needle) {
        (Value::String(haystack), Value::String(needle)) => {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }
        (Value::Array(items), _) => items.iter().any(|item| values_equal(item, needle)),
        _ => false,
    }
}

/// Inclusive `[lo, hi]`.
fn between(field: &Value, range: &Value) -> bool {
    let Some(bounds) = range.as_array() else {
        return false;
    };
    let [lo, hi] = bounds.as_slice() else {
        return false;
    };
    matches!(compare(field, lo), Some(Ordering::Greater | Ordering::Equal))
        && matches!(compare(field, hi), Some(Ordering::Less | Ordering::Equal))
}
