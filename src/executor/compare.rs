//! Value comparison for filtering and sorting
//!
//! Equality is value equality with number/decimal cross-kind equality.
//! Ordered comparisons require comparable kinds and report `None` when
//! either side is null. Sorting uses a total order: null first, then kinds
//! by a fixed rank, then natural order within a kind.

use std::cmp::Ordering;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::delegation::{QueryError, QueryResult};
use crate::value::ScalarValue;

/// Aligns a stored value and a literal when exactly one side is decimal.
///
/// A decimal field pulls the literal to decimal; a decimal literal pushes
/// the field value to a plain number. Null passes through unchanged.
pub fn reconcile(
    field: &str,
    actual: &ScalarValue,
    literal: &ScalarValue,
) -> QueryResult<(ScalarValue, ScalarValue)> {
    match (actual, literal) {
        (ScalarValue::Decimal(_), ScalarValue::Decimal(_)) => Ok((actual.clone(), literal.clone())),
        (ScalarValue::Decimal(_), _) => {
            let converted = to_decimal(literal).ok_or_else(|| {
                QueryError::type_mismatch(field, "decimal", literal.type_name())
            })?;
            Ok((actual.clone(), converted))
        }
        (_, ScalarValue::Decimal(_)) => {
            let converted = to_number(actual).ok_or_else(|| {
                QueryError::type_mismatch(field, "decimal", actual.type_name())
            })?;
            Ok((converted, literal.clone()))
        }
        _ => Ok((actual.clone(), literal.clone())),
    }
}

fn to_decimal(value: &ScalarValue) -> Option<ScalarValue> {
    match value {
        ScalarValue::Null => Some(ScalarValue::Null),
        ScalarValue::Number(n) => Decimal::try_from(*n).ok().map(ScalarValue::Decimal),
        ScalarValue::String(s) => s.trim().parse::<Decimal>().ok().map(ScalarValue::Decimal),
        _ => None,
    }
}

fn to_number(value: &ScalarValue) -> Option<ScalarValue> {
    match value {
        ScalarValue::Null => Some(ScalarValue::Null),
        ScalarValue::Number(n) => Some(ScalarValue::Number(*n)),
        ScalarValue::String(s) => s.trim().parse::<f64>().ok().map(ScalarValue::Number),
        _ => None,
    }
}

/// Value equality; mismatched kinds are simply unequal
pub fn values_equal(a: &ScalarValue, b: &ScalarValue) -> bool {
    match (a, b) {
        (ScalarValue::Decimal(x), ScalarValue::Decimal(y)) => x == y,
        (
            ScalarValue::Number(_) | ScalarValue::Decimal(_),
            ScalarValue::Number(_) | ScalarValue::Decimal(_),
        ) => a.as_f64() == b.as_f64(),
        _ => a == b,
    }
}

/// Orders a stored value against a literal.
///
/// Returns `Ok(None)` when either side is null or the numbers are not
/// comparable (NaN); fails when the kinds cannot be ordered against each
/// other.
pub fn compare_ordered(
    field: &str,
    actual: &ScalarValue,
    literal: &ScalarValue,
) -> QueryResult<Option<Ordering>> {
    use ScalarValue as V;

    let ordering = match (actual, literal) {
        (V::Null, _) | (_, V::Null) => None,
        (V::Decimal(x), V::Decimal(y)) => Some(x.cmp(y)),
        (V::Number(_) | V::Decimal(_), V::Number(_) | V::Decimal(_)) => {
            actual.as_f64().partial_cmp(&literal.as_f64())
        }
        (V::String(x), V::String(y)) => Some(x.cmp(y)),
        (V::Boolean(x), V::Boolean(y)) => Some(x.cmp(y)),
        (V::Guid(x), V::Guid(y)) => Some(x.cmp(y)),
        (V::DateTime(x), V::DateTime(y)) => Some(x.cmp(y)),
        (V::Date(x), V::Date(y)) => Some(x.cmp(y)),
        (V::Time(x), V::Time(y)) => Some(x.cmp(y)),
        _ => {
            return Err(QueryError::type_mismatch(
                field,
                literal.type_name(),
                actual.type_name(),
            ))
        }
    };

    Ok(ordering)
}

fn kind_rank(value: &ScalarValue) -> u8 {
    match value {
        ScalarValue::Null => 0,
        ScalarValue::Boolean(_) => 1,
        ScalarValue::Number(_) | ScalarValue::Decimal(_) => 2,
        ScalarValue::String(_) => 3,
        ScalarValue::Guid(_) => 4,
        ScalarValue::Date(_) => 5,
        ScalarValue::DateTime(_) => 6,
        ScalarValue::Time(_) => 7,
    }
}

/// Total order used for sorting
pub fn sort_cmp(a: &ScalarValue, b: &ScalarValue) -> Ordering {
    use ScalarValue as V;

    let rank = kind_rank(a).cmp(&kind_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }

    match (a, b) {
        (V::Decimal(x), V::Decimal(y)) => x.cmp(y),
        (V::Number(_) | V::Decimal(_), V::Number(_) | V::Decimal(_)) => {
            numeric(a).total_cmp(&numeric(b))
        }
        (V::String(x), V::String(y)) => x.cmp(y),
        (V::Boolean(x), V::Boolean(y)) => x.cmp(y),
        (V::Guid(x), V::Guid(y)) => x.cmp(y),
        (V::DateTime(x), V::DateTime(y)) => x.cmp(y),
        (V::Date(x), V::Date(y)) => x.cmp(y),
        (V::Time(x), V::Time(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn numeric(value: &ScalarValue) -> f64 {
    match value {
        ScalarValue::Number(n) => *n,
        ScalarValue::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}
