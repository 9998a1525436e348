//! Predicate filtering for query execution
//!
//! Evaluates a predicate tree against one record. Every child of an AND or
//! OR node is evaluated, so a type error anywhere in the tree fails the
//! query even when the outcome is already decided.

use chrono::{Datelike, Timelike};

use crate::delegation::{
    Condition, ConditionOperator, FieldFunction, Filter, LogicalOperator, QueryError, QueryResult,
};
use crate::value::{Record, ScalarValue};

use super::compare::{compare_ordered, reconcile, values_equal};

/// Evaluates predicate trees against records
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks if a record matches the filter; the empty filter matches
    /// everything
    pub fn matches(record: &Record, filter: &Filter) -> QueryResult<bool> {
        match filter {
            Filter::Combinator { operator, children } => {
                let results = children
                    .iter()
                    .map(|child| Self::matches(record, child))
                    .collect::<QueryResult<Vec<bool>>>()?;
                Ok(Self::fold(*operator, results))
            }
            Filter::Leaf {
                operator,
                conditions,
            } => {
                let results = conditions
                    .iter()
                    .map(|condition| Self::evaluate_condition(record, condition))
                    .collect::<QueryResult<Vec<bool>>>()?;
                Ok(Self::fold(*operator, results))
            }
        }
    }

    fn fold(operator: LogicalOperator, results: Vec<bool>) -> bool {
        let mut iter = results.into_iter();
        match iter.next() {
            None => true,
            Some(first) => iter.fold(first, |acc, r| operator.combine(acc, r)),
        }
    }

    /// Evaluates one leaf condition
    pub fn evaluate_condition(record: &Record, condition: &Condition) -> QueryResult<bool> {
        let field = condition.attribute.as_str();
        let stored = record.value(field);

        match condition.operator {
            ConditionOperator::IsNull if condition.field_functions.is_empty() => {
                return Ok(stored.is_null())
            }
            ConditionOperator::IsNotNull if condition.field_functions.is_empty() => {
                return Ok(!stored.is_null())
            }
            ConditionOperator::InList if condition.field_functions.is_empty() => {
                for value in &condition.values {
                    let (actual, literal) = reconcile(field, stored, value)?;
                    if values_equal(&actual, &literal) {
                        return Ok(true);
                    }
                }
                return Ok(false);
            }
            _ => {}
        }

        let literal = condition.compare_to().ok_or_else(|| {
            QueryError::unsupported_construct(
                condition.operator.op_name(),
                format!("Condition on '{}' has no value to compare", field),
            )
        })?;
        let (actual, literal) = reconcile(field, stored, literal)?;

        if let Some(function) = condition.field_functions.first() {
            return Self::evaluate_field_function(field, *function, &actual, &literal);
        }

        match condition.operator {
            ConditionOperator::Equal => Ok(values_equal(&actual, &literal)),
            ConditionOperator::NotEqual => Ok(!values_equal(&actual, &literal)),
            ConditionOperator::GreaterThan => {
                Ok(compare_ordered(field, &actual, &literal)?.is_some_and(|o| o.is_gt()))
            }
            ConditionOperator::GreaterOrEqual => {
                Ok(compare_ordered(field, &actual, &literal)?.is_some_and(|o| o.is_ge()))
            }
            ConditionOperator::LessThan => {
                Ok(compare_ordered(field, &actual, &literal)?.is_some_and(|o| o.is_lt()))
            }
            ConditionOperator::LessOrEqual => {
                Ok(compare_ordered(field, &actual, &literal)?.is_some_and(|o| o.is_le()))
            }
            ConditionOperator::Contains => {
                Self::text_test(field, &actual, &literal, |a, l| a.contains(l))
            }
            ConditionOperator::BeginsWith => {
                Self::text_test(field, &actual, &literal, |a, l| a.starts_with(l))
            }
            ConditionOperator::EndsWith => {
                Self::text_test(field, &actual, &literal, |a, l| a.ends_with(l))
            }
            ConditionOperator::IsNull => Ok(actual.is_null()),
            ConditionOperator::IsNotNull => Ok(!actual.is_null()),
            ConditionOperator::InList => Ok(values_equal(&actual, &literal)),
        }
    }

    /// Ordinal text test; a null field never matches
    fn text_test(
        field: &str,
        actual: &ScalarValue,
        literal: &ScalarValue,
        test: impl Fn(&str, &str) -> bool,
    ) -> QueryResult<bool> {
        match (actual, literal) {
            (ScalarValue::Null, _) => Ok(false),
            (ScalarValue::String(a), ScalarValue::String(l)) => Ok(test(a, l)),
            (ScalarValue::String(_), other) => {
                Err(QueryError::type_mismatch(field, other.type_name(), "string"))
            }
            (other, _) => Err(QueryError::type_mismatch(field, "string", other.type_name())),
        }
    }

    fn evaluate_field_function(
        field: &str,
        function: FieldFunction,
        actual: &ScalarValue,
        literal: &ScalarValue,
    ) -> QueryResult<bool> {
        match function {
            FieldFunction::StartsWith => {
                Self::text_test(field, actual, literal, |a, l| a.starts_with(l))
            }
            FieldFunction::EndsWith => {
                Self::text_test(field, actual, literal, |a, l| a.ends_with(l))
            }
            FieldFunction::Year | FieldFunction::Month | FieldFunction::Hour => {
                let expected = integral(literal).ok_or_else(|| {
                    QueryError::type_mismatch(field, "integer", literal.type_name())
                })?;
                let component = match date_part(function, actual) {
                    Some(component) => component,
                    None if actual.is_null() => return Ok(false),
                    None => {
                        return Err(QueryError::type_mismatch(
                            field,
                            function.as_str(),
                            actual.type_name(),
                        ))
                    }
                };
                Ok(component == expected)
            }
        }
    }
}

/// Calendar component of a temporal value
fn date_part(function: FieldFunction, value: &ScalarValue) -> Option<i64> {
    match (function, value) {
        (FieldFunction::Year, ScalarValue::Date(d)) => Some(i64::from(d.year())),
        (FieldFunction::Year, ScalarValue::DateTime(dt)) => Some(i64::from(dt.year())),
        (FieldFunction::Month, ScalarValue::Date(d)) => Some(i64::from(d.month())),
        (FieldFunction::Month, ScalarValue::DateTime(dt)) => Some(i64::from(dt.month())),
        (FieldFunction::Hour, ScalarValue::DateTime(dt)) => Some(i64::from(dt.hour())),
        (FieldFunction::Hour, ScalarValue::Time(t)) => Some(i64::from(t.hour())),
        // Midnight
        (FieldFunction::Hour, ScalarValue::Date(_)) => Some(0),
        _ => None,
    }
}

/// Integral value of a numeric literal
fn integral(value: &ScalarValue) -> Option<i64> {
    let n = value.as_f64()?;
    if n.fract() == 0.0 && n.is_finite() {
        Some(n as i64)
    } else {
        None
    }
}
