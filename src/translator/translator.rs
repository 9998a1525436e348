//! OData to predicate tree translation
//!
//! Supported shapes:
//! - `a and b`, `a or b`: a two-child combinator, never flattened
//! - `prop eq null`, `prop ne null`: null checks
//! - `prop <cmp> constant` for the six comparison operators
//! - `contains(prop, constant)`
//!
//! Every other node fails with CONNECTOR_UNSUPPORTED_CONSTRUCT naming the
//! node kind.

use crate::delegation::{
    Condition, ConditionOperator, Filter, LogicalOperator, QueryError, QueryResult,
};
use crate::odata::{BinaryOperatorKind, QueryNode};

/// Translates a bound OData expression into a predicate tree
pub fn translate(node: &QueryNode) -> QueryResult<Filter> {
    match node {
        QueryNode::BinaryOperator {
            operator,
            left,
            right,
        } => translate_binary(node, *operator, left, right),
        QueryNode::FunctionCall { name, arguments } => translate_call(node, name, arguments),
        other => Err(unsupported(other, "Unhandled node")),
    }
}

fn translate_binary(
    node: &QueryNode,
    operator: BinaryOperatorKind,
    left: &QueryNode,
    right: &QueryNode,
) -> QueryResult<Filter> {
    let logical = match operator {
        BinaryOperatorKind::And => Some(LogicalOperator::And),
        BinaryOperatorKind::Or => Some(LogicalOperator::Or),
        _ => None,
    };
    if let Some(logical) = logical {
        return Ok(Filter::Combinator {
            operator: logical,
            children: vec![translate(left)?, translate(right)?],
        });
    }

    let Some(field) = left.as_property() else {
        return Err(unsupported(node, "Unhandled binary node"));
    };

    if right.is_converted_null() {
        let condition = match operator {
            BinaryOperatorKind::Equal => Condition::is_null(field),
            BinaryOperatorKind::NotEqual => Condition::is_not_null(field),
            other => {
                return Err(unsupported(
                    node,
                    format!("Unhandled null comparison '{}'", other.as_str()),
                ))
            }
        };
        return Ok(Filter::condition(condition));
    }

    match right {
        QueryNode::Constant(value) => {
            let op = comparison_operator(node, operator)?;
            Ok(Filter::condition(Condition::new(
                field,
                op,
                vec![value.clone()],
            )))
        }
        _ => Err(unsupported(node, "Unhandled binary node")),
    }
}

fn translate_call(node: &QueryNode, name: &str, arguments: &[QueryNode]) -> QueryResult<Filter> {
    if let ("contains", [QueryNode::PropertyAccess { name: field, .. }, QueryNode::Constant(value)]) =
        (name, arguments)
    {
        return Ok(Filter::condition(Condition::new(
            field.as_str(),
            ConditionOperator::Contains,
            vec![value.clone()],
        )));
    }

    Err(unsupported(
        node,
        format!("Unhandled function call '{}'", name),
    ))
}

fn comparison_operator(
    node: &QueryNode,
    operator: BinaryOperatorKind,
) -> QueryResult<ConditionOperator> {
    match operator {
        BinaryOperatorKind::Equal => Ok(ConditionOperator::Equal),
        BinaryOperatorKind::NotEqual => Ok(ConditionOperator::NotEqual),
        BinaryOperatorKind::GreaterThan => Ok(ConditionOperator::GreaterThan),
        BinaryOperatorKind::GreaterThanOrEqual => Ok(ConditionOperator::GreaterOrEqual),
        BinaryOperatorKind::LessThan => Ok(ConditionOperator::LessThan),
        BinaryOperatorKind::LessThanOrEqual => Ok(ConditionOperator::LessOrEqual),
        other => Err(unsupported(
            node,
            format!("Can't convert operator '{}'", other.as_str()),
        )),
    }
}

fn unsupported(node: &QueryNode, reason: impl Into<String>) -> QueryError {
    let kind = node.kind_name();
    QueryError::unsupported_construct(kind, format!("{}: {}", reason.into(), kind))
}
