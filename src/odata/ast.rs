//! # OData Expression AST
//!
//! Bound single-value expression tree produced by the parser.

use crate::value::ScalarValue;

use super::model::EdmPrimitiveKind;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperatorKind {
    Or,
    And,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl BinaryOperatorKind {
    /// Maps a comparison keyword
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "eq" => Some(BinaryOperatorKind::Equal),
            "ne" => Some(BinaryOperatorKind::NotEqual),
            "gt" => Some(BinaryOperatorKind::GreaterThan),
            "ge" => Some(BinaryOperatorKind::GreaterThanOrEqual),
            "lt" => Some(BinaryOperatorKind::LessThan),
            "le" => Some(BinaryOperatorKind::LessThanOrEqual),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperatorKind::Or => "or",
            BinaryOperatorKind::And => "and",
            BinaryOperatorKind::Equal => "eq",
            BinaryOperatorKind::NotEqual => "ne",
            BinaryOperatorKind::GreaterThan => "gt",
            BinaryOperatorKind::GreaterThanOrEqual => "ge",
            BinaryOperatorKind::LessThan => "lt",
            BinaryOperatorKind::LessThanOrEqual => "le",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperatorKind {
    Not,
}

/// A node of the expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    BinaryOperator {
        operator: BinaryOperatorKind,
        left: Box<QueryNode>,
        right: Box<QueryNode>,
    },
    UnaryOperator {
        operator: UnaryOperatorKind,
        operand: Box<QueryNode>,
    },
    /// Reference to a structural property
    PropertyAccess { name: String, kind: EdmPrimitiveKind },
    Constant(ScalarValue),
    /// Implicit conversion of an operand to a property's kind
    Convert {
        source: Box<QueryNode>,
        target: EdmPrimitiveKind,
    },
    FunctionCall { name: String, arguments: Vec<QueryNode> },
}

impl QueryNode {
    pub fn binary(operator: BinaryOperatorKind, left: QueryNode, right: QueryNode) -> Self {
        QueryNode::BinaryOperator {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(operand: QueryNode) -> Self {
        QueryNode::UnaryOperator {
            operator: UnaryOperatorKind::Not,
            operand: Box::new(operand),
        }
    }

    pub fn property(name: impl Into<String>, kind: EdmPrimitiveKind) -> Self {
        QueryNode::PropertyAccess {
            name: name.into(),
            kind,
        }
    }

    pub fn constant(value: impl Into<ScalarValue>) -> Self {
        QueryNode::Constant(value.into())
    }

    /// `null` converted to the kind of the property it is compared with
    pub fn converted_null(target: EdmPrimitiveKind) -> Self {
        QueryNode::Convert {
            source: Box::new(QueryNode::Constant(ScalarValue::Null)),
            target,
        }
    }

    pub fn call(name: impl Into<String>, arguments: Vec<QueryNode>) -> Self {
        QueryNode::FunctionCall {
            name: name.into(),
            arguments,
        }
    }

    /// Node kind name used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            QueryNode::BinaryOperator { .. } => "BinaryOperatorNode",
            QueryNode::UnaryOperator { .. } => "UnaryOperatorNode",
            QueryNode::PropertyAccess { .. } => "SingleValuePropertyAccessNode",
            QueryNode::Constant(_) => "ConstantNode",
            QueryNode::Convert { .. } => "ConvertNode",
            QueryNode::FunctionCall { .. } => "SingleValueFunctionCallNode",
        }
    }

    /// Property name if this is a property access
    pub fn as_property(&self) -> Option<&str> {
        match self {
            QueryNode::PropertyAccess { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns true for `Convert(Constant(null))`
    pub fn is_converted_null(&self) -> bool {
        matches!(
            self,
            QueryNode::Convert { source, .. } if matches!(**source, QueryNode::Constant(ScalarValue::Null))
        )
    }
}

/// Parsed `$filter`
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub expression: QueryNode,
}

/// Sort direction of an `$orderby` item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderByDirection {
    #[default]
    Ascending,
    Descending,
}

/// Parsed `$orderby`, a chain of items
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByClause {
    pub expression: QueryNode,
    pub direction: OrderByDirection,
    pub then_by: Option<Box<OrderByClause>>,
}

impl OrderByClause {
    /// Number of items in the chain
    pub fn len(&self) -> usize {
        1 + self.then_by.as_ref().map_or(0, |next| next.len())
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
