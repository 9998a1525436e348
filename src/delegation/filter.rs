//! Predicate tree
//!
//! Backend-neutral representation of a `$filter` clause. A node is either a
//! boolean combination of child nodes or a flat list of leaf conditions
//! joined by one operator. An empty node matches every record.

use crate::value::ScalarValue;

/// Boolean operator joining children or conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
        }
    }

    /// Combines two boolean results
    pub fn combine(&self, a: bool, b: bool) -> bool {
        match self {
            LogicalOperator::And => a && b,
            LogicalOperator::Or => a || b,
        }
    }
}

/// Leaf comparison operators
///
/// Adding an operator requires a translator mapping and an evaluator arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Contains,
    BeginsWith,
    EndsWith,
    IsNull,
    IsNotNull,
    InList,
}

impl ConditionOperator {
    /// Returns the operator name for diagnostics
    pub fn op_name(&self) -> &'static str {
        match self {
            ConditionOperator::Equal => "eq",
            ConditionOperator::NotEqual => "ne",
            ConditionOperator::GreaterThan => "gt",
            ConditionOperator::GreaterOrEqual => "ge",
            ConditionOperator::LessThan => "lt",
            ConditionOperator::LessOrEqual => "le",
            ConditionOperator::Contains => "contains",
            ConditionOperator::BeginsWith => "startswith",
            ConditionOperator::EndsWith => "endswith",
            ConditionOperator::IsNull => "null",
            ConditionOperator::IsNotNull => "notnull",
            ConditionOperator::InList => "in",
        }
    }

    /// Returns true if the operator reads no literal values
    pub fn is_null_check(&self) -> bool {
        matches!(self, ConditionOperator::IsNull | ConditionOperator::IsNotNull)
    }

    /// Returns true for the four ordering comparisons
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            ConditionOperator::GreaterThan
                | ConditionOperator::GreaterOrEqual
                | ConditionOperator::LessThan
                | ConditionOperator::LessOrEqual
        )
    }
}

/// Transform applied to the field value before comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldFunction {
    StartsWith,
    EndsWith,
    Year,
    Month,
    Hour,
}

impl FieldFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldFunction::StartsWith => "startswith",
            FieldFunction::EndsWith => "endswith",
            FieldFunction::Year => "year",
            FieldFunction::Month => "month",
            FieldFunction::Hour => "hour",
        }
    }
}

/// A leaf condition: `attribute operator values`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Field name
    pub attribute: String,
    /// Comparison operator
    pub operator: ConditionOperator,
    /// Literal operands; ignored by null checks
    pub values: Vec<ScalarValue>,
    /// Field functions; only the first one is ever evaluated
    pub field_functions: Vec<FieldFunction>,
}

impl Condition {
    /// Create a condition
    pub fn new(
        attribute: impl Into<String>,
        operator: ConditionOperator,
        values: Vec<ScalarValue>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            operator,
            values,
            field_functions: Vec::new(),
        }
    }

    /// Create an equality condition
    pub fn eq(attribute: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        Self::new(attribute, ConditionOperator::Equal, vec![value.into()])
    }

    /// Create a greater-than condition
    pub fn gt(attribute: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        Self::new(attribute, ConditionOperator::GreaterThan, vec![value.into()])
    }

    /// Create a less-than condition
    pub fn lt(attribute: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        Self::new(attribute, ConditionOperator::LessThan, vec![value.into()])
    }

    /// Create a null check
    pub fn is_null(attribute: impl Into<String>) -> Self {
        Self::new(attribute, ConditionOperator::IsNull, Vec::new())
    }

    /// Create a not-null check
    pub fn is_not_null(attribute: impl Into<String>) -> Self {
        Self::new(attribute, ConditionOperator::IsNotNull, Vec::new())
    }

    /// Create an "in list" condition
    pub fn in_list(attribute: impl Into<String>, values: Vec<ScalarValue>) -> Self {
        Self::new(attribute, ConditionOperator::InList, values)
    }

    /// Appends a field function
    pub fn with_field_function(mut self, function: FieldFunction) -> Self {
        self.field_functions.push(function);
        self
    }

    /// Returns the first literal, the comparison operand for every
    /// operator except `InList`
    pub fn compare_to(&self) -> Option<&ScalarValue> {
        self.values.first()
    }

    fn to_odata(&self) -> String {
        let attr = self.attribute.as_str();
        let first = self.values.first().map(literal).unwrap_or_else(|| "null".to_string());

        if let Some(function) = self.field_functions.first() {
            return match function {
                FieldFunction::StartsWith | FieldFunction::EndsWith => {
                    format!("{}({},{})", function.as_str(), attr, first)
                }
                _ => format!("{}({}) eq {}", function.as_str(), attr, first),
            };
        }

        match self.operator {
            ConditionOperator::Contains
            | ConditionOperator::BeginsWith
            | ConditionOperator::EndsWith => {
                format!("{}({},{})", self.operator.op_name(), attr, first)
            }
            ConditionOperator::IsNull => format!("{} eq null", attr),
            ConditionOperator::IsNotNull => format!("{} ne null", attr),
            ConditionOperator::InList => {
                let alternatives: Vec<_> = self
                    .values
                    .iter()
                    .map(|v| format!("{} eq {}", attr, literal(v)))
                    .collect();
                format!("({})", alternatives.join(" or "))
            }
            op => format!("{} {} {}", attr, op.op_name(), first),
        }
    }
}

/// A node of the predicate tree
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Boolean combination of child nodes
    Combinator {
        operator: LogicalOperator,
        children: Vec<Filter>,
    },
    /// Flat list of conditions joined by one operator
    Leaf {
        operator: LogicalOperator,
        conditions: Vec<Condition>,
    },
}

impl Default for Filter {
    fn default() -> Self {
        Filter::empty()
    }
}

impl Filter {
    /// The filter that matches every record
    pub fn empty() -> Self {
        Filter::Leaf {
            operator: LogicalOperator::And,
            conditions: Vec::new(),
        }
    }

    /// Single-condition leaf
    pub fn condition(condition: Condition) -> Self {
        Filter::Leaf {
            operator: LogicalOperator::And,
            conditions: vec![condition],
        }
    }

    /// Leaf over several conditions
    pub fn leaf(operator: LogicalOperator, conditions: Vec<Condition>) -> Self {
        Filter::Leaf {
            operator,
            conditions,
        }
    }

    /// AND combination of children
    pub fn and(children: Vec<Filter>) -> Self {
        Filter::Combinator {
            operator: LogicalOperator::And,
            children,
        }
    }

    /// OR combination of children
    pub fn or(children: Vec<Filter>) -> Self {
        Filter::Combinator {
            operator: LogicalOperator::Or,
            children,
        }
    }

    /// Returns true if this node has neither children nor conditions
    pub fn is_empty(&self) -> bool {
        match self {
            Filter::Combinator { children, .. } => children.is_empty(),
            Filter::Leaf { conditions, .. } => conditions.is_empty(),
        }
    }

    /// Total number of nodes in the tree
    pub fn node_count(&self) -> usize {
        match self {
            Filter::Combinator { children, .. } => {
                1 + children.iter().map(Filter::node_count).sum::<usize>()
            }
            Filter::Leaf { .. } => 1,
        }
    }

    /// Renders the tree back into OData `$filter` text.
    ///
    /// Returns `None` for the empty filter.
    pub fn to_odata(&self) -> Option<String> {
        let parts: Vec<String> = match self {
            Filter::Combinator { children, .. } => children
                .iter()
                .filter_map(|child| {
                    let text = child.to_odata()?;
                    Some(if child.is_compound() {
                        format!("({})", text)
                    } else {
                        text
                    })
                })
                .collect(),
            Filter::Leaf { conditions, .. } => conditions.iter().map(Condition::to_odata).collect(),
        };

        if parts.is_empty() {
            return None;
        }

        let operator = match self {
            Filter::Combinator { operator, .. } | Filter::Leaf { operator, .. } => operator,
        };
        Some(parts.join(&format!(" {} ", operator.as_str())))
    }

    fn is_compound(&self) -> bool {
        match self {
            Filter::Combinator { children, .. } => children.len() > 1,
            Filter::Leaf { conditions, .. } => conditions.len() > 1,
        }
    }
}

/// OData literal text for a value
fn literal(value: &ScalarValue) -> String {
    match value {
        ScalarValue::String(s) => format!("'{}'", s.replace('\'', "''")),
        ScalarValue::Decimal(d) => format!("{}m", d.normalize()),
        ScalarValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        ScalarValue::DateTime(dt) => dt.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
        other => other.to_string(),
    }
}
