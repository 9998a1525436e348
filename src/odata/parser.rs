//! # OData Query Option Parser
//!
//! Recursive-descent parser for `$filter` and `$orderby`, binding
//! identifiers against an [`EdmModel`].
//!
//! Grammar:
//! ```text
//! filter  := or
//! or      := and ("or" and)*
//! and     := unary ("and" unary)*
//! unary   := "not" unary | compare
//! compare := primary (cmp primary)?
//! primary := "(" filter ")" | ident "(" args ")" | ident | literal
//! orderby := item ("," item)*
//! item    := filter ("asc" | "desc")?
//! ```

use std::collections::HashMap;

use crate::value::ScalarValue;

use super::ast::{BinaryOperatorKind, FilterClause, OrderByClause, OrderByDirection, QueryNode};
use super::errors::{ODataError, ODataResult};
use super::lexer::{tokenize, Token, TokenKind};
use super::model::EdmModel;

const FILTER_OPTION: &str = "$filter";
const ORDERBY_OPTION: &str = "$orderby";

const KEYWORDS: &[&str] = &[
    "and", "or", "not", "eq", "ne", "gt", "ge", "lt", "le", "asc", "desc",
];

const FUNCTIONS: &[&str] = &[
    "contains",
    "startswith",
    "endswith",
    "tolower",
    "toupper",
    "trim",
    "length",
    "indexof",
    "substring",
    "concat",
    "year",
    "month",
    "day",
    "hour",
    "minute",
    "second",
];

/// Parses the query options of one request against a model
pub struct ODataQueryOptionParser<'a> {
    model: &'a EdmModel,
    options: &'a HashMap<String, String>,
}

impl<'a> ODataQueryOptionParser<'a> {
    pub fn new(model: &'a EdmModel, options: &'a HashMap<String, String>) -> Self {
        Self { model, options }
    }

    /// Parses `$filter`; `None` when the option is absent or blank
    pub fn parse_filter(&self) -> ODataResult<Option<FilterClause>> {
        let Some(text) = self.option_text(FILTER_OPTION) else {
            return Ok(None);
        };

        let mut cursor = Cursor::new(FILTER_OPTION, self.model, tokenize(FILTER_OPTION, text)?);
        let expression = cursor.parse_or()?;
        cursor.expect_end()?;
        Ok(Some(FilterClause { expression }))
    }

    /// Parses `$orderby`; `None` when the option is absent or blank
    pub fn parse_order_by(&self) -> ODataResult<Option<OrderByClause>> {
        let Some(text) = self.option_text(ORDERBY_OPTION) else {
            return Ok(None);
        };

        let mut cursor = Cursor::new(ORDERBY_OPTION, self.model, tokenize(ORDERBY_OPTION, text)?);
        let mut items = vec![cursor.parse_order_item()?];
        while cursor.eat(&TokenKind::Comma) {
            items.push(cursor.parse_order_item()?);
        }
        cursor.expect_end()?;

        let clause = items
            .into_iter()
            .rev()
            .fold(None, |then_by, (expression, direction)| {
                Some(OrderByClause {
                    expression,
                    direction,
                    then_by: then_by.map(Box::new),
                })
            });
        Ok(clause)
    }

    fn option_text(&self, option: &str) -> Option<&'a str> {
        self.options
            .get(option)
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }
}

struct Cursor<'m> {
    option: &'static str,
    model: &'m EdmModel,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'m> Cursor<'m> {
    fn new(option: &'static str, model: &'m EdmModel, tokens: Vec<Token>) -> Self {
        Self {
            option,
            model,
            tokens,
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self, expected: &'static str) -> ODataResult<Token> {
        let token = self.tokens.get(self.pos).cloned().ok_or(ODataError::UnexpectedEnd {
            option: self.option,
            expected,
        })?;
        self.pos += 1;
        Ok(token)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().map(|t| &t.kind) == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Identifier(word),
                ..
            }) if word == keyword => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn unexpected(&self, token: &Token, expected: &'static str) -> ODataError {
        ODataError::UnexpectedToken {
            option: self.option,
            position: token.position,
            found: token.kind.describe(),
            expected,
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> ODataResult<()> {
        let token = self.next(expected)?;
        if token.kind == kind {
            Ok(())
        } else {
            Err(self.unexpected(&token, expected))
        }
    }

    fn expect_end(&self) -> ODataResult<()> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(self.unexpected(token, "end of expression")),
        }
    }

    fn parse_or(&mut self) -> ODataResult<QueryNode> {
        let mut left = self.parse_and()?;
        while self.eat_keyword("or") {
            let right = self.parse_and()?;
            left = QueryNode::binary(BinaryOperatorKind::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ODataResult<QueryNode> {
        let mut left = self.parse_unary()?;
        while self.eat_keyword("and") {
            let right = self.parse_unary()?;
            left = QueryNode::binary(BinaryOperatorKind::And, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ODataResult<QueryNode> {
        if self.eat_keyword("not") {
            return Ok(QueryNode::not(self.parse_unary()?));
        }
        self.parse_compare()
    }

    fn parse_compare(&mut self) -> ODataResult<QueryNode> {
        let left = self.parse_primary()?;

        let operator = match self.peek() {
            Some(Token {
                kind: TokenKind::Identifier(word),
                ..
            }) => BinaryOperatorKind::from_keyword(word),
            _ => None,
        };
        let Some(operator) = operator else {
            return Ok(left);
        };
        self.pos += 1;

        let right = self.parse_primary()?;
        let (left, right) = convert_null_operand(left, right);
        Ok(QueryNode::binary(operator, left, right))
    }

    fn parse_primary(&mut self) -> ODataResult<QueryNode> {
        let token = self.next("an expression")?;
        match token.kind {
            TokenKind::OpenParen => {
                let inner = self.parse_or()?;
                self.expect(TokenKind::CloseParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Literal(value) => Ok(QueryNode::Constant(value)),
            TokenKind::Identifier(ref name) if KEYWORDS.contains(&name.as_str()) => {
                Err(self.unexpected(&token, "an expression"))
            }
            TokenKind::Identifier(name) => {
                if self.eat(&TokenKind::OpenParen) {
                    if !FUNCTIONS.contains(&name.as_str()) {
                        return Err(ODataError::UnexpectedToken {
                            option: self.option,
                            position: token.position,
                            found: name,
                            expected: "a known function",
                        });
                    }
                    let arguments = self.parse_arguments()?;
                    return Ok(QueryNode::call(name, arguments));
                }
                let kind = self
                    .model
                    .property(&name)
                    .ok_or_else(|| ODataError::UnknownField(name.clone()))?;
                Ok(QueryNode::property(name, kind))
            }
            _ => Err(self.unexpected(&token, "an expression")),
        }
    }

    fn parse_arguments(&mut self) -> ODataResult<Vec<QueryNode>> {
        let mut arguments = Vec::new();
        if self.eat(&TokenKind::CloseParen) {
            return Ok(arguments);
        }
        loop {
            arguments.push(self.parse_or()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::CloseParen, "',' or ')'")?;
            return Ok(arguments);
        }
    }

    fn parse_order_item(&mut self) -> ODataResult<(QueryNode, OrderByDirection)> {
        let expression = self.parse_or()?;
        let direction = if self.eat_keyword("desc") {
            OrderByDirection::Descending
        } else {
            self.eat_keyword("asc");
            OrderByDirection::Ascending
        };
        Ok((expression, direction))
    }
}

/// Wraps an untyped `null` compared with a property in a conversion to the
/// property's kind
fn convert_null_operand(left: QueryNode, right: QueryNode) -> (QueryNode, QueryNode) {
    let is_null = |node: &QueryNode| matches!(node, QueryNode::Constant(ScalarValue::Null));
    match (&left, &right) {
        (QueryNode::PropertyAccess { kind, .. }, r) if is_null(r) => {
            let target = *kind;
            (left, QueryNode::converted_null(target))
        }
        (l, QueryNode::PropertyAccess { kind, .. }) if is_null(l) => {
            let target = *kind;
            (QueryNode::converted_null(target), right)
        }
        _ => (left, right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odata::model::EdmPrimitiveKind;
    use crate::value::{FieldKind, RecordSchema};

    fn model() -> EdmModel {
        EdmModel::from_schema(
            &RecordSchema::new()
                .with_field("n", FieldKind::Number)
                .with_field("s", FieldKind::String),
        )
    }

    fn options(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn filter(text: &str) -> ODataResult<QueryNode> {
        let model = model();
        let opts = options(&[("$filter", text)]);
        ODataQueryOptionParser::new(&model, &opts)
            .parse_filter()
            .map(|clause| clause.unwrap().expression)
    }

    #[test]
    fn test_comparison() {
        assert_eq!(
            filter("n gt 10").unwrap(),
            QueryNode::binary(
                BinaryOperatorKind::GreaterThan,
                QueryNode::property("n", EdmPrimitiveKind::Numeric),
                QueryNode::constant(10),
            )
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let node = filter("n eq 1 or n eq 2 and s eq 'x'").unwrap();
        match node {
            QueryNode::BinaryOperator { operator, right, .. } => {
                assert_eq!(operator, BinaryOperatorKind::Or);
                assert!(matches!(
                    *right,
                    QueryNode::BinaryOperator {
                        operator: BinaryOperatorKind::And,
                        ..
                    }
                ));
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_null_is_converted() {
        let node = filter("s eq null").unwrap();
        match node {
            QueryNode::BinaryOperator { right, .. } => {
                assert!(right.is_converted_null());
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_function_call_and_not() {
        let node = filter("not contains(s,'abc')").unwrap();
        assert_eq!(
            node,
            QueryNode::not(QueryNode::call(
                "contains",
                vec![
                    QueryNode::property("s", EdmPrimitiveKind::String),
                    QueryNode::constant("abc"),
                ],
            ))
        );
    }

    #[test]
    fn test_unknown_field() {
        assert_eq!(
            filter("missing eq 1"),
            Err(ODataError::UnknownField("missing".to_string()))
        );
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(filter("n gt"), Err(ODataError::UnexpectedEnd { .. })));
        assert!(matches!(
            filter("n gt 1 1"),
            Err(ODataError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            filter("(n gt 1"),
            Err(ODataError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            filter("and eq 1"),
            Err(ODataError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            filter("frobnicate(n)"),
            Err(ODataError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_blank_filter_is_absent() {
        let model = model();
        let opts = options(&[("$filter", "  ")]);
        assert_eq!(ODataQueryOptionParser::new(&model, &opts).parse_filter(), Ok(None));
    }

    #[test]
    fn test_order_by_chain() {
        let model = model();
        let opts = options(&[("$orderby", "n desc, s")]);
        let clause = ODataQueryOptionParser::new(&model, &opts)
            .parse_order_by()
            .unwrap()
            .unwrap();

        assert_eq!(clause.len(), 2);
        assert_eq!(clause.direction, OrderByDirection::Descending);
        assert_eq!(clause.expression.as_property(), Some("n"));
        let next = clause.then_by.unwrap();
        assert_eq!(next.direction, OrderByDirection::Ascending);
        assert_eq!(next.expression.as_property(), Some("s"));
    }
}
