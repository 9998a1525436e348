//! OData expression lexer
//!
//! Splits `$filter`/`$orderby` text into tokens. Bare words are classified
//! with anchored patterns in a fixed order: date-time, date, guid, time of
//! day, number, identifier. `true`, `false` and `null` are literals.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::value::ScalarValue;

use super::errors::{ODataError, ODataResult};

/// A lexical token
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Identifier(String),
    Literal(ScalarValue),
    OpenParen,
    CloseParen,
    Comma,
}

impl TokenKind {
    /// Source-like text for diagnostics
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Literal(ScalarValue::String(s)) => format!("'{}'", s),
            TokenKind::Literal(value) => value.to_string(),
            TokenKind::OpenParen => "(".to_string(),
            TokenKind::CloseParen => ")".to_string(),
            TokenKind::Comma => ",".to_string(),
        }
    }
}

/// A token with its byte offset in the input
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

struct Patterns {
    datetime: Regex,
    date: Regex,
    guid: Regex,
    time: Regex,
    number: Regex,
    identifier: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        datetime: Regex::new(
            r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:\d{2})$",
        )
        .expect("valid datetime pattern"),
        date: Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"),
        guid: Regex::new(
            r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
        )
        .expect("valid guid pattern"),
        time: Regex::new(r"^\d{2}:\d{2}(:\d{2}(\.\d+)?)?$").expect("valid time pattern"),
        number: Regex::new(r"^([+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?)([mMdDfF]?)$")
            .expect("valid number pattern"),
        identifier: Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier pattern"),
    })
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '+' | '-')
}

/// Tokenizes the text of one query option
pub fn tokenize(option: &'static str, input: &str) -> ODataResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(position, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' | ')' | ',' => {
                chars.next();
                let kind = match c {
                    '(' => TokenKind::OpenParen,
                    ')' => TokenKind::CloseParen,
                    _ => TokenKind::Comma,
                };
                tokens.push(Token { kind, position });
            }
            '\'' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some((_, ch)) = chars.next() {
                    if ch == '\'' {
                        if matches!(chars.peek(), Some((_, '\''))) {
                            chars.next();
                            text.push('\'');
                        } else {
                            closed = true;
                            break;
                        }
                    } else {
                        text.push(ch);
                    }
                }
                if !closed {
                    return Err(ODataError::UnterminatedString { option, position });
                }
                tokens.push(Token {
                    kind: TokenKind::Literal(ScalarValue::String(text)),
                    position,
                });
            }
            c if is_word_char(c) => {
                let mut end = position;
                while let Some(&(i, ch)) = chars.peek() {
                    if !is_word_char(ch) {
                        break;
                    }
                    end = i + ch.len_utf8();
                    chars.next();
                }
                let word = &input[position..end];
                let kind = classify_word(option, position, word)?;
                tokens.push(Token { kind, position });
            }
            ch => return Err(ODataError::UnexpectedChar { option, position, ch }),
        }
    }

    Ok(tokens)
}

fn classify_word(option: &'static str, position: usize, word: &str) -> ODataResult<TokenKind> {
    let p = patterns();
    let invalid = || ODataError::InvalidLiteral {
        option,
        position,
        text: word.to_string(),
    };

    match word {
        "true" => return Ok(TokenKind::Literal(ScalarValue::Boolean(true))),
        "false" => return Ok(TokenKind::Literal(ScalarValue::Boolean(false))),
        "null" => return Ok(TokenKind::Literal(ScalarValue::Null)),
        _ => {}
    }

    let value = if p.datetime.is_match(word) {
        DateTime::parse_from_rfc3339(&normalize_datetime(word))
            .map(|dt| ScalarValue::DateTime(dt.with_timezone(&Utc)))
            .map_err(|_| invalid())?
    } else if p.date.is_match(word) {
        NaiveDate::parse_from_str(word, "%Y-%m-%d")
            .map(ScalarValue::Date)
            .map_err(|_| invalid())?
    } else if p.guid.is_match(word) {
        Uuid::parse_str(word)
            .map(ScalarValue::Guid)
            .map_err(|_| invalid())?
    } else if p.time.is_match(word) {
        let format = if word.len() == 5 { "%H:%M" } else { "%H:%M:%S%.f" };
        NaiveTime::parse_from_str(word, format)
            .map(ScalarValue::Time)
            .map_err(|_| invalid())?
    } else if let Some(caps) = p.number.captures(word) {
        let digits = &caps[1];
        match &caps[5] {
            "m" | "M" => {
                let parsed = digits
                    .parse::<Decimal>()
                    .or_else(|_| Decimal::from_scientific(digits));
                parsed.map(ScalarValue::Decimal).map_err(|_| invalid())?
            }
            _ => digits
                .parse::<f64>()
                .map(ScalarValue::Number)
                .map_err(|_| invalid())?,
        }
    } else if p.identifier.is_match(word) {
        return Ok(TokenKind::Identifier(word.to_string()));
    } else {
        return Err(invalid());
    };

    Ok(TokenKind::Literal(value))
}

/// Adds missing seconds so `2024-01-01T10:00Z` parses as RFC 3339
fn normalize_datetime(word: &str) -> String {
    let (date, rest) = word.split_at(11);
    if rest.len() >= 5 && rest.as_bytes().get(5) != Some(&b':') {
        format!("{}{}:00{}", date, &rest[..5], &rest[5..])
    } else {
        word.to_string()
    }
}
