//! Condition parts produced by the scanner

use std::cmp::Ordering;
use std::fmt;

use crate::condition::ast::ConditionTree;
use crate::error::Result;

/// A single scanned unit of a condition
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionPart {
    OpenBracket,
    CloseBracket,
    /// Identifier referencing a schema field
    FieldName(String),
    /// Comparison operator
    Sign(Sign),
    /// Boolean operator joining two terms
    BooleanSign(BooleanSign),
    /// Literal compared against the field
    Value(Value),
    /// Scanning finished cleanly
    EndOfInput,
    /// Scanning failed; carries a description of the offending fragment
    Error(String),
}

impl ConditionPart {
    /// True for the two parts that end a scan
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConditionPart::EndOfInput | ConditionPart::Error(_))
    }
}

impl fmt::Display for ConditionPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionPart::OpenBracket => f.write_str("("),
            ConditionPart::CloseBracket => f.write_str(")"),
            ConditionPart::FieldName(name) => f.write_str(name),
            ConditionPart::Sign(sign) => f.write_str(sign.as_str()),
            ConditionPart::BooleanSign(op) => f.write_str(op.as_str()),
            ConditionPart::Value(value) => write!(f, "{}", value),
            ConditionPart::EndOfInput => f.write_str("end of input"),
            ConditionPart::Error(message) => f.write_str(message),
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    /// `=`
    Equal,
    /// `==`, same meaning as `=`
    DoubleEqual,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
}

impl Sign {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(Sign::Equal),
            "==" => Some(Sign::DoubleEqual),
            "!=" => Some(Sign::NotEqual),
            "<" => Some(Sign::Less),
            ">" => Some(Sign::Greater),
            "<=" => Some(Sign::LessEqual),
            ">=" => Some(Sign::GreaterEqual),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sign::Equal => "=",
            Sign::DoubleEqual => "==",
            Sign::NotEqual => "!=",
            Sign::Less => "<",
            Sign::Greater => ">",
            Sign::LessEqual => "<=",
            Sign::GreaterEqual => ">=",
        }
    }

    /// Whether `actual <sign> expected` holds, given `actual.cmp(expected)`
    #[inline]
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Sign::Equal | Sign::DoubleEqual => ordering == Ordering::Equal,
            Sign::NotEqual => ordering != Ordering::Equal,
            Sign::Less => ordering == Ordering::Less,
            Sign::Greater => ordering == Ordering::Greater,
            Sign::LessEqual => ordering != Ordering::Greater,
            Sign::GreaterEqual => ordering != Ordering::Less,
        }
    }

    pub fn is_equality(self) -> bool {
        matches!(self, Sign::Equal | Sign::DoubleEqual)
    }
}

/// Boolean operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanSign {
    And,
    Or,
}

impl BooleanSign {
    /// Accepts `&&`, `||` and the words `and` / `or` in any case
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "&&" => Some(BooleanSign::And),
            "||" => Some(BooleanSign::Or),
            word => Self::from_word(word),
        }
    }

    pub fn from_word(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("and") {
            Some(BooleanSign::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(BooleanSign::Or)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BooleanSign::And => "and",
            BooleanSign::Or => "or",
        }
    }
}

/// Literal value of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Value {
    text: String,
    quoted: bool,
}

impl Value {
    pub fn new(text: impl Into<String>, quoted: bool) -> Self {
        Self {
            text: text.into(),
            quoted,
        }
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    pub fn unquoted(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Integer interpretation, used to address items of combo and check fields
    pub fn as_index(&self) -> Option<i64> {
        self.text.trim().parse().ok()
    }

    /// Finite numeric interpretation; `nan` and `inf` stay words
    pub fn as_number(&self) -> Option<f64> {
        parse_finite(&self.text)
    }
}

pub(crate) fn parse_finite(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "\"{}\"", self.text)
        } else {
            f.write_str(&self.text)
        }
    }
}

/// Flat sequence of parts as emitted by a successful scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    parts: Vec<ConditionPart>,
}

impl Condition {
    pub fn new(parts: Vec<ConditionPart>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[ConditionPart] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<ConditionPart> {
        self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Fold the flat parts into a tree
    pub fn simplify(&self) -> Result<ConditionTree> {
        crate::condition::builder::simplify(self)
    }
}

impl From<Vec<ConditionPart>> for Condition {
    fn from(parts: Vec<ConditionPart>) -> Self {
        Self::new(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_symbols() {
        for symbol in ["=", "==", "!=", "<", ">", "<=", ">="] {
            let sign = Sign::from_symbol(symbol).unwrap();
            assert_eq!(sign.as_str(), symbol);
        }
        assert_eq!(Sign::from_symbol("!"), None);
        assert_eq!(Sign::from_symbol("=<"), None);
    }

    #[test]
    fn test_sign_holds() {
        assert!(Sign::LessEqual.holds(Ordering::Equal));
        assert!(Sign::LessEqual.holds(Ordering::Less));
        assert!(!Sign::LessEqual.holds(Ordering::Greater));
        assert!(Sign::NotEqual.holds(Ordering::Greater));
        assert!(Sign::DoubleEqual.holds(Ordering::Equal));
        assert!(!Sign::Greater.holds(Ordering::Equal));
    }

    #[test]
    fn test_boolean_spellings() {
        for symbol in ["&&", "and", "AND", "aNd"] {
            assert_eq!(BooleanSign::from_symbol(symbol), Some(BooleanSign::And));
        }
        for symbol in ["||", "or", "OR", "Or"] {
            assert_eq!(BooleanSign::from_symbol(symbol), Some(BooleanSign::Or));
        }
        assert_eq!(BooleanSign::from_symbol("&|"), None);
        assert_eq!(BooleanSign::from_word("andy"), None);
    }

    #[test]
    fn test_value_interpretations() {
        let value = Value::quoted("12");
        assert_eq!(value.as_index(), Some(12));
        assert_eq!(value.to_string(), "\"12\"");

        let value = Value::unquoted("1.5");
        assert_eq!(value.as_index(), None);
        assert_eq!(value.as_number(), Some(1.5));
        assert_eq!(value.to_string(), "1.5");

        for word in ["nan", "inf", "Infinity", "-inf"] {
            assert_eq!(Value::unquoted(word).as_number(), None);
        }
    }
}
