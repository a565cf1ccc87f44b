//! Error types for report rule compilation

use std::fmt;
use thiserror::Error;

/// Main error type for scanning, assembling and loading rules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("Lexical error at offset {offset}: {message}")]
    Lexical { message: String, offset: usize },

    #[error("Unbalanced brackets: {0}")]
    Structural(BracketImbalance),

    #[error("Invalid condition: {0}")]
    Assembly(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Which side of a bracket pair is in excess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketImbalance {
    /// More `(` than `)`
    ExtraOpen,
    /// A `)` with no open `(` left to close
    ExtraClose,
}

impl fmt::Display for BracketImbalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketImbalance::ExtraOpen => f.write_str("extra ("),
            BracketImbalance::ExtraClose => f.write_str("extra )"),
        }
    }
}

impl RuleError {
    /// Short message without the category prefix, suitable for an
    /// "invalid rule" label
    pub fn message(&self) -> String {
        match self {
            RuleError::Lexical { message, .. } => message.clone(),
            RuleError::Structural(kind) => kind.to_string(),
            RuleError::Assembly(message) | RuleError::Deserialization(message) => message.clone(),
        }
    }
}

/// Result type alias for rule compilation
pub type Result<T> = std::result::Result<T, RuleError>;
