//! Error types for calc-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("No match: {0}")]
    NoMatch(String),

    #[error("Malformed expression: {0}")]
    MalformedExpression(String),

    #[error("Non-finite result: {0}")]
    NonFiniteResult(f64),

    #[error("Unrecognized unit pair: '{from}' to '{to}'")]
    UnrecognizedUnitPair { from: String, to: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, CalcError>;
