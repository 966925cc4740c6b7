//! Errors surfaced to users of the library.

use crate::{Cursor, Failure, Position};
use thiserror::Error;

/// A failure to parse an input, raised by [`Parser::parse`](crate::Parser::parse).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// The full message, e.g. `Syntax error (line 1, column 3): unexpected end of input.`
    pub message: String,
    pub position: Position,
}

impl<C: Cursor> From<Failure<C>> for ParseError {
    fn from(failure: Failure<C>) -> Self {
        Self {
            message: failure.to_string(),
            position: failure.error_position(),
        }
    }
}

/// Which part of a grammar a token is used by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenRole {
    Grouping,
    IfThenElse,
    Operator,
}

impl std::fmt::Display for TokenRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenRole::Grouping => write!(f, "a grouping"),
            TokenRole::IfThenElse => write!(f, "an if-then-else"),
            TokenRole::Operator => write!(f, "an operator"),
        }
    }
}

/// A mistake in the definition of a grammar, detected when it is constructed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("token {token} is used by {first} and by {second}")]
    OverlappingToken {
        token: String,
        first: TokenRole,
        second: TokenRole,
    },

    #[error("token {token} is defined as more than one {fixity} operator")]
    DuplicateOperator { token: String, fixity: &'static str },

    #[error("token {token} starts more than one grouping")]
    DuplicateGroupStart { token: String },

    #[error("token {token} is used more than once in if-then-else definitions")]
    DuplicateIfToken { token: String },
}
