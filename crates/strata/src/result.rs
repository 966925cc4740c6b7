//! The outcome of running a [`Parser`](crate::Parser).

use crate::{friendly, Cursor, Position};
use std::fmt::{Display, Formatter};

/// A successful parse.
/// - `location` is the input the parser was given.
/// - `remainder` is the input left after the parse.
#[derive(Clone, Debug, PartialEq)]
pub struct Parsed<C, T> {
    pub value: T,
    pub location: C,
    pub remainder: C,
}

/// A failed parse.
/// - `remainder` is where the failure occurred, if this differs from the input the parser was given
///   then the failure is partial (some input was consumed before failing).
/// - `error_position` locates failures inside a single item (e.g. within the text of a token).
/// - `backtrack` marks failures that may be discarded by alternation even if partial.
#[derive(Clone, Debug, PartialEq)]
pub struct Failure<C> {
    pub remainder: C,
    pub error_position: Option<Position>,
    pub message: Option<String>,
    pub expectations: Option<Vec<String>>,
    pub backtrack: bool,
}

/// The result of running a [`Parser`](crate::Parser)
#[derive(Clone, Debug, PartialEq)]
pub enum ParseResult<C, T> {
    Suc(Parsed<C, T>),
    Err(Failure<C>),
}

impl<C: Cursor> Failure<C> {
    /// A failure with no further detail than where it occurred.
    pub fn empty(remainder: C) -> Self {
        Self {
            remainder,
            error_position: None,
            message: None,
            expectations: None,
            backtrack: false,
        }
    }

    pub fn expected(remainder: C, expectations: Vec<String>) -> Self {
        Self {
            expectations: Some(expectations),
            ..Self::empty(remainder)
        }
    }

    pub fn message(remainder: C, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::empty(remainder)
        }
    }

    /// Checks if this failure consumed input from `from`, or failed within an item.
    pub fn is_partial(&self, from: &C) -> bool {
        self.remainder != *from || self.error_position.is_some()
    }

    /// Checks if alternation must propagate this failure rather than try another branch.
    pub fn is_committed(&self, from: &C) -> bool {
        !self.backtrack && self.is_partial(from)
    }

    /// Merges the failures of two alternatives.
    /// - At the same remainder, the expectations of both are kept (first, then second).
    /// - Otherwise the failure that advanced furthest is kept, ties going to the first.
    pub fn combine_empty(first: Self, second: Self) -> Self {
        if first.remainder == second.remainder {
            let expectations = match (first.expectations, second.expectations) {
                (Some(mut a), Some(b)) => {
                    a.extend(b);
                    Some(a)
                }
                (a, b) => a.or(b),
            };
            Self {
                remainder: second.remainder,
                error_position: second.error_position,
                message: second.message.or(first.message),
                expectations,
                backtrack: second.backtrack,
            }
        } else if second.remainder.offset() > first.remainder.offset() {
            second
        } else {
            first
        }
    }

    /// The position reported for this failure.
    pub fn error_position(&self) -> Position {
        self.error_position
            .unwrap_or_else(|| self.remainder.position())
    }

    /// The message describing the failure, without its position.
    /// ```text
    /// unexpected `x`, expected `a`, `b` or digit
    /// ```
    pub fn fragment(&self) -> String {
        if let Some(m) = &self.message {
            return m.clone();
        }
        let mut msg = match self.remainder.describe_next() {
            Some(next) => format!("unexpected {next}"),
            None => String::from("unexpected end of input"),
        };
        if let Some(expected) = self.expectations.as_ref().and_then(friendly::list) {
            msg.push_str(", expected ");
            msg.push_str(&expected);
        }
        msg
    }
}

impl<C: Cursor> Display for Failure<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let p = self.error_position();
        write!(
            f,
            "Syntax error (line {}, column {}): {}.",
            p.line,
            p.column,
            self.fragment()
        )
    }
}

impl<C, T> ParseResult<C, T> {
    pub fn value(value: T, location: C, remainder: C) -> Self {
        ParseResult::Suc(Parsed {
            value,
            location,
            remainder,
        })
    }

    pub fn has_value(&self) -> bool {
        matches!(self, ParseResult::Suc(_))
    }

    pub fn remainder(&self) -> &C {
        match self {
            ParseResult::Suc(p) => &p.remainder,
            ParseResult::Err(f) => &f.remainder,
        }
    }

    /// Converts into a regular rust [`Result`]
    pub fn to_result(self) -> Result<T, Failure<C>> {
        match self {
            ParseResult::Suc(p) => Ok(p.value),
            ParseResult::Err(f) => Err(f),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseResult<C, U> {
        match self {
            ParseResult::Suc(Parsed {
                value,
                location,
                remainder,
            }) => ParseResult::Suc(Parsed {
                value: f(value),
                location,
                remainder,
            }),
            ParseResult::Err(e) => ParseResult::Err(e),
        }
    }
}
