//! A combinator library for parsing text spans and token lists, with a stack based
//! operator precedence parser for expressions.
//!
//! Parsers are pure functions from a [`Cursor`] to a [`ParseResult`]:
//! - [`TextSpan`] cursors parse characters ([`text`]).
//! - [`TokenList`] cursors parse the output of a [`Tokenizer`](tokens::tokenizer::Tokenizer) ([`tokens`]).
//!
//! The same combinators ([`core`], [`derived`], [`chain`]) work for both.
//! ```
//! use strata::{Parser, core::mapsuc, derived::many1, text::character};
//!
//! let number = mapsuc(many1(character::digit()), |ds: Vec<char>| {
//!     ds.into_iter().collect::<String>().parse::<u64>().unwrap_or_default()
//! });
//! assert_eq!(number.parse("42").unwrap(), 42);
//! assert_eq!(
//!     number.parse("x").unwrap_err().to_string(),
//!     "Syntax error (line 1, column 1): unexpected `x`, expected digit."
//! );
//! ```
#![warn(clippy::style)]
#![warn(clippy::perf)]
#![warn(clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

pub mod chain;
pub mod core;
pub mod derived;
pub mod friendly;
pub mod macros;
pub mod precedence;
pub mod text;
pub mod tokens;

mod cursor;
mod error;
mod position;
mod result;
mod span;
mod token;

pub use cursor::Cursor;
pub use error::{GrammarError, ParseError, TokenRole};
pub use position::Position;
pub use result::{Failure, ParseResult, Parsed};
pub use span::TextSpan;
pub use token::{Presentation, Token, TokenKind, TokenList};

use crate::core::BoxedParser;

/// The core trait for defining parsers, a pure mapping from an input [`Cursor`] to a [`ParseResult`].
/// - Parsers keep no state between runs, so can be shared and run concurrently.
/// - Any `Fn(C) -> ParseResult<C, T>` is a parser.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a parser over `{C}` so cannot be combined & used as one",
    label = "Not a `Parser`"
)]
pub trait Parser<C: Cursor> {
    type Output;

    /// Runs the parser on the input.
    fn run(&self, input: C) -> ParseResult<C, Self::Output>;

    /// Runs the parser, never erroring on bad input.
    fn try_parse(&self, input: impl Into<C>) -> ParseResult<C, Self::Output>
    where
        Self: Sized,
    {
        self.run(input.into())
    }

    /// Runs the parser, converting failures into a [`ParseError`].
    fn parse(&self, input: impl Into<C>) -> Result<Self::Output, ParseError>
    where
        Self: Sized,
    {
        self.run(input.into())
            .to_result()
            .map_err(ParseError::from)
    }

    /// Erases the type of the parser, for recursive grammars and tables of parsers.
    fn boxed(self) -> BoxedParser<C, Self::Output>
    where
        Self: Sized + Send + Sync + 'static,
    {
        BoxedParser::new(self)
    }
}

impl<C, T, F> Parser<C> for F
where
    C: Cursor,
    F: Fn(C) -> ParseResult<C, T>,
{
    type Output = T;

    fn run(&self, input: C) -> ParseResult<C, T> {
        self(input)
    }
}
