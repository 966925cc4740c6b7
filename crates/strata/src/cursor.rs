//! The capabilities combinators need from an input, shared by [`TextSpan`](crate::TextSpan)
//! and [`TokenList`](crate::TokenList).

use crate::Position;
use std::fmt::Debug;

/// An immutable view of the remaining input.
/// - Every operation returns a new cursor, the original is untouched.
/// - Two cursors are equal only when they view the same source (by identity) at the same place.
pub trait Cursor: Clone + PartialEq + Debug {
    type Item;

    /// Takes the next item, or [`None`] at the end of the input.
    fn consume_one(&self) -> Option<(Self::Item, Self)>;

    fn is_at_end(&self) -> bool;

    /// The absolute offset used to decide which of two failures advanced further.
    fn offset(&self) -> usize;

    /// The source position reported in error messages.
    fn position(&self) -> Position;

    /// Describes the next item for an `unexpected ...` message, [`None`] at the end of the input.
    fn describe_next(&self) -> Option<String>;

    /// The source text between this cursor and a later cursor over the same source.
    fn text_until(&self, next: &Self) -> String;
}
