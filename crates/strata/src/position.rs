//! Locations within a source.

use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
    hash::{Hash, Hasher},
};

/// A location in a source, as an absolute (byte) offset plus the 1-based line and column.
/// - Columns count characters, not bytes.
/// - Equality and ordering only consider the absolute offset.
#[derive(Clone, Copy, Debug)]
pub struct Position {
    pub absolute: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// The start of every source.
    pub const ZERO: Position = Position {
        absolute: 0,
        line: 1,
        column: 1,
    };

    pub fn new(absolute: usize, line: usize, column: usize) -> Self {
        Self {
            absolute,
            line,
            column,
        }
    }

    /// The position immediately after `ch`, which must be the character at this position.
    /// ```
    /// # use strata::Position;
    /// let next = Position::ZERO.advance('\n');
    /// assert_eq!((next.absolute, next.line, next.column), (1, 2, 1));
    /// ```
    #[must_use]
    pub fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Self {
                absolute: self.absolute + ch.len_utf8(),
                line: self.line + 1,
                column: 1,
            }
        } else {
            Self {
                absolute: self.absolute + ch.len_utf8(),
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.absolute == other.absolute
    }
}

impl Eq for Position {}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.absolute.cmp(&other.absolute)
    }
}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.absolute.hash(state);
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}
