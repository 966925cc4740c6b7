//! The character cursor.

use crate::{friendly, Cursor, Position};
use std::{
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    sync::Arc,
};

/// A view of part of a source string, from a [`Position`] for `len` bytes.
/// - Cheap to clone, the source is shared.
/// - Equality is by source identity, position and length, not by content.
/// - [`TextSpan::none`] is a span over nothing, any access to its contents panics.
#[derive(Clone)]
pub struct TextSpan {
    source: Option<Arc<str>>,
    position: Position,
    length: usize,
}

impl TextSpan {
    /// A span covering all of `source`.
    pub fn new(source: &str) -> Self {
        Self::from_source(Arc::from(source))
    }

    pub fn from_source(source: Arc<str>) -> Self {
        let length = source.len();
        Self {
            source: Some(source),
            position: Position::ZERO,
            length,
        }
    }

    /// A span over `length` bytes of `source` starting at `position`.
    ///
    /// # Panics
    /// When the range does not lie on character boundaries within `source`.
    #[allow(clippy::panic)]
    pub fn with_range(source: Arc<str>, position: Position, length: usize) -> Self {
        let end = position.absolute + length;
        if end > source.len()
            || !source.is_char_boundary(position.absolute)
            || !source.is_char_boundary(end)
        {
            panic!(
                "span {}..{end} is not within the {} bytes of its source",
                position.absolute,
                source.len()
            );
        }
        Self {
            source: Some(source),
            position,
            length,
        }
    }

    /// The unconstructed span.
    pub const fn none() -> Self {
        Self {
            source: None,
            position: Position::ZERO,
            length: 0,
        }
    }

    pub fn is_none(&self) -> bool {
        self.source.is_none()
    }

    /// # Panics
    /// When used on [`TextSpan::none`].
    #[allow(clippy::panic)]
    #[track_caller]
    pub fn source(&self) -> &Arc<str> {
        match &self.source {
            Some(s) => s,
            None => panic!("the span has no value, it was not constructed over a source"),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// The remaining length in bytes.
    #[track_caller]
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    #[track_caller]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[track_caller]
    pub fn is_at_end(&self) -> bool {
        self.is_empty()
    }

    #[track_caller]
    pub fn as_str(&self) -> &str {
        let start = self.position.absolute;
        &self.source()[start..start + self.length]
    }

    /// Takes the next character.
    #[track_caller]
    pub fn consume_char(&self) -> Option<(char, TextSpan)> {
        let ch = self.as_str().chars().next()?;
        Some((
            ch,
            TextSpan {
                source: self.source.clone(),
                position: self.position.advance(ch),
                length: self.length - ch.len_utf8(),
            },
        ))
    }

    /// The part of this span before `next`, which must be a later span over the same source.
    ///
    /// # Panics
    /// When `next` views a different source or starts before this span.
    #[allow(clippy::panic)]
    #[track_caller]
    pub fn until(&self, next: &TextSpan) -> TextSpan {
        if !Arc::ptr_eq(self.source(), next.source()) {
            panic!("`until` requires both spans to view the same source");
        }
        if next.position.absolute < self.position.absolute
            || next.position.absolute > self.position.absolute + self.length
        {
            panic!(
                "`until` target {} is outside of span {}..{}",
                next.position.absolute,
                self.position.absolute,
                self.position.absolute + self.length
            );
        }
        TextSpan {
            source: self.source.clone(),
            position: self.position,
            length: next.position.absolute - self.position.absolute,
        }
    }

    /// The first `chars` characters of this span (or all of it if shorter).
    /// - Counting characters walks the span, so this is linear in `chars`.
    /// - Use [`TextSpan::first_bytes`] when the byte length is already known.
    #[track_caller]
    pub fn first(&self, chars: usize) -> TextSpan {
        let length = self
            .as_str()
            .char_indices()
            .nth(chars)
            .map_or(self.length, |(i, _)| i);
        TextSpan {
            source: self.source.clone(),
            position: self.position,
            length,
        }
    }

    /// The first `bytes` bytes of this span, in constant time.
    ///
    /// # Panics
    /// When `bytes` is past the end of the span or not on a character boundary.
    #[allow(clippy::panic)]
    #[track_caller]
    pub fn first_bytes(&self, bytes: usize) -> TextSpan {
        if !self.as_str().is_char_boundary(bytes) {
            panic!("byte length {bytes} is not a character boundary of a {} byte span", self.length);
        }
        TextSpan {
            source: self.source.clone(),
            position: self.position,
            length: bytes,
        }
    }

    /// This span without its first `chars` characters (empty if shorter).
    #[track_caller]
    pub fn skip(&self, chars: usize) -> TextSpan {
        let mut position = self.position;
        let mut length = self.length;
        for ch in self.as_str().chars().take(chars) {
            position = position.advance(ch);
            length -= ch.len_utf8();
        }
        TextSpan {
            source: self.source.clone(),
            position,
            length,
        }
    }

    /// The character at `index` characters into the span.
    #[track_caller]
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.as_str().chars().nth(index)
    }

    /// The (empty) span at the end of this span.
    #[track_caller]
    pub fn end(&self) -> TextSpan {
        let position = self.as_str().chars().fold(self.position, Position::advance);
        TextSpan {
            source: self.source.clone(),
            position,
            length: 0,
        }
    }

    /// The position just after the last character of this span.
    #[track_caller]
    pub fn end_position(&self) -> Position {
        self.end().position
    }

    #[track_caller]
    pub fn equals_value(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl Default for TextSpan {
    fn default() -> Self {
        Self::none()
    }
}

impl From<&str> for TextSpan {
    fn from(source: &str) -> Self {
        TextSpan::new(source)
    }
}

impl From<String> for TextSpan {
    fn from(source: String) -> Self {
        TextSpan::from_source(Arc::from(source))
    }
}

fn source_id(source: &Option<Arc<str>>) -> *const u8 {
    source
        .as_ref()
        .map_or(std::ptr::null(), |s| Arc::as_ptr(s).cast::<u8>())
}

impl PartialEq for TextSpan {
    fn eq(&self, other: &Self) -> bool {
        source_id(&self.source) == source_id(&other.source)
            && self.position.absolute == other.position.absolute
            && self.length == other.length
    }
}

impl Eq for TextSpan {}

impl Hash for TextSpan {
    fn hash<H: Hasher>(&self, state: &mut H) {
        source_id(&self.source).hash(state);
        self.position.absolute.hash(state);
        self.length.hash(state);
    }
}

impl Debug for TextSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "TextSpan(none)")
        } else {
            write!(
                f,
                "TextSpan({}@{}: {:?})",
                self.position.absolute,
                self.position,
                friendly::clip(self.as_str(), 20)
            )
        }
    }
}

impl Display for TextSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Cursor for TextSpan {
    type Item = char;

    fn consume_one(&self) -> Option<(char, TextSpan)> {
        self.consume_char()
    }

    fn is_at_end(&self) -> bool {
        self.is_empty()
    }

    fn offset(&self) -> usize {
        self.position.absolute
    }

    fn position(&self) -> Position {
        self.position
    }

    fn describe_next(&self) -> Option<String> {
        self.consume_char().map(|(ch, _)| friendly::char_literal(ch))
    }

    fn text_until(&self, next: &Self) -> String {
        self.until(next).as_str().to_owned()
    }
}
