//! Tokens, their presentation, and the token cursor.

use crate::{friendly, Cursor, Position, TextSpan};
use derive_where::derive_where;
use std::{
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    sync::Arc,
};

/// How a kind of token is described in error messages.
/// - `description`: used when the kind is expected (e.g. `number`).
/// - `category`: prefixes the text of an unexpected token (e.g. `operator `+``).
/// - `example`: the literal text of kinds with only one spelling (e.g. `(`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Presentation {
    pub description: Option<&'static str>,
    pub category: Option<&'static str>,
    pub example: Option<&'static str>,
}

impl Presentation {
    pub const fn described(description: &'static str) -> Self {
        Self {
            description: Some(description),
            category: None,
            example: None,
        }
    }

    pub const fn example(example: &'static str) -> Self {
        Self {
            description: None,
            category: None,
            example: Some(example),
        }
    }

    #[must_use]
    pub const fn with_category(mut self, category: &'static str) -> Self {
        self.category = Some(category);
        self
    }
}

/// The kind of a token, normally a fieldless enum.
///
/// The presentation of each kind is given as a side table alongside the enum:
/// ```
/// # use strata::{Presentation, TokenKind};
/// #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// enum Tk { Number, Plus }
///
/// impl TokenKind for Tk {
///     fn presentation(&self) -> Presentation {
///         match self {
///             Tk::Number => Presentation::described("number"),
///             Tk::Plus => Presentation::example("+").with_category("operator"),
///         }
///     }
/// }
/// assert_eq!(Tk::Plus.expectation(), "`+`");
/// assert_eq!(Tk::Plus.appearance("+"), "operator `+`");
/// ```
pub trait TokenKind: Clone + PartialEq + Debug {
    fn presentation(&self) -> Presentation {
        Presentation::default()
    }

    /// The lowercase name of the kind.
    fn name(&self) -> String {
        format!("{self:?}").to_lowercase()
    }

    /// Describes the kind when it is expected.
    fn expectation(&self) -> String {
        let p = self.presentation();
        if let Some(d) = p.description {
            d.to_owned()
        } else if let Some(e) = p.example {
            friendly::str_literal(e)
        } else {
            self.name()
        }
    }

    /// Describes an occurrence of the kind with the given text.
    fn appearance(&self, text: &str) -> String {
        let clipped = friendly::str_literal(&friendly::clip(text, 12));
        let p = self.presentation();
        if let Some(c) = p.category {
            format!("{c} {clipped}")
        } else if p.example.is_some() {
            clipped
        } else {
            format!("{} {clipped}", self.name())
        }
    }
}

/// A recognised token, with the span of source it covers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token<K> {
    pub kind: K,
    pub span: TextSpan,
}

impl<K> Token<K> {
    pub fn new(kind: K, span: TextSpan) -> Self {
        Self { kind, span }
    }

    pub fn position(&self) -> Position {
        self.span.position()
    }

    pub fn text(&self) -> &str {
        self.span.as_str()
    }
}

impl<K: Debug> Display for Token<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}@{}: {}", self.kind, self.span.position(), self.span)
    }
}

/// The token cursor, an index into a shared list of tokens.
/// - `end` is the position reported once all tokens are consumed.
#[derive_where(Clone)]
pub struct TokenList<K> {
    tokens: Option<Arc<[Token<K>]>>,
    index: usize,
    end: Position,
}

impl<K> TokenList<K> {
    /// A list whose end position is just after its last token.
    pub fn new(tokens: Vec<Token<K>>) -> Self {
        let end = tokens
            .last()
            .map_or(Position::ZERO, |t| t.span.end_position());
        Self::with_end(tokens, end)
    }

    pub fn with_end(tokens: Vec<Token<K>>, end: Position) -> Self {
        Self {
            tokens: Some(Arc::from(tokens)),
            index: 0,
            end,
        }
    }

    /// The unconstructed token list.
    pub const fn none() -> Self {
        Self {
            tokens: None,
            index: 0,
            end: Position::ZERO,
        }
    }

    pub fn is_none(&self) -> bool {
        self.tokens.is_none()
    }

    /// # Panics
    /// When used on [`TokenList::none`].
    #[allow(clippy::panic)]
    #[track_caller]
    fn tokens(&self) -> &[Token<K>] {
        match &self.tokens {
            Some(t) => t,
            None => panic!("the token list has no value, it was not constructed over tokens"),
        }
    }

    /// The index of the next token.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The number of remaining tokens.
    #[track_caller]
    pub fn len(&self) -> usize {
        self.tokens().len() - self.index
    }

    #[track_caller]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn peek(&self) -> Option<&Token<K>> {
        self.tokens().get(self.index)
    }

    pub fn consume_token(&self) -> Option<(Token<K>, TokenList<K>)>
    where
        K: Clone,
    {
        let tk = self.peek()?.clone();
        Some((
            tk,
            TokenList {
                tokens: self.tokens.clone(),
                index: self.index + 1,
                end: self.end,
            },
        ))
    }

    /// The remaining tokens.
    pub fn remaining(&self) -> &[Token<K>] {
        &self.tokens()[self.index..]
    }

    fn source_id(&self) -> *const u8 {
        self.tokens
            .as_ref()
            .map_or(std::ptr::null(), |t| Arc::as_ptr(t).cast::<u8>())
    }
}

impl<K> Default for TokenList<K> {
    fn default() -> Self {
        Self::none()
    }
}

impl<K> From<Vec<Token<K>>> for TokenList<K> {
    fn from(tokens: Vec<Token<K>>) -> Self {
        TokenList::new(tokens)
    }
}

impl<K> PartialEq for TokenList<K> {
    fn eq(&self, other: &Self) -> bool {
        self.source_id() == other.source_id() && self.index == other.index
    }
}

impl<K> Eq for TokenList<K> {}

impl<K> Hash for TokenList<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source_id().hash(state);
        self.index.hash(state);
    }
}

impl<K: Debug> Debug for TokenList<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.tokens {
            None => write!(f, "TokenList(none)"),
            Some(t) => match t.get(self.index) {
                Some(next) => write!(f, "TokenList({}: {next})", self.index),
                None => write!(f, "TokenList({}: end)", self.index),
            },
        }
    }
}

impl<K: TokenKind> Cursor for TokenList<K> {
    type Item = Token<K>;

    fn consume_one(&self) -> Option<(Token<K>, TokenList<K>)> {
        self.consume_token()
    }

    fn is_at_end(&self) -> bool {
        self.is_empty()
    }

    fn offset(&self) -> usize {
        self.index
    }

    fn position(&self) -> Position {
        self.peek().map_or(self.end, Token::position)
    }

    fn describe_next(&self) -> Option<String> {
        self.peek().map(|t| t.kind.appearance(t.text()))
    }

    fn text_until(&self, next: &Self) -> String {
        match &self.tokens()[self.index..next.index] {
            [] => String::new(),
            [first, .., last] => {
                let start = first.position().absolute;
                let end = last.position().absolute + last.span.len();
                first.span.source()[start..end].to_owned()
            }
            [only] => only.text().to_owned(),
        }
    }
}
