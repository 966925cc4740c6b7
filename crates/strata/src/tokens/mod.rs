//! Parsers over [`TokenList`]s, and the [`Tokenizer`](tokenizer::Tokenizer) contract producing them.
//! - Token parsers produce the [`Token`] consumed, use [`apply`] to interpret its text.
//! - Expectations use [`TokenKind::expectation`], so messages read in terms of the grammar
//!   (e.g. `expected number or `(``).

use crate::{friendly, Failure, ParseResult, Parser, TextSpan, Token, TokenKind, TokenList};
use derive_where::derive_where;
use std::{
    fmt::{Debug, Formatter},
    marker::PhantomData,
    sync::Arc,
};

pub mod tokenizer;

/// Matches a single token of the given kind.
#[derive(Clone, Debug)]
pub struct Kind<K> {
    kind: K,
}
pub fn eq<K: TokenKind>(kind: K) -> Kind<K> {
    Kind { kind }
}

impl<K: TokenKind> Parser<TokenList<K>> for Kind<K> {
    type Output = Token<K>;

    #[inline]
    fn run(&self, input: TokenList<K>) -> ParseResult<TokenList<K>, Token<K>> {
        match input.consume_token() {
            Some((token, remainder)) if token.kind == self.kind => {
                ParseResult::value(token, input, remainder)
            }
            _ => ParseResult::Err(Failure::expected(input, vec![self.kind.expectation()])),
        }
    }
}

/// Matches a single token of the given kind and text.
#[derive(Clone, Debug)]
pub struct KindValue<K> {
    kind: K,
    text: String,
}
pub fn eq_value<K: TokenKind>(kind: K, text: &str) -> KindValue<K> {
    KindValue {
        kind,
        text: text.to_owned(),
    }
}

impl<K: TokenKind> Parser<TokenList<K>> for KindValue<K> {
    type Output = Token<K>;

    fn run(&self, input: TokenList<K>) -> ParseResult<TokenList<K>, Token<K>> {
        match input.consume_token() {
            Some((token, remainder)) if token.kind == self.kind && token.span.equals_value(&self.text) => {
                ParseResult::value(token, input, remainder)
            }
            _ => ParseResult::Err(Failure::expected(
                input,
                vec![friendly::str_literal(&self.text)],
            )),
        }
    }
}

/// Matches any single token.
#[derive_where(Clone, Debug, Default)]
pub struct Any<K>(PhantomData<K>);
pub fn any<K: TokenKind>() -> Any<K> {
    Any(PhantomData)
}

impl<K: TokenKind> Parser<TokenList<K>> for Any<K> {
    type Output = Token<K>;

    fn run(&self, input: TokenList<K>) -> ParseResult<TokenList<K>, Token<K>> {
        match input.consume_token() {
            Some((token, remainder)) => ParseResult::value(token, input, remainder),
            None => ParseResult::Err(Failure::expected(input, vec![String::from("any token")])),
        }
    }
}

/// Matches a single token accepted by a predicate.
#[derive_where(Clone)]
pub struct Matching<K> {
    predicate: Arc<dyn Fn(&Token<K>) -> bool + Send + Sync>,
    name: String,
}
pub fn matching<K, F>(predicate: F, name: impl Into<String>) -> Matching<K>
where
    K: TokenKind,
    F: Fn(&Token<K>) -> bool + Send + Sync + 'static,
{
    Matching {
        predicate: Arc::new(predicate),
        name: name.into(),
    }
}

impl<K> Debug for Matching<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Matching({})", self.name)
    }
}

impl<K: TokenKind> Parser<TokenList<K>> for Matching<K> {
    type Output = Token<K>;

    fn run(&self, input: TokenList<K>) -> ParseResult<TokenList<K>, Token<K>> {
        match input.consume_token() {
            Some((token, remainder)) if (self.predicate)(&token) => {
                ParseResult::value(token, input, remainder)
            }
            _ => ParseResult::Err(Failure::expected(input, vec![self.name.clone()])),
        }
    }
}

/// Matches consecutive tokens of the given kinds.
/// - Fails at the first mismatching token, partially if any were matched.
#[derive(Clone, Debug)]
pub struct Sequence<K> {
    kinds: Vec<K>,
}
pub fn sequence<K: TokenKind>(kinds: impl IntoIterator<Item = K>) -> Sequence<K> {
    Sequence {
        kinds: kinds.into_iter().collect(),
    }
}

impl<K: TokenKind> Parser<TokenList<K>> for Sequence<K> {
    type Output = Vec<Token<K>>;

    fn run(&self, input: TokenList<K>) -> ParseResult<TokenList<K>, Vec<Token<K>>> {
        let mut tokens = Vec::with_capacity(self.kinds.len());
        let mut remainder = input.clone();
        for kind in &self.kinds {
            match remainder.consume_token() {
                Some((token, rest)) if token.kind == *kind => {
                    tokens.push(token);
                    remainder = rest;
                }
                _ => return ParseResult::Err(Failure::expected(remainder, vec![kind.expectation()])),
            }
        }
        ParseResult::value(tokens, input, remainder)
    }
}

/// Interprets the text of a token with a text parser, which must consume all of it.
/// - Failures are reported at the token (so they compare with other token failures), with the
///   position inside the token where the text parser stopped.
/// ```
/// use strata::{Parser, Token, TokenKind, TokenList, TextSpan, tokens, text::span};
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum Tk { Number }
/// impl TokenKind for Tk {}
///
/// let src = TextSpan::new("12a");
/// let list = TokenList::with_end(vec![Token::new(Tk::Number, src.clone())], src.end_position());
/// let number = tokens::apply(
///     tokens::eq(Tk::Number),
///     span::take_while1(|c| c.is_ascii_digit(), "digit"),
/// );
/// assert_eq!(
///     number.parse(list).unwrap_err().to_string(),
///     "Syntax error (line 1, column 3): invalid number, unexpected `a`."
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Apply<P, Q> {
    token: P,
    text: Q,
}
pub fn apply<P, Q>(token: P, text: Q) -> Apply<P, Q> {
    Apply { token, text }
}

impl<K, P, Q> Parser<TokenList<K>> for Apply<P, Q>
where
    K: TokenKind,
    P: Parser<TokenList<K>, Output = Token<K>>,
    Q: Parser<TextSpan>,
{
    type Output = Q::Output;

    fn run(&self, input: TokenList<K>) -> ParseResult<TokenList<K>, Q::Output> {
        let token = match self.token.run(input.clone()) {
            ParseResult::Suc(s) => s,
            ParseResult::Err(e) => return ParseResult::Err(e),
        };
        let inner = match self.text.run(token.value.span.clone()) {
            ParseResult::Suc(s) if s.remainder.is_at_end() => {
                return ParseResult::value(s.value, token.location, token.remainder)
            }
            ParseResult::Suc(s) => Failure::empty(s.remainder),
            ParseResult::Err(e) => e,
        };
        let problem = if inner.remainder.is_at_end() {
            "incomplete"
        } else {
            "invalid"
        };
        ParseResult::Err(Failure {
            error_position: Some(inner.error_position()),
            message: Some(format!(
                "{problem} {}, {}",
                token.value.kind.expectation(),
                inner.fragment()
            )),
            expectations: None,
            backtrack: inner.backtrack,
            remainder: input,
        })
    }
}
