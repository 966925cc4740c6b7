//! The contract for tokenizers, converting source text into a [`TokenList`].
//!
//! A tokenizer is a step function: given the remaining text (and the previous token), it
//! recognises the next token. Whitespace and comments are skipped by starting the recognised
//! token after them.

use crate::{Failure, ParseError, ParseResult, TextSpan, Token, TokenKind, TokenList};

/// What a [`Tokenizer`] knows of the tokens it has already produced.
#[derive(Clone, Debug)]
pub struct TokenizationState<K> {
    pub previous: Option<Token<K>>,
}

impl<K> Default for TokenizationState<K> {
    fn default() -> Self {
        Self { previous: None }
    }
}

pub trait Tokenizer<K: TokenKind> {
    /// Recognises the next token in `remainder`.
    /// - [`None`] when only ignorable text (or nothing) remains.
    /// - On success the token covers `location` up to `remainder`, so `location` may be after
    ///   skipped whitespace.
    /// - A failure ends tokenization.
    fn scan(
        &self,
        remainder: &TextSpan,
        state: &TokenizationState<K>,
    ) -> Option<ParseResult<TextSpan, K>>;

    /// Lazily tokenizes `span`.
    fn tokenize(&self, span: TextSpan) -> Tokens<'_, Self, K>
    where
        Self: Sized,
    {
        Tokens {
            tokenizer: self,
            remainder: span,
            state: TokenizationState::default(),
            finished: false,
        }
    }

    /// Tokenizes all of `source`, stopping at the first failure.
    fn try_tokenize(&self, source: &str) -> Result<TokenList<K>, Failure<TextSpan>>
    where
        Self: Sized,
    {
        let span = TextSpan::new(source);
        let end = span.end_position();
        let tokens = self.tokenize(span).collect::<Result<Vec<_>, _>>()?;
        Ok(TokenList::with_end(tokens, end))
    }

    /// As [`Tokenizer::try_tokenize`], converting failures into a [`ParseError`].
    fn tokenize_source(&self, source: &str) -> Result<TokenList<K>, ParseError>
    where
        Self: Sized,
    {
        self.try_tokenize(source).map_err(ParseError::from)
    }
}

/// The tokens of a source, see [`Tokenizer::tokenize`].
/// - Yields the failure that ends tokenization, then nothing.
///
/// # Panics
/// When the tokenizer recognises an empty token.
pub struct Tokens<'t, T, K> {
    tokenizer: &'t T,
    remainder: TextSpan,
    state: TokenizationState<K>,
    finished: bool,
}

impl<T, K> Iterator for Tokens<'_, T, K>
where
    T: Tokenizer<K>,
    K: TokenKind,
{
    type Item = Result<Token<K>, Failure<TextSpan>>;

    #[allow(clippy::panic)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.tokenizer.scan(&self.remainder, &self.state) {
            None => {
                self.finished = true;
                None
            }
            Some(ParseResult::Err(e)) => {
                self.finished = true;
                Some(Err(e))
            }
            Some(ParseResult::Suc(s)) => {
                if s.remainder == s.location {
                    panic!(
                        "tokenizer recognised an empty {:?} token at {}",
                        s.value,
                        s.location.position()
                    );
                }
                let token = Token::new(s.value, s.location.until(&s.remainder));
                self.remainder = s.remainder;
                self.state.previous = Some(token.clone());
                Some(Ok(token))
            }
        }
    }
}

impl<T, K> std::iter::FusedIterator for Tokens<'_, T, K>
where
    T: Tokenizer<K>,
    K: TokenKind,
{
}
