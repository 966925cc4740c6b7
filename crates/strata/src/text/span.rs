//! Parsers matching runs of characters, producing the [`TextSpan`] consumed.

use crate::{friendly, Failure, ParseResult, Parser, TextSpan};
use std::{
    fmt::{Debug, Formatter},
    sync::Arc,
};

/// Matches a literal string.
/// - A mismatch on the first character fails without consuming input, expecting the whole literal.
/// - A later mismatch is partial, expecting the next character of the literal.
#[derive(Clone, Debug)]
pub struct Literal {
    text: String,
    ignore_case: bool,
}
pub fn eq(text: &str) -> Literal {
    Literal {
        text: text.to_owned(),
        ignore_case: false,
    }
}

/// As [`eq`], comparing characters by their lowercase forms.
pub fn eq_ignore_case(text: &str) -> Literal {
    Literal {
        text: text.to_owned(),
        ignore_case: true,
    }
}

impl Literal {
    fn same(&self, found: char, expected: char) -> bool {
        found == expected || (self.ignore_case && found.to_lowercase().eq(expected.to_lowercase()))
    }
}

impl Parser<TextSpan> for Literal {
    type Output = TextSpan;

    fn run(&self, input: TextSpan) -> ParseResult<TextSpan, TextSpan> {
        let mut remainder = input.clone();
        for expected in self.text.chars() {
            match remainder.consume_char() {
                Some((found, rest)) if self.same(found, expected) => remainder = rest,
                _ if remainder == input => {
                    return ParseResult::Err(Failure::expected(
                        input,
                        vec![friendly::str_literal(&self.text)],
                    ))
                }
                _ => {
                    return ParseResult::Err(Failure::expected(
                        remainder,
                        vec![friendly::char_literal(expected)],
                    ))
                }
            }
        }
        ParseResult::value(input.until(&remainder), input, remainder)
    }
}

/// Consumes characters while a predicate holds.
#[derive(Clone)]
pub struct TakeWhile {
    predicate: Arc<dyn Fn(char) -> bool + Send + Sync>,
    expectation: Option<String>,
}

/// Consumes zero or more characters accepted by `predicate`.
pub fn take_while<F>(predicate: F) -> TakeWhile
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    TakeWhile {
        predicate: Arc::new(predicate),
        expectation: None,
    }
}

/// Consumes one or more characters accepted by `predicate`, failing with `name` expected.
pub fn take_while1<F>(predicate: F, name: impl Into<String>) -> TakeWhile
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    TakeWhile {
        predicate: Arc::new(predicate),
        expectation: Some(name.into()),
    }
}

/// Consumes any (possibly empty) run of whitespace.
pub fn whitespace() -> TakeWhile {
    take_while(char::is_whitespace)
}

impl Debug for TakeWhile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.expectation {
            Some(e) => write!(f, "TakeWhile1({e})"),
            None => write!(f, "TakeWhile"),
        }
    }
}

impl Parser<TextSpan> for TakeWhile {
    type Output = TextSpan;

    fn run(&self, input: TextSpan) -> ParseResult<TextSpan, TextSpan> {
        let mut remainder = input.clone();
        while let Some((ch, rest)) = remainder.consume_char() {
            if !(self.predicate)(ch) {
                break;
            }
            remainder = rest;
        }
        match &self.expectation {
            Some(name) if remainder == input => {
                ParseResult::Err(Failure::expected(input, vec![name.clone()]))
            }
            _ => ParseResult::value(input.until(&remainder), input, remainder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::or;

    #[test]
    fn literal_match() {
        let input = TextSpan::new("let x");
        match eq("let").run(input.clone()) {
            ParseResult::Suc(s) => {
                assert_eq!(s.value.as_str(), "let");
                assert_eq!(s.remainder.as_str(), " x");
            }
            ParseResult::Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn literal_failures() {
        let input = TextSpan::new("lex");
        match eq("let").run(input.clone()) {
            ParseResult::Err(e) => {
                assert!(e.is_partial(&input));
                assert_eq!(e.remainder, input.skip(2));
            }
            ParseResult::Suc(_) => panic!("should fail"),
        }
        assert_eq!(
            eq("let").parse("x").unwrap_err().to_string(),
            "Syntax error (line 1, column 1): unexpected `x`, expected `let`."
        );
        assert_eq!(
            or(eq("let"), eq("var")).parse("x").unwrap_err().to_string(),
            "Syntax error (line 1, column 1): unexpected `x`, expected `let` or `var`."
        );
    }

    #[test]
    fn ignoring_case() {
        assert_eq!(eq_ignore_case("SELECT").parse("select").unwrap().as_str(), "select");
        assert!(eq("SELECT").parse("select").is_err());
    }

    #[test]
    fn runs() {
        let digits = take_while(|c| c.is_ascii_digit());
        assert_eq!(digits.parse("").unwrap().as_str(), "");
        let input = TextSpan::new("123abc");
        assert_eq!(digits.run(input.clone()).remainder(), &input.skip(3));
        assert_eq!(
            take_while1(|c| c.is_ascii_digit(), "number").parse("abc").unwrap_err().to_string(),
            "Syntax error (line 1, column 1): unexpected `a`, expected number."
        );
        assert_eq!(whitespace().parse(" \t\n").unwrap().len(), 3);
    }
}
