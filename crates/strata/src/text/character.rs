//! Single character parsers.

use crate::{friendly, Failure, ParseResult, Parser, TextSpan};
use std::{
    fmt::{Debug, Formatter},
    sync::Arc,
};

/// Consumes one character accepted by a predicate.
/// - Fails without consuming input, with the expectations given, on any other character or at
///   the end of the input.
#[derive(Clone)]
pub struct Matching {
    predicate: Arc<dyn Fn(char) -> bool + Send + Sync>,
    expectations: Vec<String>,
}
pub fn matching<F>(predicate: F, name: impl Into<String>) -> Matching
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    Matching {
        predicate: Arc::new(predicate),
        expectations: vec![name.into()],
    }
}

impl Debug for Matching {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Matching({})", self.expectations.join(" | "))
    }
}

impl Parser<TextSpan> for Matching {
    type Output = char;

    #[inline]
    fn run(&self, input: TextSpan) -> ParseResult<TextSpan, char> {
        match input.consume_char() {
            Some((ch, remainder)) if (self.predicate)(ch) => {
                ParseResult::value(ch, input, remainder)
            }
            _ => ParseResult::Err(Failure::expected(input, self.expectations.clone())),
        }
    }
}

/// Matches exactly `ch`.
pub fn eq(ch: char) -> Matching {
    matching(move |c| c == ch, friendly::char_literal(ch))
}

/// Matches any character.
pub fn any() -> Matching {
    matching(|_| true, "any character")
}

/// Matches any one of `chars`.
pub fn in_set(chars: &str) -> Matching {
    let set = chars.chars().collect::<Vec<_>>();
    let expectations = set.iter().map(|c| friendly::char_literal(*c)).collect();
    Matching {
        predicate: Arc::new(move |c| set.contains(&c)),
        expectations,
    }
}

/// Matches any character but `ch`.
pub fn except(ch: char) -> Matching {
    matching(
        move |c| c != ch,
        format!("any character except {}", friendly::char_literal(ch)),
    )
}

/// Matches any character not in `chars`.
pub fn except_in(chars: &str) -> Matching {
    let set = chars.chars().collect::<Vec<_>>();
    let name = match friendly::list(set.iter().map(|c| friendly::char_literal(*c))) {
        Some(excluded) => format!("any character except {excluded}"),
        None => String::from("any character"),
    };
    matching(move |c| !set.contains(&c), name)
}

pub fn digit() -> Matching {
    matching(|c| c.is_ascii_digit(), "digit")
}

pub fn letter() -> Matching {
    matching(char::is_alphabetic, "letter")
}

pub fn letter_or_digit() -> Matching {
    matching(char::is_alphanumeric, "letter or digit")
}

pub fn lower() -> Matching {
    matching(char::is_lowercase, "lowercase letter")
}

pub fn upper() -> Matching {
    matching(char::is_uppercase, "uppercase letter")
}

pub fn whitespace() -> Matching {
    matching(char::is_whitespace, "whitespace")
}
