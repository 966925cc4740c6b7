//! Parsers over [`TextSpan`](crate::TextSpan)s.
//! - [`character`] parsers consume a single character, producing it.
//! - [`span`] parsers consume runs of characters, producing the [`TextSpan`](crate::TextSpan) matched.
//!
//! Both are used directly on source text, and through [`apply`](crate::tokens::apply) to
//! interpret the text of a single token.
//! ```
//! use strata::{Parser, derived::{many1, sequence}, text::{character, span}};
//!
//! let assignment = sequence((
//!     span::take_while1(char::is_alphabetic, "identifier"),
//!     span::whitespace(),
//!     character::eq('='),
//!     span::whitespace(),
//!     many1(character::digit()),
//! ));
//! let (name, _, _, _, digits) = assignment.parse("x = 42").unwrap();
//! assert_eq!(name.as_str(), "x");
//! assert_eq!(digits, vec!['4', '2']);
//! ```

pub mod character;
pub mod span;
