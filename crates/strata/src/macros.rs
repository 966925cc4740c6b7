//! Helper macros

/// Helper to combine deeply nested sequences.
/// ```
/// use strata::{seqs, Parser, text::character::eq};
///
/// // seq(eq('a'), seq(eq('b'), eq('c'))) is equivalent to
/// let p = seqs!(eq('a'), eq('b'), eq('c'));
/// assert_eq!(p.parse("abc").unwrap(), ('a', ('b', 'c')));
/// ```
#[macro_export]
macro_rules! seqs {
    ($p:expr $(,)?) => {
        $p
    };
    ($p:expr , $($ts:tt)+) => {
        $crate::core::seq($p, $crate::seqs!($($ts)+))
    };
}

pub use seqs;

/// Helper to combine deeply nested alternatives.
/// ```
/// use strata::{choices, Parser, text::character::eq};
///
/// // or(eq('a'), or(eq('b'), eq('c'))) is equivalent to
/// let p = choices!(eq('a'), eq('b'), eq('c'));
/// assert_eq!(p.parse("c").unwrap(), 'c');
/// assert_eq!(
///     p.parse("d").unwrap_err().to_string(),
///     "Syntax error (line 1, column 1): unexpected `d`, expected `a`, `b` or `c`."
/// );
/// ```
#[macro_export]
macro_rules! choices {
    ($p:expr $(,)?) => {
        $p
    };
    ($p:expr , $($ts:tt)+) => {
        $crate::core::or($p, $crate::choices!($($ts)+))
    };
}

pub use choices;
