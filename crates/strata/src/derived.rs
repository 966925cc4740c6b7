//! Parsers derived from the [core](crate::core) combinators.

use crate::{
    core::{mapsuc, or, seq},
    Cursor, Failure, ParseResult, Parser,
};

/// Applies `step` from `remainder` until it fails, collecting values.
/// - A failure that consumed input is propagated, unless it is marked to backtrack.
///
/// # Panics
/// When `step` succeeds without consuming input.
#[allow(clippy::panic)]
#[track_caller]
fn collect_many<C, T>(
    step: impl Fn(C) -> ParseResult<C, T>,
    location: C,
    mut remainder: C,
    mut values: Vec<T>,
) -> ParseResult<C, Vec<T>>
where
    C: Cursor,
{
    loop {
        match step(remainder.clone()) {
            ParseResult::Suc(s) => {
                if s.remainder == remainder {
                    panic!(
                        "repeated parser succeeded without consuming input at {}, it would never terminate",
                        remainder.position()
                    );
                }
                values.push(s.value);
                remainder = s.remainder;
            }
            ParseResult::Err(e) if e.is_committed(&remainder) => return ParseResult::Err(e),
            ParseResult::Err(_) => return ParseResult::value(values, location, remainder),
        }
    }
}

/// Applies a parser until it fails, collecting zero or more values.
/// ```text
/// P P P ... P <- fails without consuming input
/// ```
/// # Panics
/// When the parser succeeds without consuming input.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug)]
pub struct many0<P>(pub P);

impl<C, P> Parser<C> for many0<P>
where
    C: Cursor,
    P: Parser<C>,
{
    type Output = Vec<P::Output>;

    fn run(&self, input: C) -> ParseResult<C, Self::Output> {
        collect_many(|c| self.0.run(c), input.clone(), input, Vec::new())
    }
}

/// Applies a parser at least once, then as [`many0`].
#[allow(non_camel_case_types)]
#[derive(Clone, Debug)]
pub struct many1<P>(pub P);

impl<C, P> Parser<C> for many1<P>
where
    C: Cursor,
    P: Parser<C>,
{
    type Output = Vec<P::Output>;

    fn run(&self, input: C) -> ParseResult<C, Self::Output> {
        match self.0.run(input.clone()) {
            ParseResult::Suc(first) => {
                collect_many(|c| self.0.run(c), input, first.remainder, vec![first.value])
            }
            ParseResult::Err(e) => ParseResult::Err(e),
        }
    }
}

/// As [`many0`], discarding the values.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug)]
pub struct ignore_many<P>(pub P);

impl<C, P> Parser<C> for ignore_many<P>
where
    C: Cursor,
    P: Parser<C>,
{
    type Output = ();

    fn run(&self, input: C) -> ParseResult<C, ()> {
        collect_many(|c| self.0.run(c).map(|_| ()), input.clone(), input, Vec::new()).map(|_| ())
    }
}

/// Succeeds with [`None`] if the parser fails without consuming input.
/// - A committed failure is propagated.
#[derive(Clone, Debug)]
pub struct Optional<P>(P);

pub fn optional<P>(parser: P) -> Optional<P> {
    Optional(parser)
}

impl<C, P> Parser<C> for Optional<P>
where
    C: Cursor,
    P: Parser<C>,
{
    type Output = Option<P::Output>;

    fn run(&self, input: C) -> ParseResult<C, Self::Output> {
        match self.0.run(input.clone()) {
            ParseResult::Suc(s) => ParseResult::value(Some(s.value), s.location, s.remainder),
            ParseResult::Err(e) if e.is_committed(&input) => ParseResult::Err(e),
            ParseResult::Err(_) => ParseResult::value(None, input.clone(), input),
        }
    }
}

/// As [`optional`], producing a clone of `default` in place of [`None`].
#[derive(Clone, Debug)]
pub struct OptionalOrDefault<P, T> {
    parser: Optional<P>,
    default: T,
}

pub fn optordefault<P, T>(parser: P, default: T) -> OptionalOrDefault<P, T> {
    OptionalOrDefault {
        parser: optional(parser),
        default,
    }
}

impl<C, P, T> Parser<C> for OptionalOrDefault<P, T>
where
    C: Cursor,
    P: Parser<C, Output = T>,
    T: Clone,
{
    type Output = T;

    fn run(&self, input: C) -> ParseResult<C, Self::Output> {
        self.parser
            .run(input)
            .map(|v| v.unwrap_or_else(|| self.default.clone()))
    }
}

/// Keeps only the value of the second parser.
pub fn ignorethen<C, P1, P2>(first: P1, second: P2) -> impl Parser<C, Output = P2::Output>
where
    C: Cursor,
    P1: Parser<C>,
    P2: Parser<C>,
{
    mapsuc(seq(first, second), |(_, b): (P1::Output, P2::Output)| b)
}

/// Keeps only the value of the first parser.
pub fn thenignore<C, P1, P2>(first: P1, second: P2) -> impl Parser<C, Output = P1::Output>
where
    C: Cursor,
    P1: Parser<C>,
    P2: Parser<C>,
{
    mapsuc(seq(first, second), |(a, _): (P1::Output, P2::Output)| a)
}

/// Parses `open item close`, keeping the item.
pub fn between<C, O, P, E>(open: O, item: P, close: E) -> impl Parser<C, Output = P::Output>
where
    C: Cursor,
    O: Parser<C>,
    P: Parser<C>,
    E: Parser<C>,
{
    thenignore(ignorethen(open, item), close)
}

/// Parses `item (delim item)*` keeping the items.
#[derive(Clone, Debug)]
pub struct DelimitedBy<P, D> {
    item: P,
    delim: D,
    required: bool,
}

/// Parses one or more items separated by delimiters.
pub fn many1_delimited_by<P, D>(item: P, delim: D) -> DelimitedBy<P, D> {
    DelimitedBy {
        item,
        delim,
        required: true,
    }
}

/// Parses zero or more items separated by delimiters.
/// - Fails only if the first item, or an item after a delimiter, fails after consuming input.
pub fn many_delimited_by<P, D>(item: P, delim: D) -> DelimitedBy<P, D> {
    DelimitedBy {
        item,
        delim,
        required: false,
    }
}

impl<C, P, D> Parser<C> for DelimitedBy<P, D>
where
    C: Cursor,
    P: Parser<C>,
    D: Parser<C>,
{
    type Output = Vec<P::Output>;

    fn run(&self, input: C) -> ParseResult<C, Self::Output> {
        let first = match self.item.run(input.clone()) {
            ParseResult::Suc(s) => s,
            ParseResult::Err(e) if self.required || e.is_committed(&input) => {
                return ParseResult::Err(e)
            }
            ParseResult::Err(_) => return ParseResult::value(Vec::new(), input.clone(), input),
        };
        let next = |c: C| match self.delim.run(c) {
            ParseResult::Suc(d) => self.item.run(d.remainder),
            ParseResult::Err(e) => ParseResult::Err(e),
        };
        collect_many(next, input, first.remainder, vec![first.value])
    }
}

/// Parses a (possibly empty) delimited list, followed by a terminator.
/// ```text
/// item delim item delim item end
/// end
/// ```
pub fn many_delimited_by_ending<C, P, D, E>(
    item: P,
    delim: D,
    end: E,
) -> impl Parser<C, Output = Vec<P::Output>>
where
    C: Cursor,
    P: Parser<C>,
    D: Parser<C>,
    E: Parser<C> + Clone,
{
    or(
        thenignore(many1_delimited_by(item, delim), end.clone()),
        mapsuc(end, |_: E::Output| Vec::new()),
    )
}

/// Applies a parser exactly `count` times.
#[derive(Clone, Debug)]
pub struct Repeat<P> {
    parser: P,
    count: usize,
}

pub fn repeat<P>(parser: P, count: usize) -> Repeat<P> {
    Repeat { parser, count }
}

impl<C, P> Parser<C> for Repeat<P>
where
    C: Cursor,
    P: Parser<C>,
{
    type Output = Vec<P::Output>;

    fn run(&self, input: C) -> ParseResult<C, Self::Output> {
        let mut values = Vec::with_capacity(self.count);
        let mut remainder = input.clone();
        for _ in 0..self.count {
            match self.parser.run(remainder) {
                ParseResult::Suc(s) => {
                    values.push(s.value);
                    remainder = s.remainder;
                }
                ParseResult::Err(e) => return ParseResult::Err(e),
            }
        }
        ParseResult::value(values, input, remainder)
    }
}

/// Fails if input remains after a successful parse.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug)]
pub struct atend<P>(pub P);

impl<C, P> Parser<C> for atend<P>
where
    C: Cursor,
    P: Parser<C>,
{
    type Output = P::Output;

    fn run(&self, input: C) -> ParseResult<C, P::Output> {
        match self.0.run(input) {
            ParseResult::Suc(s) if !s.remainder.is_at_end() => {
                ParseResult::Err(Failure::empty(s.remainder))
            }
            res => res,
        }
    }
}

/// Applies a tuple of parsers in order, producing a tuple of their values.
/// - The first failure is returned unchanged, so its remainder shows how far parsing reached.
/// ```
/// use strata::{Parser, derived::sequence, text::character};
///
/// let p = sequence((character::letter(), character::digit(), character::eq('!')));
/// assert_eq!(p.parse("a1!").unwrap(), ('a', '1', '!'));
/// assert_eq!(
///     p.parse("a1?").unwrap_err().to_string(),
///     "Syntax error (line 1, column 3): unexpected `?`, expected `!`."
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Sequence<T>(T);

pub fn sequence<T>(parsers: T) -> Sequence<T> {
    Sequence(parsers)
}

macro_rules! sequence_impl {
    ($($p:ident $field:tt $v:ident),+) => {
        impl<C, $($p),+> Parser<C> for Sequence<($($p,)+)>
        where
            C: Cursor,
            $($p: Parser<C>,)+
        {
            type Output = ($($p::Output,)+);

            fn run(&self, input: C) -> ParseResult<C, Self::Output> {
                let remainder = input.clone();
                $(
                    let ($v, remainder) = match self.0.$field.run(remainder) {
                        ParseResult::Suc(s) => (s.value, s.remainder),
                        ParseResult::Err(e) => return ParseResult::Err(e),
                    };
                )+
                ParseResult::value(($($v,)+), input, remainder)
            }
        }
    };
}

sequence_impl!(P1 0 a, P2 1 b);
sequence_impl!(P1 0 a, P2 1 b, P3 2 c);
sequence_impl!(P1 0 a, P2 1 b, P3 2 c, P4 3 d);
sequence_impl!(P1 0 a, P2 1 b, P3 2 c, P4 3 d, P5 4 e);
