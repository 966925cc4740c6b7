//! The core, input agnostic, combinators upon which others are constructed.
//! - Each has a type, a construction function or public fields and a [`Parser`] implementation.

use crate::{Cursor, Failure, ParseResult, Parser};
use derive_where::derive_where;
use std::{
    fmt::{Debug, Formatter},
    sync::{Arc, OnceLock},
};

/// A type erased parser.
#[derive_where(Clone)]
pub struct BoxedParser<C: Cursor, T>(Arc<dyn Parser<C, Output = T> + Send + Sync>);

impl<C: Cursor, T> BoxedParser<C, T> {
    pub fn new<P>(parser: P) -> Self
    where
        P: Parser<C, Output = T> + Send + Sync + 'static,
    {
        Self(Arc::new(parser))
    }
}

impl<C: Cursor, T> Debug for BoxedParser<C, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoxedParser")
    }
}

impl<C: Cursor, T> Parser<C> for BoxedParser<C, T> {
    type Output = T;

    fn run(&self, input: C) -> ParseResult<C, T> {
        self.0.run(input)
    }
}

/// Applies a provided function to successful values.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug)]
pub struct mapsuc<P, F>(pub P, pub F);

impl<C, P, F, U> Parser<C> for mapsuc<P, F>
where
    C: Cursor,
    P: Parser<C>,
    F: Fn(P::Output) -> U,
{
    type Output = U;

    #[inline]
    fn run(&self, input: C) -> ParseResult<C, U> {
        self.0.run(input).map(&self.1)
    }
}

/// Replaces a successful value with a constant.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug)]
pub struct value<P, V>(pub P, pub V);

impl<C, P, V> Parser<C> for value<P, V>
where
    C: Cursor,
    P: Parser<C>,
    V: Clone,
{
    type Output = V;

    #[inline]
    fn run(&self, input: C) -> ParseResult<C, V> {
        self.0.run(input).map(|_| self.1.clone())
    }
}

/// Runs the first parser, then the parser computed from its value on the remainder.
/// - The result's location is the original input, so partial failures are detected by callers.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug)]
pub struct bind<P, F>(pub P, pub F);

impl<C, P, F, Q> Parser<C> for bind<P, F>
where
    C: Cursor,
    P: Parser<C>,
    F: Fn(P::Output) -> Q,
    Q: Parser<C>,
{
    type Output = Q::Output;

    fn run(&self, input: C) -> ParseResult<C, Q::Output> {
        match self.0.run(input.clone()) {
            ParseResult::Suc(first) => match (self.1)(first.value).run(first.remainder) {
                ParseResult::Suc(second) => ParseResult::value(second.value, input, second.remainder),
                ParseResult::Err(e) => ParseResult::Err(e),
            },
            ParseResult::Err(e) => ParseResult::Err(e),
        }
    }
}

/// Runs two parsers in sequence, keeping both values.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug)]
pub struct seq<P1, P2>(pub P1, pub P2);

impl<C, P1, P2> Parser<C> for seq<P1, P2>
where
    C: Cursor,
    P1: Parser<C>,
    P2: Parser<C>,
{
    type Output = (P1::Output, P2::Output);

    fn run(&self, input: C) -> ParseResult<C, Self::Output> {
        match self.0.run(input.clone()) {
            ParseResult::Suc(first) => match self.1.run(first.remainder) {
                ParseResult::Suc(second) => {
                    ParseResult::value((first.value, second.value), input, second.remainder)
                }
                ParseResult::Err(e) => ParseResult::Err(e),
            },
            ParseResult::Err(e) => ParseResult::Err(e),
        }
    }
}

/// Tries the first parser, then the second from the same input if the first failed without
/// consuming any input.
/// - A partial failure of the first is returned as-is, wrap it in [`backtrack`] to try the second anyway.
/// - When both fail, their failures are merged with [`Failure::combine_empty`].
#[allow(non_camel_case_types)]
#[derive(Clone, Debug)]
pub struct or<P1, P2>(pub P1, pub P2);

impl<C, P1, P2> Parser<C> for or<P1, P2>
where
    C: Cursor,
    P1: Parser<C>,
    P2: Parser<C, Output = P1::Output>,
{
    type Output = P1::Output;

    fn run(&self, input: C) -> ParseResult<C, P1::Output> {
        match self.0.run(input.clone()) {
            ParseResult::Suc(s) => ParseResult::Suc(s),
            ParseResult::Err(e) if e.is_committed(&input) => ParseResult::Err(e),
            ParseResult::Err(e1) => match self.1.run(input) {
                ParseResult::Suc(s) => ParseResult::Suc(s),
                ParseResult::Err(e2) => ParseResult::Err(Failure::combine_empty(e1, e2)),
            },
        }
    }
}

/// Reports any failure as a failure at the original input, so that [`or`] may try alternatives.
/// - Expectations describing where a partial failure stopped are dropped, as they no longer match the position.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug)]
pub struct backtrack<P>(pub P);

impl<C, P> Parser<C> for backtrack<P>
where
    C: Cursor,
    P: Parser<C>,
{
    type Output = P::Output;

    fn run(&self, input: C) -> ParseResult<C, P::Output> {
        match self.0.run(input.clone()) {
            ParseResult::Suc(s) => ParseResult::Suc(s),
            ParseResult::Err(e) if e.is_partial(&input) => ParseResult::Err(Failure {
                remainder: input,
                error_position: None,
                message: e.message,
                expectations: None,
                backtrack: true,
            }),
            ParseResult::Err(e) => ParseResult::Err(Failure {
                backtrack: true,
                ..e
            }),
        }
    }
}

/// Names what a parser expects, replacing the expectations of failures that consumed no input.
/// - Partial failures keep their detail.
pub fn named<P>(parser: P, name: impl Into<String>) -> Named<P> {
    Named {
        parser,
        name: name.into(),
    }
}

#[derive(Clone, Debug)]
pub struct Named<P> {
    parser: P,
    name: String,
}

impl<C, P> Parser<C> for Named<P>
where
    C: Cursor,
    P: Parser<C>,
{
    type Output = P::Output;

    fn run(&self, input: C) -> ParseResult<C, P::Output> {
        match self.parser.run(input.clone()) {
            ParseResult::Err(e) if !e.is_partial(&input) => {
                ParseResult::Err(Failure::expected(e.remainder, vec![self.name.clone()]))
            }
            res => res,
        }
    }
}

/// Replaces the message of every failure.
pub fn message<P>(parser: P, msg: impl Into<String>) -> Message<P> {
    Message {
        parser,
        msg: msg.into(),
    }
}

#[derive(Clone, Debug)]
pub struct Message<P> {
    parser: P,
    msg: String,
}

impl<C, P> Parser<C> for Message<P>
where
    C: Cursor,
    P: Parser<C>,
{
    type Output = P::Output;

    fn run(&self, input: C) -> ParseResult<C, P::Output> {
        match self.parser.run(input) {
            ParseResult::Err(e) => ParseResult::Err(Failure {
                message: Some(self.msg.clone()),
                ..e
            }),
            res => res,
        }
    }
}

/// Fails (without consuming input) when the predicate rejects a successful value.
pub fn guard<P, F>(parser: P, predicate: F) -> Guard<P, F> {
    guard_expecting(parser, predicate, "unsatisfied condition")
}

/// As [`guard`], with a custom expectation for rejected values.
pub fn guard_expecting<P, F>(parser: P, predicate: F, expectation: impl Into<String>) -> Guard<P, F> {
    Guard {
        parser,
        predicate,
        expectation: expectation.into(),
    }
}

#[derive(Clone, Debug)]
pub struct Guard<P, F> {
    parser: P,
    predicate: F,
    expectation: String,
}

impl<C, P, F> Parser<C> for Guard<P, F>
where
    C: Cursor,
    P: Parser<C>,
    F: Fn(&P::Output) -> bool,
{
    type Output = P::Output;

    fn run(&self, input: C) -> ParseResult<C, P::Output> {
        match self.parser.run(input.clone()) {
            ParseResult::Suc(s) if !(self.predicate)(&s.value) => {
                ParseResult::Err(Failure::expected(input, vec![self.expectation.clone()]))
            }
            res => res,
        }
    }
}

/// Succeeds without consuming input only if the parser fails.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug)]
pub struct not<P>(pub P);

impl<C, P> Parser<C> for not<P>
where
    C: Cursor,
    P: Parser<C>,
{
    type Output = ();

    fn run(&self, input: C) -> ParseResult<C, ()> {
        match self.0.run(input.clone()) {
            ParseResult::Suc(s) => {
                let matched = input.text_until(&s.remainder);
                ParseResult::Err(Failure::message(
                    input,
                    format!(
                        "unexpected successful parsing of {}",
                        crate::friendly::str_literal(&crate::friendly::clip(&matched, 12))
                    ),
                ))
            }
            ParseResult::Err(_) => ParseResult::value((), input.clone(), input),
        }
    }
}

/// Always succeeds with a constant, consuming nothing.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug)]
pub struct ret<T>(pub T);

impl<C, T> Parser<C> for ret<T>
where
    C: Cursor,
    T: Clone,
{
    type Output = T;

    #[inline]
    fn run(&self, input: C) -> ParseResult<C, T> {
        ParseResult::value(self.0.clone(), input.clone(), input)
    }
}

/// Defers building a parser until it is first run, for grammars that refer to themselves.
/// - The factory is called at most once, the parser it builds is shared by all clones.
/// ```
/// use strata::{Parser, TextSpan, core::{or, reference, BoxedParser, mapsuc}, derived::between, text::character};
///
/// // depth of nested brackets around an `x`
/// fn nested() -> BoxedParser<TextSpan, usize> {
///     or(
///         mapsuc(between(character::eq('['), reference(nested), character::eq(']')), |d: usize| d + 1),
///         mapsuc(character::eq('x'), |_: char| 0usize),
///     )
///     .boxed()
/// }
///
/// assert_eq!(nested().parse("[[[x]]]").unwrap(), 3);
/// ```
pub fn reference<C, P, F>(factory: F) -> Reference<C, P::Output>
where
    C: Cursor,
    F: Fn() -> P + Send + Sync + 'static,
    P: Parser<C> + Send + Sync + 'static,
{
    Reference {
        factory: Arc::new(move || BoxedParser::new(factory())),
        cell: Arc::new(OnceLock::new()),
    }
}

type Factory<C, T> = Arc<dyn Fn() -> BoxedParser<C, T> + Send + Sync>;

#[derive_where(Clone)]
pub struct Reference<C: Cursor, T> {
    factory: Factory<C, T>,
    cell: Arc<OnceLock<BoxedParser<C, T>>>,
}

impl<C: Cursor, T> Debug for Reference<C, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.cell.get().is_some() {
            write!(f, "Reference(resolved)")
        } else {
            write!(f, "Reference(unresolved)")
        }
    }
}

impl<C: Cursor, T> Parser<C> for Reference<C, T> {
    type Output = T;

    fn run(&self, input: C) -> ParseResult<C, T> {
        self.cell.get_or_init(|| (self.factory)()).run(input)
    }
}
