//! Folding chains of infix operators.
//! - [`chain`] and [`chain_right`] parse `operand (operator operand)*` in a loop, so chains of
//!   any length are parsed without deepening the stack.
//! - [`tiers`] stacks chains into levels of precedence, a smaller sibling of the
//!   [operator precedence](crate::precedence) machine for grammars without groupings.

use crate::{core::BoxedParser, precedence::Associativity, Cursor, Failure, ParseResult, Parser};
use derive_where::derive_where;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct Chain<O, P, F> {
    operator: O,
    operand: P,
    apply: F,
    associativity: Associativity,
}

/// Parses operands separated by operators, folding them from the left.
/// ```text
/// 1 - 2 + 3  =>  (1 - 2) + 3
/// ```
/// Stops at the first operator that fails without consuming input, so a trailing
/// operator-free suffix is never an error.
///
/// # Panics
/// When an operator and operand together succeed without consuming input.
pub fn chain<O, P, F>(operator: O, operand: P, apply: F) -> Chain<O, P, F> {
    Chain {
        operator,
        operand,
        apply,
        associativity: Associativity::Left,
    }
}

/// As [`chain`], folding from the right.
/// ```text
/// 2 ^ 3 ^ 2  =>  2 ^ (3 ^ 2)
/// ```
/// The operators and operands are collected before folding, so (unlike a recursive
/// formulation) the length of the chain is limited only by memory.
pub fn chain_right<O, P, F>(operator: O, operand: P, apply: F) -> Chain<O, P, F> {
    Chain {
        operator,
        operand,
        apply,
        associativity: Associativity::Right,
    }
}

impl<O, P, F> Chain<O, P, F> {
    /// Parses the next `operator operand` pair from `remainder`.
    /// - `None` when there is no further operator.
    #[allow(clippy::panic)]
    #[allow(clippy::type_complexity)]
    fn next<C>(&self, remainder: &C) -> Option<Result<(O::Output, P::Output, C), Failure<C>>>
    where
        C: Cursor,
        O: Parser<C>,
        P: Parser<C>,
    {
        match self.operator.run(remainder.clone()) {
            ParseResult::Err(e) if e.is_committed(remainder) => Some(Err(e)),
            ParseResult::Err(_) => None,
            ParseResult::Suc(op) => match self.operand.run(op.remainder) {
                ParseResult::Suc(rhs) if rhs.remainder == *remainder => panic!(
                    "chained operator and operand succeeded without consuming input at {}",
                    remainder.position()
                ),
                ParseResult::Suc(rhs) => Some(Ok((op.value, rhs.value, rhs.remainder))),
                ParseResult::Err(e) => Some(Err(e)),
            },
        }
    }
}

impl<C, O, P, F> Parser<C> for Chain<O, P, F>
where
    C: Cursor,
    O: Parser<C>,
    P: Parser<C>,
    F: Fn(O::Output, P::Output, P::Output) -> P::Output,
{
    type Output = P::Output;

    fn run(&self, input: C) -> ParseResult<C, P::Output> {
        let (mut acc, mut remainder) = match self.operand.run(input.clone()) {
            ParseResult::Suc(first) => (first.value, first.remainder),
            ParseResult::Err(e) => return ParseResult::Err(e),
        };

        match self.associativity {
            Associativity::Left => {
                while let Some(next) = self.next(&remainder) {
                    match next {
                        Ok((op, rhs, rem)) => {
                            acc = (self.apply)(op, acc, rhs);
                            remainder = rem;
                        }
                        Err(e) => return ParseResult::Err(e),
                    }
                }
                ParseResult::value(acc, input, remainder)
            }
            Associativity::Right => {
                let mut pending = Vec::new();
                while let Some(next) = self.next(&remainder) {
                    match next {
                        Ok((op, rhs, rem)) => {
                            pending.push((acc, op));
                            acc = rhs;
                            remainder = rem;
                        }
                        Err(e) => return ParseResult::Err(e),
                    }
                }
                while let Some((lhs, op)) = pending.pop() {
                    acc = (self.apply)(op, lhs, acc);
                }
                ParseResult::value(acc, input, remainder)
            }
        }
    }
}

/// One level of a [`tiers`] grammar: the operators binding at the same strength.
#[derive_where(Clone)]
pub struct Tier<C: Cursor, O, T> {
    operator: BoxedParser<C, O>,
    associativity: Associativity,
    apply: Arc<dyn Fn(O, T, T) -> T + Send + Sync>,
}

impl<C: Cursor, O, T> Tier<C, O, T> {
    pub fn new<P, F>(associativity: Associativity, operator: P, apply: F) -> Self
    where
        P: Parser<C, Output = O> + Send + Sync + 'static,
        F: Fn(O, T, T) -> T + Send + Sync + 'static,
    {
        Self {
            operator: operator.boxed(),
            associativity,
            apply: Arc::new(apply),
        }
    }

    pub fn left<P, F>(operator: P, apply: F) -> Self
    where
        P: Parser<C, Output = O> + Send + Sync + 'static,
        F: Fn(O, T, T) -> T + Send + Sync + 'static,
    {
        Self::new(Associativity::Left, operator, apply)
    }

    pub fn right<P, F>(operator: P, apply: F) -> Self
    where
        P: Parser<C, Output = O> + Send + Sync + 'static,
        F: Fn(O, T, T) -> T + Send + Sync + 'static,
    {
        Self::new(Associativity::Right, operator, apply)
    }
}

/// Builds an expression parser from levels of operators, given from tightest to loosest binding.
/// ```
/// use strata::{Parser, chain::{tiers, Tier}, core::mapsuc, text::character};
///
/// let digit = mapsuc(character::digit(), |d: char| d.to_digit(10).unwrap_or_default() as i64);
/// let expr = tiers(
///     digit,
///     vec![
///         Tier::right(character::eq('^'), |_, l: i64, r: i64| l.pow(r as u32)),
///         Tier::left(character::eq('*'), |_, l: i64, r: i64| l * r),
///         Tier::left(character::in_set("+-"), |op: char, l: i64, r: i64| {
///             if op == '+' { l + r } else { l - r }
///         }),
///     ],
/// );
/// assert_eq!(expr.parse("1+2*3").unwrap(), 7);
/// assert_eq!(expr.parse("2^3^2").unwrap(), 512);
/// assert_eq!(expr.parse("1-2+3").unwrap(), 2);
/// ```
pub fn tiers<C, P, O, T>(operand: P, tiers: Vec<Tier<C, O, T>>) -> BoxedParser<C, T>
where
    C: Cursor + 'static,
    P: Parser<C, Output = T> + Send + Sync + 'static,
    O: 'static,
    T: 'static,
{
    tiers.into_iter().fold(operand.boxed(), |level, tier| {
        let apply = tier.apply;
        let fold = move |op: O, lhs: T, rhs: T| apply(op, lhs, rhs);
        Chain {
            operator: tier.operator,
            operand: level,
            apply: fold,
            associativity: tier.associativity,
        }
        .boxed()
    })
}
