//! The shift/reduce machine parsing expressions for an [`OperatorPrecedence`](super::OperatorPrecedence).
//!
//! The machine alternates between expecting an operand and expecting an operator:
//! ```text
//!  ┌──────────────────── prefix, `(`, `if` ───┐
//!  ▼                                          │
//! Operand ──── operand parser ────────▶ Operator ──── anything else ───▶ finish
//!  ▲                                          │
//!  └─────── infix, separator, `then`, `else` ─┘   (`)` stays expecting an operator)
//! ```
//! Pending operators and markers for open groupings and conditionals are kept on one stack,
//! the values built so far on another. Each step consumes the machine and returns it, so the
//! state is only ever changed through the step functions.

use super::{Associativity, Grammar};
use crate::{core::BoxedParser, Failure, ParseResult, Parser, Token, TokenKind, TokenList};

#[derive(Debug)]
enum Pending<K> {
    Infix { group: usize, op: usize },
    Prefix { group: usize, op: usize },
    /// An open grouping, `depth` operands were on the stack when it opened.
    Open { set: usize, depth: usize },
    Separator { token: Token<K> },
    If { def: usize },
    Then { def: usize },
    Else { def: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Expect {
    Operand,
    Operator,
}

struct Machine<K, T> {
    input: TokenList<K>,
    remainder: TokenList<K>,
    expect: Expect,
    operators: Vec<Pending<K>>,
    operands: Vec<T>,
}

enum Step<K, T> {
    Continue(Machine<K, T>),
    Done(ParseResult<TokenList<K>, T>),
}

pub(super) fn run<K: TokenKind, T>(
    grammar: &Grammar<K, T>,
    operand: &BoxedParser<TokenList<K>, T>,
    input: TokenList<K>,
) -> ParseResult<TokenList<K>, T> {
    let mut machine = Machine::new(input);
    loop {
        machine = match machine.step(grammar, operand) {
            Step::Continue(m) => m,
            Step::Done(result) => return result,
        }
    }
}

impl<K: TokenKind, T> Machine<K, T> {
    fn new(input: TokenList<K>) -> Self {
        Self {
            remainder: input.clone(),
            input,
            expect: Expect::Operand,
            operators: Vec::new(),
            operands: Vec::new(),
        }
    }

    fn step(self, grammar: &Grammar<K, T>, operand: &BoxedParser<TokenList<K>, T>) -> Step<K, T> {
        match self.expect {
            Expect::Operand => self.expect_operand(grammar, operand),
            Expect::Operator => self.expect_operator(grammar),
        }
    }

    fn shift(mut self, pending: Pending<K>, remainder: TokenList<K>, expect: Expect) -> Step<K, T> {
        self.operators.push(pending);
        self.remainder = remainder;
        self.expect = expect;
        Step::Continue(self)
    }

    fn push_operand(mut self, value: T, remainder: TokenList<K>) -> Step<K, T> {
        self.operands.push(value);
        self.remainder = remainder;
        self.expect = Expect::Operator;
        Step::Continue(self)
    }

    fn fail(self, failure: Failure<TokenList<K>>) -> Step<K, T> {
        Step::Done(ParseResult::Err(failure))
    }

    /// Fails expecting `expected` at the current token.
    fn fail_expecting(self, expected: &K) -> Step<K, T> {
        let failure = Failure::expected(self.remainder.clone(), vec![expected.expectation()]);
        self.fail(failure)
    }

    fn expect_operand(
        self,
        grammar: &Grammar<K, T>,
        operand: &BoxedParser<TokenList<K>, T>,
    ) -> Step<K, T> {
        if let Some((token, rest)) = self.remainder.consume_token() {
            if let Some((group, op)) = grammar.prefix(&token.kind) {
                return self.shift(Pending::Prefix { group, op }, rest, Expect::Operand);
            }
            if let Some(set) = grammar.set_starting(&token.kind) {
                let def = &grammar.sets[set];
                if def.allow_empty {
                    if let Some((next, after)) = rest.consume_token() {
                        if next.kind == def.end {
                            return self.push_operand((def.build)(Vec::new(), Vec::new()), after);
                        }
                    }
                }
                let depth = self.operands.len();
                return self.shift(Pending::Open { set, depth }, rest, Expect::Operand);
            }
            if let Some(def) = grammar.if_starting(&token.kind) {
                return self.shift(Pending::If { def }, rest, Expect::Operand);
            }
        }

        match operand.run(self.remainder.clone()) {
            ParseResult::Suc(s) => self.push_operand(s.value, s.remainder),
            ParseResult::Err(e) => self.fail(e),
        }
    }

    fn expect_operator(mut self, grammar: &Grammar<K, T>) -> Step<K, T> {
        let Some((token, rest)) = self.remainder.consume_token() else {
            return self.finish(grammar);
        };

        if let Some((group, op)) = grammar.infix(&token.kind) {
            self.reduce_above(grammar, grammar.infix[group].precedence);
            return self.shift(Pending::Infix { group, op }, rest, Expect::Operand);
        }

        if let Some((at, set)) = self.innermost_open() {
            let def = &grammar.sets[set];
            if token.kind == def.end {
                return self.close(grammar, at, set, rest);
            }
            if def.separators.contains(&token.kind) {
                if let Some(cond) = self.unmatched_if(at + 1) {
                    return self.fail_expecting(&grammar.conditionals[cond].then_kind);
                }
                self.reduce_to_barrier(grammar);
                return self.shift(Pending::Separator { token }, rest, Expect::Operand);
            }
        }

        if let Some(def) = grammar.then_of(&token.kind) {
            if self.attaches(Attach::Then, def) {
                while !matches!(self.operators.last(), Some(Pending::If { def: d }) if *d == def) {
                    self.reduce_top(grammar);
                }
                return self.shift(Pending::Then { def }, rest, Expect::Operand);
            }
        }

        if let Some(def) = grammar.else_of(&token.kind) {
            if self.attaches(Attach::Else, def) {
                while !matches!(self.operators.last(), Some(Pending::Then { def: d }) if *d == def) {
                    self.reduce_top(grammar);
                }
                return self.shift(Pending::Else { def }, rest, Expect::Operand);
            }
        }

        self.finish(grammar)
    }

    /// Reduces operators that bind tighter than an incoming infix operator of `precedence`.
    fn reduce_above(&mut self, grammar: &Grammar<K, T>, precedence: i32) {
        loop {
            let reduce = match self.operators.last() {
                Some(Pending::Infix { group, .. }) => {
                    let top = &grammar.infix[*group];
                    top.precedence > precedence
                        || (top.precedence == precedence
                            && top.associativity == Associativity::Left)
                }
                Some(Pending::Prefix { group, .. }) => grammar.prefix[*group].precedence > precedence,
                _ => false,
            };
            if !reduce {
                return;
            }
            self.reduce_top(grammar);
        }
    }

    /// Reduces everything above the innermost open grouping or separator.
    fn reduce_to_barrier(&mut self, grammar: &Grammar<K, T>) {
        while !matches!(
            self.operators.last(),
            None | Some(Pending::Open { .. } | Pending::Separator { .. })
        ) {
            self.reduce_top(grammar);
        }
    }

    /// Applies the operator or conditional on top of the stack.
    fn reduce_top(&mut self, grammar: &Grammar<K, T>) {
        match self.operators.pop() {
            Some(Pending::Infix { group, op }) => {
                let rhs = self.pop_operand();
                let lhs = self.pop_operand();
                self.operands.push((grammar.infix[group].build)(op, lhs, rhs));
            }
            Some(Pending::Prefix { group, op }) => {
                let operand = self.pop_operand();
                self.operands.push((grammar.prefix[group].build)(op, operand));
            }
            Some(Pending::Then { def }) => {
                let then = self.pop_operand();
                let cond = self.pop_operand();
                self.pop_if(def);
                self.operands.push((grammar.conditionals[def].if_then)(cond, then));
            }
            Some(Pending::Else { def }) => {
                let otherwise = self.pop_operand();
                let then = self.pop_operand();
                let cond = self.pop_operand();
                match self.operators.pop() {
                    Some(Pending::Then { def: d }) if d == def => (),
                    other => unreachable!("`else` must follow its `then`, found {other:?}"),
                }
                self.pop_if(def);
                self.operands.push((grammar.conditionals[def].if_then_else)(cond, then, otherwise));
            }
            other => unreachable!("only operators and conditionals are reduced, found {other:?}"),
        }
    }

    fn pop_if(&mut self, def: usize) {
        match self.operators.pop() {
            Some(Pending::If { def: d }) if d == def => (),
            other => unreachable!("`then` must follow its `if`, found {other:?}"),
        }
    }

    fn pop_operand(&mut self) -> T {
        match self.operands.pop() {
            Some(value) => value,
            None => unreachable!("every operator is shifted after its operands"),
        }
    }

    /// The stack index and definition of the innermost open grouping.
    fn innermost_open(&self) -> Option<(usize, usize)> {
        self.operators
            .iter()
            .enumerate()
            .rev()
            .find_map(|(at, p)| match p {
                Pending::Open { set, .. } => Some((at, *set)),
                _ => None,
            })
    }

    /// The outermost `if` from stack index `from` that has no `then`.
    /// - INV: a `then` is always shifted directly above its `if`.
    fn unmatched_if(&self, from: usize) -> Option<usize> {
        self.operators
            .iter()
            .enumerate()
            .skip(from)
            .find_map(|(at, p)| match p {
                Pending::If { def }
                    if !matches!(self.operators.get(at + 1), Some(Pending::Then { .. })) =>
                {
                    Some(*def)
                }
                _ => None,
            })
    }

    /// Checks if a `then` (or `else`) of the definition `def` continues the nearest open
    /// conditional, looking past operators and conditionals that would be reduced first.
    fn attaches(&self, attach: Attach, def: usize) -> bool {
        // markers below that completed conditionals above will consume when reduced
        let mut thens = 0usize;
        let mut ifs = 0usize;
        for pending in self.operators.iter().rev() {
            match pending {
                Pending::Infix { .. } | Pending::Prefix { .. } => (),
                Pending::Else { .. } => thens += 1,
                Pending::Then { def: d } => {
                    if thens > 0 {
                        thens -= 1;
                        ifs += 1;
                    } else if attach == Attach::Else {
                        return *d == def;
                    } else {
                        ifs += 1;
                    }
                }
                Pending::If { def: d } => {
                    if ifs > 0 {
                        ifs -= 1;
                    } else {
                        return attach == Attach::Then && *d == def;
                    }
                }
                Pending::Open { .. } | Pending::Separator { .. } => return false,
            }
        }
        false
    }

    /// Closes the grouping opened at stack index `at` on its end token.
    fn close(
        mut self,
        grammar: &Grammar<K, T>,
        at: usize,
        set: usize,
        rest: TokenList<K>,
    ) -> Step<K, T> {
        if let Some(cond) = self.unmatched_if(at + 1) {
            return self.fail_expecting(&grammar.conditionals[cond].then_kind);
        }
        self.reduce_to_barrier(grammar);

        let mut separators = Vec::new();
        let depth = loop {
            match self.operators.pop() {
                Some(Pending::Separator { token }) => separators.push(token),
                Some(Pending::Open { depth, .. }) => break depth,
                other => unreachable!("only separators lie above a reduced grouping, found {other:?}"),
            }
        };
        separators.reverse();
        let operands = self.operands.split_off(depth);

        let def = &grammar.sets[set];
        if let Some(validate) = &def.validate {
            if let Some(message) = validate(operands.as_slice(), separators.as_slice()) {
                let failure = Failure::message(self.remainder.clone(), message);
                return self.fail(failure);
            }
        }
        self.push_operand((def.build)(operands, separators), rest)
    }

    /// Ends the expression before the current token.
    /// - Open groupings are reported innermost first, then conditionals without a `then`
    ///   outermost first.
    fn finish(mut self, grammar: &Grammar<K, T>) -> Step<K, T> {
        if let Some((_, set)) = self.innermost_open() {
            return self.fail_expecting(&grammar.sets[set].end);
        }
        if let Some(cond) = self.unmatched_if(0) {
            return self.fail_expecting(&grammar.conditionals[cond].then_kind);
        }
        while !self.operators.is_empty() {
            self.reduce_top(grammar);
        }
        let value = self.pop_operand();
        debug_assert!(self.operands.is_empty(), "a single expression remains");
        Step::Done(ParseResult::value(value, self.input, self.remainder))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Attach {
    Then,
    Else,
}
