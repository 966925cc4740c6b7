//! A small boolean and arithmetic language shared by the integration tests.
//! - [`Calc`] tokenizes source, skipping whitespace.
//! - [`syntax`] parses to an [`Expr`] whose display is fully parenthesised.
//! - [`evaluator`] computes values directly, for comparing with [`strata::chain`].
#![allow(dead_code)]

use std::fmt::{Display, Formatter};
use strata::{
    core::{mapsuc, or},
    derived::many1,
    precedence::{
        Associativity, Definition, ExpressionSet, IfThenElse, InfixGroup, OperatorPrecedence,
        PrefixGroup,
    },
    text::{character, span},
    tokens::{
        self,
        tokenizer::{TokenizationState, Tokenizer},
    },
    Failure, ParseError, ParseResult, Parser, Presentation, TextSpan, Token, TokenKind, TokenList,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tk {
    Number,
    Ident,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Greater,
    Less,
    Equal,
    And,
    Or,
    Not,
    LParen,
    RParen,
    If,
    Then,
    Else,
}

impl TokenKind for Tk {
    fn presentation(&self) -> Presentation {
        match self {
            Tk::Number => Presentation::described("number"),
            Tk::Ident => Presentation::described("identifier"),
            Tk::Plus => Presentation::example("+").with_category("operator"),
            Tk::Minus => Presentation::example("-").with_category("operator"),
            Tk::Star => Presentation::example("*").with_category("operator"),
            Tk::Slash => Presentation::example("/").with_category("operator"),
            Tk::Caret => Presentation::example("^").with_category("operator"),
            Tk::Greater => Presentation::example(">").with_category("operator"),
            Tk::Less => Presentation::example("<").with_category("operator"),
            Tk::Equal => Presentation::example("==").with_category("operator"),
            Tk::And => Presentation::example("&&").with_category("operator"),
            Tk::Or => Presentation::example("||").with_category("operator"),
            Tk::Not => Presentation::example("!").with_category("operator"),
            Tk::LParen => Presentation::example("("),
            Tk::RParen => Presentation::example(")"),
            Tk::If => Presentation::example("if").with_category("keyword"),
            Tk::Then => Presentation::example("then").with_category("keyword"),
            Tk::Else => Presentation::example("else").with_category("keyword"),
        }
    }
}

/// Longest first, so `==` is not read as two tokens.
const SYMBOLS: [(&str, Tk); 13] = [
    ("&&", Tk::And),
    ("||", Tk::Or),
    ("==", Tk::Equal),
    ("+", Tk::Plus),
    ("-", Tk::Minus),
    ("*", Tk::Star),
    ("/", Tk::Slash),
    ("^", Tk::Caret),
    (">", Tk::Greater),
    ("<", Tk::Less),
    ("!", Tk::Not),
    ("(", Tk::LParen),
    (")", Tk::RParen),
];

pub struct Calc;

impl Tokenizer<Tk> for Calc {
    fn scan(
        &self,
        remainder: &TextSpan,
        _: &TokenizationState<Tk>,
    ) -> Option<ParseResult<TextSpan, Tk>> {
        let start = span::whitespace().run(remainder.clone()).remainder().clone();
        if start.is_at_end() {
            return None;
        }

        // numbers take trailing letters too, so `12a` is reported by the number parser
        let word = span::take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_', "word");
        if let ParseResult::Suc(s) = word.run(start.clone()) {
            let text = s.value.as_str();
            let kind = match text {
                "if" => Tk::If,
                "then" => Tk::Then,
                "else" => Tk::Else,
                _ if text.starts_with(|c: char| c.is_ascii_digit()) => Tk::Number,
                _ => Tk::Ident,
            };
            return Some(ParseResult::value(kind, start, s.remainder));
        }

        for (text, kind) in SYMBOLS {
            if let ParseResult::Suc(s) = span::eq(text).run(start.clone()) {
                return Some(ParseResult::value(kind, start, s.remainder));
            }
        }
        Some(ParseResult::Err(Failure::empty(start)))
    }
}

pub fn lex(source: &str) -> TokenList<Tk> {
    match Calc.tokenize_source(source) {
        Ok(tokens) => tokens,
        Err(e) => panic!("{e}"),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Number(i64),
    Var(String),
    Unary(&'static str, Box<Expr>),
    Binary(&'static str, Box<Expr>, Box<Expr>),
    Cond(Box<Expr>, Box<Expr>, Option<Box<Expr>>),
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Var(v) => write!(f, "{v}"),
            Expr::Unary(op, x) => write!(f, "{op}{x}"),
            Expr::Binary(op, l, r) => write!(f, "({l} {op} {r})"),
            Expr::Cond(c, t, Some(e)) => write!(f, "(if {c} then {t} else {e})"),
            Expr::Cond(c, t, None) => write!(f, "(if {c} then {t})"),
        }
    }
}

pub fn number() -> impl Parser<TokenList<Tk>, Output = i64> + Clone + Send + Sync + 'static {
    tokens::apply(
        tokens::eq(Tk::Number),
        mapsuc(many1(character::digit()), |ds: Vec<char>| {
            ds.into_iter()
                .fold(0i64, |n, d| n.saturating_mul(10).saturating_add(i64::from(d as u8 - b'0')))
        }),
    )
}

fn binary(op: &'static str, l: Expr, r: Expr) -> Expr {
    Expr::Binary(op, Box::new(l), Box::new(r))
}

fn infix(
    precedence: i32,
    associativity: Associativity,
    ops: impl IntoIterator<Item = (Tk, &'static str)>,
) -> Definition<Tk, Expr> {
    InfixGroup::new(precedence, associativity, ops, binary).into()
}

pub fn syntax() -> OperatorPrecedence<Tk, Expr> {
    let operand = or(
        mapsuc(number(), Expr::Number),
        mapsuc(tokens::eq(Tk::Ident), |t: Token<Tk>| Expr::Var(t.text().to_owned())),
    );
    let definitions = vec![
        infix(1, Associativity::Left, [(Tk::Or, "||")]),
        infix(2, Associativity::Left, [(Tk::And, "&&")]),
        infix(3, Associativity::Left, [(Tk::Equal, "=="), (Tk::Greater, ">"), (Tk::Less, "<")]),
        infix(4, Associativity::Left, [(Tk::Plus, "+"), (Tk::Minus, "-")]),
        infix(5, Associativity::Left, [(Tk::Star, "*"), (Tk::Slash, "/")]),
        infix(6, Associativity::Right, [(Tk::Caret, "^")]),
        PrefixGroup::new(7, [(Tk::Minus, "-"), (Tk::Not, "!")], |op, x| {
            Expr::Unary(op, Box::new(x))
        })
        .into(),
        ExpressionSet::new(Tk::LParen, Tk::RParen, |mut xs: Vec<Expr>, _| {
            xs.pop().unwrap_or(Expr::Number(0))
        })
        .into(),
        IfThenElse::new(
            Tk::If,
            Tk::Then,
            Tk::Else,
            |c, t, e| Expr::Cond(Box::new(c), Box::new(t), Some(Box::new(e))),
            |c, t| Expr::Cond(Box::new(c), Box::new(t), None),
        )
        .into(),
    ];
    match OperatorPrecedence::new(operand, definitions) {
        Ok(p) => p,
        Err(e) => panic!("{e}"),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Pow,
}

pub fn apply(op: Op, l: i64, r: i64) -> i64 {
    match op {
        Op::Add => l.wrapping_add(r),
        Op::Sub => l.wrapping_sub(r),
        Op::Mul => l.wrapping_mul(r),
        Op::Pow => l.wrapping_pow(u32::try_from(r).unwrap_or_default()),
    }
}

/// Evaluates `+ - * ^` and parentheses.
pub fn evaluator() -> OperatorPrecedence<Tk, i64> {
    let definitions: Vec<Definition<Tk, i64>> = vec![
        InfixGroup::new(1, Associativity::Left, [(Tk::Plus, Op::Add), (Tk::Minus, Op::Sub)], apply)
            .into(),
        InfixGroup::new(2, Associativity::Left, [(Tk::Star, Op::Mul)], apply).into(),
        InfixGroup::new(3, Associativity::Right, [(Tk::Caret, Op::Pow)], apply).into(),
        ExpressionSet::new(Tk::LParen, Tk::RParen, |mut xs: Vec<i64>, _| xs.pop().unwrap_or_default())
            .into(),
    ];
    match OperatorPrecedence::new(number(), definitions) {
        Ok(p) => p,
        Err(e) => panic!("{e}"),
    }
}

pub fn parse(source: &str) -> Result<Expr, ParseError> {
    syntax().parse(lex(source))
}
