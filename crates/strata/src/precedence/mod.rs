//! An operator precedence parser for expressions over [`TokenList`]s.
//!
//! The grammar is given as a list of [`Definition`]s:
//! - [`InfixGroup`]: binary operators sharing a precedence and associativity.
//! - [`PrefixGroup`]: unary operators sharing a precedence.
//! - [`ExpressionSet`]: groupings such as `( ... )` or `[a, b, c]`.
//! - [`IfThenElse`]: conditionals `if c then a` and `if c then a else b`.
//!
//! Anything else is parsed by the operand parser. Expressions are parsed by a shift/reduce
//! machine with explicit stacks, so the depth of nesting is limited only by memory.
//!
//! A token may be both an infix and a prefix operator (e.g. `-`), but may not otherwise be used
//! by more than one kind of definition.

use crate::{
    core::BoxedParser, GrammarError, ParseResult, Parser, Token, TokenKind, TokenList, TokenRole,
};
use derive_where::derive_where;
use std::sync::Arc;

mod machine;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

type Binary<T> = Arc<dyn Fn(usize, T, T) -> T + Send + Sync>;
type Unary<T> = Arc<dyn Fn(usize, T) -> T + Send + Sync>;
type SetBuild<K, T> = Arc<dyn Fn(Vec<T>, Vec<Token<K>>) -> T + Send + Sync>;
type SetCheck<K, T> = Arc<dyn Fn(&[T], &[Token<K>]) -> Option<String> + Send + Sync>;

/// Binary operators of the same precedence and associativity.
/// - Each token kind maps to an operator value passed to the builder.
/// - Higher precedences bind tighter.
#[derive_where(Clone; K: Clone)]
pub struct InfixGroup<K, T> {
    precedence: i32,
    associativity: Associativity,
    kinds: Vec<K>,
    build: Binary<T>,
}

impl<K: TokenKind, T> InfixGroup<K, T> {
    pub fn new<O, F>(
        precedence: i32,
        associativity: Associativity,
        operators: impl IntoIterator<Item = (K, O)>,
        build: F,
    ) -> Self
    where
        O: Clone + Send + Sync + 'static,
        F: Fn(O, T, T) -> T + Send + Sync + 'static,
    {
        let (kinds, ops): (Vec<K>, Vec<O>) = operators.into_iter().unzip();
        Self {
            precedence,
            associativity,
            kinds,
            build: Arc::new(move |op, lhs, rhs| build(ops[op].clone(), lhs, rhs)),
        }
    }
}

/// Unary operators of the same precedence, preceding their operand.
#[derive_where(Clone; K: Clone)]
pub struct PrefixGroup<K, T> {
    precedence: i32,
    kinds: Vec<K>,
    build: Unary<T>,
}

impl<K: TokenKind, T> PrefixGroup<K, T> {
    pub fn new<O, F>(precedence: i32, operators: impl IntoIterator<Item = (K, O)>, build: F) -> Self
    where
        O: Clone + Send + Sync + 'static,
        F: Fn(O, T) -> T + Send + Sync + 'static,
    {
        let (kinds, ops): (Vec<K>, Vec<O>) = operators.into_iter().unzip();
        Self {
            precedence,
            kinds,
            build: Arc::new(move |op, operand| build(ops[op].clone(), operand)),
        }
    }
}

/// A grouping of expressions between a start and an end token, optionally separated.
/// ```text
/// ( 1 + 2 )      start `(`, end `)`
/// [ 1, 2, 3 ]    start `[`, end `]`, separated by `,`
/// ```
/// The builder receives the expressions and the separators between them.
#[derive_where(Clone; K: Clone)]
pub struct ExpressionSet<K, T> {
    start: K,
    end: K,
    separators: Vec<K>,
    allow_empty: bool,
    build: SetBuild<K, T>,
    validate: Option<SetCheck<K, T>>,
}

impl<K: TokenKind, T> ExpressionSet<K, T> {
    pub fn new<F>(start: K, end: K, build: F) -> Self
    where
        F: Fn(Vec<T>, Vec<Token<K>>) -> T + Send + Sync + 'static,
    {
        Self {
            start,
            end,
            separators: Vec::new(),
            allow_empty: false,
            build: Arc::new(build),
            validate: None,
        }
    }

    #[must_use]
    pub fn separated_by(mut self, separators: impl IntoIterator<Item = K>) -> Self {
        self.separators.extend(separators);
        self
    }

    /// Accepts `start end`, building from no expressions.
    #[must_use]
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    /// Checks a non-empty grouping when it closes, an error message fails the parse at the end token.
    #[must_use]
    pub fn validated<F>(mut self, validate: F) -> Self
    where
        F: Fn(&[T], &[Token<K>]) -> Option<String> + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(validate));
        self
    }
}

/// A conditional expression, with an optional else branch.
/// - An `else` belongs to the nearest `if` without one.
#[derive_where(Clone; K: Clone)]
pub struct IfThenElse<K, T> {
    if_kind: K,
    then_kind: K,
    else_kind: K,
    if_then_else: Arc<dyn Fn(T, T, T) -> T + Send + Sync>,
    if_then: Arc<dyn Fn(T, T) -> T + Send + Sync>,
}

impl<K: TokenKind, T> IfThenElse<K, T> {
    pub fn new<F, G>(if_kind: K, then_kind: K, else_kind: K, if_then_else: F, if_then: G) -> Self
    where
        F: Fn(T, T, T) -> T + Send + Sync + 'static,
        G: Fn(T, T) -> T + Send + Sync + 'static,
    {
        Self {
            if_kind,
            then_kind,
            else_kind,
            if_then_else: Arc::new(if_then_else),
            if_then: Arc::new(if_then),
        }
    }
}

#[derive_where(Clone; K: Clone)]
pub enum Definition<K, T> {
    Infix(InfixGroup<K, T>),
    Prefix(PrefixGroup<K, T>),
    Set(ExpressionSet<K, T>),
    IfThenElse(IfThenElse<K, T>),
}

impl<K, T> From<InfixGroup<K, T>> for Definition<K, T> {
    fn from(group: InfixGroup<K, T>) -> Self {
        Definition::Infix(group)
    }
}

impl<K, T> From<PrefixGroup<K, T>> for Definition<K, T> {
    fn from(group: PrefixGroup<K, T>) -> Self {
        Definition::Prefix(group)
    }
}

impl<K, T> From<ExpressionSet<K, T>> for Definition<K, T> {
    fn from(set: ExpressionSet<K, T>) -> Self {
        Definition::Set(set)
    }
}

impl<K, T> From<IfThenElse<K, T>> for Definition<K, T> {
    fn from(conditional: IfThenElse<K, T>) -> Self {
        Definition::IfThenElse(conditional)
    }
}

/// The validated definitions, indexed by the machine.
struct Grammar<K, T> {
    infix: Vec<InfixGroup<K, T>>,
    prefix: Vec<PrefixGroup<K, T>>,
    sets: Vec<ExpressionSet<K, T>>,
    conditionals: Vec<IfThenElse<K, T>>,
}

/// Records the role of `kind`, failing if it already has another.
fn claim<K: TokenKind>(
    roles: &mut Vec<(K, TokenRole)>,
    kind: &K,
    role: TokenRole,
) -> Result<(), GrammarError> {
    match roles.iter().find(|(k, _)| k == kind) {
        Some((_, first)) if *first != role => Err(GrammarError::OverlappingToken {
            token: kind.expectation(),
            first: *first,
            second: role,
        }),
        Some(_) => Ok(()),
        None => {
            roles.push((kind.clone(), role));
            Ok(())
        }
    }
}

impl<K: TokenKind, T> Grammar<K, T> {
    fn new(definitions: impl IntoIterator<Item = Definition<K, T>>) -> Result<Self, GrammarError> {
        let mut grammar = Grammar {
            infix: Vec::new(),
            prefix: Vec::new(),
            sets: Vec::new(),
            conditionals: Vec::new(),
        };
        let mut roles = Vec::new();

        for definition in definitions {
            match definition {
                Definition::Infix(group) => {
                    for (i, kind) in group.kinds.iter().enumerate() {
                        if group.kinds[..i].contains(kind) || grammar.infix(kind).is_some() {
                            return Err(GrammarError::DuplicateOperator {
                                token: kind.expectation(),
                                fixity: "infix",
                            });
                        }
                        claim(&mut roles, kind, TokenRole::Operator)?;
                    }
                    grammar.infix.push(group);
                }
                Definition::Prefix(group) => {
                    for (i, kind) in group.kinds.iter().enumerate() {
                        if group.kinds[..i].contains(kind) || grammar.prefix(kind).is_some() {
                            return Err(GrammarError::DuplicateOperator {
                                token: kind.expectation(),
                                fixity: "prefix",
                            });
                        }
                        claim(&mut roles, kind, TokenRole::Operator)?;
                    }
                    grammar.prefix.push(group);
                }
                Definition::Set(set) => {
                    if grammar.set_starting(&set.start).is_some() {
                        return Err(GrammarError::DuplicateGroupStart {
                            token: set.start.expectation(),
                        });
                    }
                    for kind in [&set.start, &set.end].into_iter().chain(&set.separators) {
                        claim(&mut roles, kind, TokenRole::Grouping)?;
                    }
                    grammar.sets.push(set);
                }
                Definition::IfThenElse(conditional) => {
                    let kinds = [&conditional.if_kind, &conditional.then_kind, &conditional.else_kind];
                    for (i, kind) in kinds.iter().enumerate() {
                        let used = kinds[..i].contains(kind)
                            || grammar.conditionals.iter().any(|c| {
                                [&c.if_kind, &c.then_kind, &c.else_kind].contains(kind)
                            });
                        if used {
                            return Err(GrammarError::DuplicateIfToken {
                                token: kind.expectation(),
                            });
                        }
                        claim(&mut roles, kind, TokenRole::IfThenElse)?;
                    }
                    grammar.conditionals.push(conditional);
                }
            }
        }
        Ok(grammar)
    }

    /// The (group, operator) indices of an infix operator.
    fn infix(&self, kind: &K) -> Option<(usize, usize)> {
        self.infix.iter().enumerate().find_map(|(group, g)| {
            g.kinds.iter().position(|k| k == kind).map(|op| (group, op))
        })
    }

    fn prefix(&self, kind: &K) -> Option<(usize, usize)> {
        self.prefix.iter().enumerate().find_map(|(group, g)| {
            g.kinds.iter().position(|k| k == kind).map(|op| (group, op))
        })
    }

    fn set_starting(&self, kind: &K) -> Option<usize> {
        self.sets.iter().position(|s| s.start == *kind)
    }

    fn if_starting(&self, kind: &K) -> Option<usize> {
        self.conditionals.iter().position(|c| c.if_kind == *kind)
    }

    fn then_of(&self, kind: &K) -> Option<usize> {
        self.conditionals.iter().position(|c| c.then_kind == *kind)
    }

    fn else_of(&self, kind: &K) -> Option<usize> {
        self.conditionals.iter().position(|c| c.else_kind == *kind)
    }
}

/// Parses expressions of operands combined by the operators and groupings of its definitions.
/// - Stops (successfully) at the first token that cannot continue the expression, use
///   [`atend`](crate::derived::atend) to require all tokens be consumed.
/// - Failures of the operand parser are returned unchanged.
#[derive_where(Clone)]
pub struct OperatorPrecedence<K: TokenKind, T> {
    operand: BoxedParser<TokenList<K>, T>,
    grammar: Arc<Grammar<K, T>>,
}

impl<K: TokenKind, T> OperatorPrecedence<K, T> {
    /// Validates the definitions, failing if a token is given conflicting roles.
    pub fn new<P>(
        operand: P,
        definitions: impl IntoIterator<Item = Definition<K, T>>,
    ) -> Result<Self, GrammarError>
    where
        P: Parser<TokenList<K>, Output = T> + Send + Sync + 'static,
    {
        Ok(Self {
            operand: operand.boxed(),
            grammar: Arc::new(Grammar::new(definitions)?),
        })
    }
}

impl<K: TokenKind, T> Parser<TokenList<K>> for OperatorPrecedence<K, T> {
    type Output = T;

    fn run(&self, input: TokenList<K>) -> ParseResult<TokenList<K>, T> {
        machine::run(&self.grammar, &self.operand, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{derived::atend, tokens, Presentation, TextSpan};

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub(super) enum Tk {
        Num,
        Ident,
        Plus,
        Minus,
        Star,
        Caret,
        Bang,
        LParen,
        RParen,
        LBracket,
        RBracket,
        Comma,
        If,
        Then,
        Else,
    }

    impl TokenKind for Tk {
        fn presentation(&self) -> Presentation {
            match self {
                Tk::Num => Presentation::described("number"),
                Tk::Ident => Presentation::described("identifier"),
                Tk::Plus => Presentation::example("+").with_category("operator"),
                Tk::Minus => Presentation::example("-").with_category("operator"),
                Tk::Star => Presentation::example("*").with_category("operator"),
                Tk::Caret => Presentation::example("^").with_category("operator"),
                Tk::Bang => Presentation::example("!").with_category("operator"),
                Tk::LParen => Presentation::example("("),
                Tk::RParen => Presentation::example(")"),
                Tk::LBracket => Presentation::example("["),
                Tk::RBracket => Presentation::example("]"),
                Tk::Comma => Presentation::example(","),
                Tk::If => Presentation::example("if").with_category("keyword"),
                Tk::Then => Presentation::example("then").with_category("keyword"),
                Tk::Else => Presentation::example("else").with_category("keyword"),
            }
        }
    }

    /// Tokens are separated by spaces.
    pub(super) fn lex(src: &str) -> TokenList<Tk> {
        let span = TextSpan::new(src);
        let mut tokens = Vec::new();
        let mut rest = span.clone();
        while !rest.is_at_end() {
            if rest.as_str().starts_with(' ') {
                rest = rest.skip(1);
                continue;
            }
            let word = rest.as_str().split(' ').next().unwrap_or_default();
            let kind = match word {
                "+" => Tk::Plus,
                "-" => Tk::Minus,
                "*" => Tk::Star,
                "^" => Tk::Caret,
                "!" => Tk::Bang,
                "(" => Tk::LParen,
                ")" => Tk::RParen,
                "[" => Tk::LBracket,
                "]" => Tk::RBracket,
                "," => Tk::Comma,
                "if" => Tk::If,
                "then" => Tk::Then,
                "else" => Tk::Else,
                w if w.chars().all(|c| c.is_ascii_digit()) => Tk::Num,
                _ => Tk::Ident,
            };
            tokens.push(Token::new(kind, rest.first_bytes(word.len())));
            rest = rest.skip(word.chars().count());
        }
        TokenList::with_end(tokens, span.end_position())
    }

    fn binary(op: &'static str) -> impl Fn(&'static str, String, String) -> String {
        move |_, l, r| format!("({l} {op} {r})")
    }

    /// Builds fully parenthesised strings, so the shape of the tree is visible.
    pub(super) fn grammar() -> Vec<Definition<Tk, String>> {
        vec![
            InfixGroup::new(1, Associativity::Left, [(Tk::Plus, "+"), (Tk::Minus, "-")], |op, l, r| {
                format!("({l} {op} {r})")
            })
            .into(),
            InfixGroup::new(2, Associativity::Left, [(Tk::Star, "*")], binary("*")).into(),
            InfixGroup::new(3, Associativity::Right, [(Tk::Caret, "^")], binary("^")).into(),
            PrefixGroup::new(4, [(Tk::Minus, "-"), (Tk::Bang, "!")], |op, x| format!("{op}{x}"))
                .into(),
            ExpressionSet::new(Tk::LParen, Tk::RParen, |mut xs: Vec<String>, _| {
                xs.pop().unwrap_or_default()
            })
            .into(),
            ExpressionSet::new(Tk::LBracket, Tk::RBracket, |xs: Vec<String>, _| {
                format!("[{}]", xs.join(", "))
            })
            .separated_by([Tk::Comma])
            .allow_empty()
            .into(),
            IfThenElse::new(
                Tk::If,
                Tk::Then,
                Tk::Else,
                |c, a, b| format!("(if {c} then {a} else {b})"),
                |c, a| format!("(if {c} then {a})"),
            )
            .into(),
        ]
    }

    fn operand() -> impl Parser<TokenList<Tk>, Output = String> + Clone {
        crate::core::mapsuc(
            crate::core::or(tokens::eq(Tk::Num), tokens::eq(Tk::Ident)),
            |t: Token<Tk>| t.text().to_owned(),
        )
    }

    pub(super) fn expr() -> OperatorPrecedence<Tk, String> {
        match OperatorPrecedence::new(operand(), grammar()) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        }
    }

    #[test]
    fn precedence_and_associativity() {
        let e = atend(expr());
        assert_eq!(e.parse(lex("1 + 2 * 3")).unwrap(), "(1 + (2 * 3))");
        assert_eq!(e.parse(lex("1 - 2 + 3")).unwrap(), "((1 - 2) + 3)");
        assert_eq!(e.parse(lex("2 ^ 3 ^ 2")).unwrap(), "(2 ^ (3 ^ 2))");
        assert_eq!(e.parse(lex("- 1 * 2")).unwrap(), "(-1 * 2)");
        assert_eq!(e.parse(lex("1 - - 2")).unwrap(), "(1 - -2)");
    }

    #[test]
    fn definitions_are_reusable() {
        let defs = grammar();
        let first = atend(OperatorPrecedence::new(operand(), defs.clone()).unwrap());
        let second = atend(OperatorPrecedence::new(operand(), defs).unwrap());
        let source = lex("[ 1 , - 2 ] * 3");
        assert_eq!(first.parse(source.clone()).unwrap(), "([1, -2] * 3)");
        assert_eq!(second.parse(source).unwrap(), first.parse(lex("[ 1 , - 2 ] * 3")).unwrap());
    }

    #[test]
    fn overlapping_roles() {
        let mut defs = grammar();
        defs.push(ExpressionSet::new(Tk::Plus, Tk::RParen, |_, _| String::new()).into());
        assert_eq!(
            OperatorPrecedence::new(operand(), defs).err(),
            Some(GrammarError::OverlappingToken {
                token: String::from("`+`"),
                first: TokenRole::Operator,
                second: TokenRole::Grouping,
            })
        );

        let mut defs = grammar();
        defs.push(IfThenElse::new(Tk::Comma, Tk::Star, Tk::Bang, |c, _, _| c, |c, _| c).into());
        assert!(matches!(
            OperatorPrecedence::new(operand(), defs),
            Err(GrammarError::OverlappingToken { .. })
        ));
    }

    #[test]
    fn duplicate_definitions() {
        let mut defs = grammar();
        defs.push(InfixGroup::new(9, Associativity::Left, [(Tk::Star, "x")], binary("x")).into());
        assert_eq!(
            OperatorPrecedence::new(operand(), defs).err().map(|e| e.to_string()),
            Some(String::from("token `*` is defined as more than one infix operator"))
        );

        let mut defs = grammar();
        defs.push(ExpressionSet::new(Tk::LParen, Tk::RBracket, |_, _| String::new()).into());
        assert!(matches!(
            OperatorPrecedence::new(operand(), defs),
            Err(GrammarError::DuplicateGroupStart { .. })
        ));

        let defs: Vec<Definition<Tk, String>> =
            vec![IfThenElse::new(Tk::If, Tk::Then, Tk::Then, |c, _, _| c, |c, _| c).into()];
        assert!(matches!(
            OperatorPrecedence::new(operand(), defs),
            Err(GrammarError::DuplicateIfToken { .. })
        ));
    }

    #[test]
    fn infix_and_prefix_share() {
        let defs: Vec<Definition<Tk, String>> = vec![
            InfixGroup::new(1, Associativity::Left, [(Tk::Minus, '-')], |_, l, r| {
                format!("({l} - {r})")
            })
            .into(),
            PrefixGroup::new(2, [(Tk::Minus, '-')], |_, x| format!("-{x}")).into(),
        ];
        let e = OperatorPrecedence::new(operand(), defs);
        assert!(e.is_ok());
    }
}
