use strata::{
    choices,
    core::{backtrack, mapsuc, named, not, or, reference, seq, BoxedParser},
    derived::{atend, between, many0, many1, many_delimited_by, optional, sequence, thenignore},
    seqs,
    text::{character, span},
    Cursor, ParseResult, Parser, TextSpan,
};

fn keyword(word: &'static str) -> impl Parser<TextSpan, Output = &'static str> + Clone {
    mapsuc(span::eq(word), move |_: TextSpan| word)
}

#[test]
fn alternation_commits_after_consuming() {
    let p = or(keyword("let"), keyword("loop"));
    assert_eq!(
        p.parse("loop").unwrap_err().message,
        "Syntax error (line 1, column 2): unexpected `o`, expected `e`."
    );

    let p = or(backtrack(keyword("let")), keyword("loop"));
    assert_eq!(p.parse("loop").unwrap(), "loop");
}

#[test]
fn alternation_merges_clean_failures() {
    let digit = mapsuc(character::digit(), |_: char| "digit");
    let p = choices!(keyword("let"), keyword("fn"), named(digit, "number"));
    assert_eq!(
        p.parse("x").unwrap_err().message,
        "Syntax error (line 1, column 1): unexpected `x`, expected `let`, `fn` or number."
    );
}

#[test]
fn backtracked_failures_rewind() {
    let p = or(backtrack(keyword("let")), backtrack(keyword("lex")));
    match p.run(TextSpan::new("lox")) {
        ParseResult::Err(e) => {
            assert_eq!(e.remainder.position().column, 1);
            assert!(e.backtrack);
        }
        ParseResult::Suc(s) => panic!("parsed {}", s.value),
    }
}

#[test]
fn lists_and_optionals() {
    let number = mapsuc(many1(character::digit()), |ds: Vec<char>| {
        ds.into_iter().collect::<String>()
    });
    let list = between(
        character::eq('['),
        many_delimited_by(number.clone(), seq(character::eq(','), span::whitespace())),
        character::eq(']'),
    );
    assert_eq!(list.parse("[1, 22,333]").unwrap(), vec!["1", "22", "333"]);
    assert_eq!(list.parse("[]").unwrap(), Vec::<String>::new());
    assert_eq!(
        list.parse("[1, ]").unwrap_err().message,
        "Syntax error (line 1, column 5): unexpected `]`, expected digit."
    );

    let signed = seq(optional(character::eq('-')), number);
    assert_eq!(signed.parse("-12").unwrap(), (Some('-'), String::from("12")));
    assert_eq!(signed.parse("12").unwrap(), (None, String::from("12")));
}

#[test]
fn remainder_follows_consumed_input() {
    let p = seqs!(character::letter(), many0(character::letter_or_digit()), span::whitespace());
    match p.run(TextSpan::new("abc12  + 1")) {
        ParseResult::Suc(s) => {
            assert_eq!(s.location.as_str(), "abc12  + 1");
            assert_eq!(s.remainder.as_str(), "+ 1");
            assert_eq!(s.location.text_until(&s.remainder), "abc12  ");
        }
        ParseResult::Err(e) => panic!("{e}"),
    }
}

#[test]
fn repetition_resumes_from_remainder() {
    let word = || {
        mapsuc(
            thenignore(span::take_while1(char::is_alphabetic, "letter"), span::whitespace()),
            |s: TextSpan| s.as_str().to_owned(),
        )
    };
    let input = TextSpan::new("one two  three");
    let whole = many0(word()).parse(input.clone()).unwrap();
    match word().run(input.clone()) {
        ParseResult::Suc(first) => {
            let rest = many0(word()).parse(first.remainder).unwrap();
            assert_eq!([vec![first.value], rest].concat(), whole);
        }
        ParseResult::Err(e) => panic!("{e}"),
    }
    let (head, tail) = seq(word(), many0(word())).parse(input).unwrap();
    assert_eq!(head, whole[0]);
    assert_eq!(tail, whole[1..]);
}

#[test]
fn negative_lookahead() {
    let ident = sequence((
        not(keyword("if")),
        span::take_while1(char::is_alphanumeric, "identifier"),
    ));
    assert_eq!(
        ident.parse("iffy").unwrap_err().message,
        "Syntax error (line 1, column 1): unexpected successful parsing of `if`."
    );
    assert_eq!(ident.parse("xif").unwrap().1.as_str(), "xif");
}

#[test]
fn recursive_grammars() {
    fn list() -> BoxedParser<TextSpan, usize> {
        or(
            mapsuc(
                between(character::eq('('), many0(reference(list)), character::eq(')')),
                |items: Vec<usize>| items.into_iter().sum::<usize>() + 1,
            ),
            mapsuc(character::letter(), |_: char| 0usize),
        )
        .boxed()
    }
    let whole = atend(list());
    assert_eq!(whole.parse("(a(b)((c))d)").unwrap(), 4);
    assert_eq!(
        whole.parse("(a(b)").unwrap_err().message,
        "Syntax error (line 1, column 6): unexpected end of input, expected `)`."
    );
}

#[test]
#[should_panic(expected = "without consuming input")]
fn zero_width_repetition() {
    let _ = many0(span::whitespace()).parse("x");
}
