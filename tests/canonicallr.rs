use lrgen::errors::Error;
use lrgen::grammar::{Grammar, Production, Symbol};
use lrgen::parsers::lr::clr::Action;
use lrgen::parsers::lr::{Parser, ParserConfig};
use lrgen::parsers::Lexer;

const S: Symbol = Symbol(5001);
const C: Symbol = Symbol(5002);
const LC: Symbol = Symbol::literal(b'c');
const LD: Symbol = Symbol::literal(b'd');

/// A lexer returning each non-blank character as a literal token
struct CharLexer {
    chars: Vec<char>,
    current: usize,
}

impl CharLexer {
    fn new(input: &str) -> CharLexer {
        CharLexer {
            chars: input.chars().filter(|c| !c.is_whitespace()).collect(),
            current: 0,
        }
    }
}

impl Lexer for CharLexer {
    fn next_token(&mut self) -> Symbol {
        self.current += 1;
        match self.chars.get(self.current - 1) {
            Some(&c) if c.is_ascii() => Symbol::literal(c as u8),
            Some(_) => Symbol::INVALID,
            None => Symbol::END_OF_INPUT,
        }
    }

    fn text(&self) -> &str {
        ""
    }

    fn line(&self) -> usize {
        1
    }

    fn column(&self) -> usize {
        self.current
    }
}

/// The grammar S → C C, C → c C | d from Aho et al (2007), with joins
/// that bracket each production
fn aho() -> Grammar<String> {
    Grammar::new(vec![
        Production::new(Symbol::START, vec![S], |mut v: Vec<String>| {
            v.pop().unwrap_or_default()
        }),
        Production::new(S, vec![C, C], |v: Vec<String>| {
            format!("S({},{})", v[0], v[1])
        }),
        Production::new(C, vec![LC, C], |v: Vec<String>| format!("c{}", v[1])),
        Production::new(C, vec![LD], |_| "d".to_string()),
    ])
    .expect("valid grammar")
}

#[test]
fn test_parser() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let parser = Parser::new(aho());
    assert!(!parser.has_conflicts());
    assert_eq!(parser.automaton().len(), 10);
    assert_eq!(parser.table().num_states(), 10);

    assert_eq!(parser.parse(&mut CharLexer::new("dd"))?, "S(d,d)");
    assert_eq!(parser.parse(&mut CharLexer::new("c c d c d"))?, "S(ccd,cd)");

    assert_eq!(
        parser.parse(&mut CharLexer::new("cdc")),
        Err(Error::Syntax {
            line: 1,
            column: 4,
            lexeme: "".to_string(),
            token: Symbol::END_OF_INPUT,
            expected: vec![LC, LD],
        })
    );
    assert!(matches!(
        parser.parse(&mut CharLexer::new("dx")),
        Err(Error::Syntax {
            token: t,
            ..
        }) if t == Symbol::literal(b'x')
    ));

    Ok(())
}

#[test]
fn test_table() {
    let parser = Parser::new(aho());
    let table = parser.table();

    assert_eq!(table.action(0, LC), Action::Shift(1));
    assert_eq!(table.action(0, LD), Action::Shift(2));
    assert_eq!(table.action(0, Symbol::END_OF_INPUT), Action::Error);
    assert_eq!(table.action(3, Symbol::END_OF_INPUT), Action::Accept);
    assert_eq!(table.action(2, LC), Action::Reduce(3));
    assert_eq!(table.action(2, Symbol::END_OF_INPUT), Action::Error);
    assert_eq!(table.goto(0, S), Some(3));
    assert_eq!(table.goto(0, C), Some(4));
    assert_eq!(table.goto(2, C), None);

    // Unknown terminals never have an action
    assert_eq!(table.action(0, Symbol::INVALID), Action::Error);
    assert_eq!(table.action(0, Symbol::literal(b'z')), Action::Error);
}

#[test]
fn test_small_stack() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = ParserConfig {
        initial_stack_capacity: 1,
        ..ParserConfig::default()
    };
    let parser = Parser::with_config(aho(), config);

    let input = "c".repeat(50) + "d d";
    let got = parser.parse(&mut CharLexer::new(&input))?;
    assert_eq!(got, format!("S({}d,d)", "c".repeat(50)));

    Ok(())
}

#[test]
fn test_shared_between_threads() {
    let parser = Parser::new(aho());

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let parser = &parser;
                scope.spawn(move || {
                    let input = "c".repeat(n) + "dd";
                    parser.parse(&mut CharLexer::new(&input))
                })
            })
            .collect();

        for (n, h) in handles.into_iter().enumerate() {
            let got = h.join().expect("thread panicked");
            assert_eq!(got, Ok(format!("S({}d,d)", "c".repeat(n))));
        }
    });
}
