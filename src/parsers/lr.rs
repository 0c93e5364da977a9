pub mod clr;
mod config;
pub mod items;
use super::stack::Stack;
use super::{Lexer, SemanticValue};
use crate::errors::{Error, Result};
use crate::grammar::{Grammar, Symbol};
use clr::{Action, Conflict, ParseTable};
pub use config::ParserConfig;
use items::Automaton;
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The answer of an error handler
pub enum Recovery {
    /// Fail the parse
    Abort,
    /// Look up the action for the (possibly replaced) lookahead again
    Retry,
}

/// Called when the parser has no action for the lookahead. Receives the
/// values above the start state, the terminals acceptable in the current
/// state, the lookahead, which it may replace, and the lexer.
pub type ErrorHandler<V> =
    Box<dyn Fn(&mut [V], &[Symbol], &mut Symbol, &mut dyn Lexer) -> Recovery + Send + Sync>;

/// A canonical LR parser. The automaton and tables are built once, on
/// construction; each call to parse uses its own stacks, so one parser may
/// be shared between threads.
pub struct Parser<V> {
    grammar: Grammar<V>,
    automaton: Automaton,
    table: ParseTable,
    config: ParserConfig,
    error_handler: Option<ErrorHandler<V>>,
}

impl<V> Parser<V> {
    /// Creates a new parser for a grammar. Conflicts found while building
    /// the parse table are recorded rather than returned; check
    /// [`Parser::has_conflicts`] before parsing.
    pub fn new(grammar: Grammar<V>) -> Parser<V> {
        Parser::with_config(grammar, ParserConfig::default())
    }

    /// Creates a new parser with the given settings
    pub fn with_config(grammar: Grammar<V>, config: ParserConfig) -> Parser<V> {
        let automaton = Automaton::new(&grammar);
        let table = ParseTable::new(&grammar, &automaton);

        Parser {
            grammar,
            automaton,
            table,
            config,
            error_handler: None,
        }
    }

    /// Installs a handler to be called on syntax errors
    pub fn set_error_handler<F>(&mut self, handler: F)
    where
        F: Fn(&mut [V], &[Symbol], &mut Symbol, &mut dyn Lexer) -> Recovery
            + Send
            + Sync
            + 'static,
    {
        self.error_handler = Some(Box::new(handler));
    }

    pub fn grammar(&self) -> &Grammar<V> {
        &self.grammar
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn table(&self) -> &ParseTable {
        &self.table
    }

    /// Returns every conflict found while building the parse table
    pub fn conflicts(&self) -> &[Conflict] {
        self.table.conflicts()
    }

    /// Returns true if the parse table is unusable
    pub fn has_conflicts(&self) -> bool {
        self.table.has_conflicts()
    }
}

impl<V: SemanticValue> Parser<V> {
    /// Parses the tokens produced by lexer, returning the value built by
    /// the join function of the last production reduced
    #[instrument(level = "debug", skip_all)]
    pub fn parse(&self, lexer: &mut dyn Lexer) -> Result<V> {
        // Algorithm adapted from Aho et al (2007) p.251
        if self.table.has_conflicts() {
            return Err(Error::GrammarConflict);
        }

        let mut stack = Stack::new(self.config.initial_stack_capacity, V::from_lexeme(""));
        let mut token = lexer.next_token();
        let mut retries = 0;

        loop {
            match self.table.action(stack.peek_state(), token) {
                Action::Shift(state) => {
                    trace!(state, %token, "shift");
                    stack.push(state, V::from_lexeme(lexer.text()));
                    token = lexer.next_token();
                    retries = 0;
                }
                Action::Reduce(p) => {
                    self.reduce(p, &mut stack)?;
                }
                Action::Accept => {
                    let depth = stack.depth();
                    return match stack.into_top() {
                        Some(value) if depth == 2 => Ok(value),
                        _ => Err(Error::IncompleteParse { depth }),
                    };
                }
                Action::Error => {
                    let expected = self.table.expected(stack.peek_state());

                    let recovery = match &self.error_handler {
                        Some(handler) if retries < self.config.max_recovery_attempts => {
                            handler(stack.values_mut(), &expected, &mut token, lexer)
                        }
                        _ => Recovery::Abort,
                    };

                    if recovery == Recovery::Abort {
                        let e = Error::Syntax {
                            line: lexer.line(),
                            column: lexer.column(),
                            lexeme: lexer.text().to_string(),
                            token,
                            expected,
                        };
                        debug!("{}", e);
                        return Err(e);
                    }
                    retries += 1;
                }
            }
        }
    }

    /// Reduces the production with the given id, replacing its body's
    /// entries on the stack with the result of its join function
    fn reduce(&self, p: usize, stack: &mut Stack<V>) -> Result<()> {
        let production = self.grammar.production(p);
        trace!(production = p, "reduce");

        let values = stack.pop(production.body.len());
        let state = stack.peek_state();
        let Some(next) = self.table.goto(state, production.head) else {
            return Err(Error::MissingGoto {
                state,
                symbol: production.head,
            });
        };

        stack.push(next, (production.join)(values));
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::grammar::Production;
    use std::sync::{Arc, Mutex};

    const E: Symbol = Symbol(5001);
    const T: Symbol = Symbol(5002);
    const PLUS: Symbol = Symbol::literal(b'+');
    const NUM: Symbol = Symbol::literal(b'n');

    /// A lexer over a fixed list of tokens, one per column
    struct TokenList {
        tokens: Vec<(Symbol, String)>,
        current: usize,
    }

    impl TokenList {
        fn new(input: &str) -> TokenList {
            let tokens = input
                .chars()
                .map(|c| match c {
                    '0'..='9' => (NUM, c.to_string()),
                    '+' | 'x' | 'a' | 'b' => (Symbol::literal(c as u8), c.to_string()),
                    _ => (Symbol::INVALID, c.to_string()),
                })
                .collect();
            TokenList { tokens, current: 0 }
        }
    }

    impl Lexer for TokenList {
        fn next_token(&mut self) -> Symbol {
            self.current += 1;
            self.tokens
                .get(self.current - 1)
                .map_or(Symbol::END_OF_INPUT, |t| t.0)
        }

        fn text(&self) -> &str {
            self.tokens
                .get(self.current.wrapping_sub(1))
                .map_or("", |t| t.1.as_str())
        }

        fn line(&self) -> usize {
            1
        }

        fn column(&self) -> usize {
            self.current
        }
    }

    fn keep(mut v: Vec<String>) -> String {
        v.pop().unwrap_or_default()
    }

    /// start → E; E → E '+' T | T; T → 'n'
    fn expr_grammar(log: Arc<Mutex<Vec<usize>>>) -> Grammar<String> {
        let logged = |id: usize, log: Arc<Mutex<Vec<usize>>>, f: fn(Vec<String>) -> String| {
            move |v: Vec<String>| {
                log.lock().unwrap().push(id);
                f(v)
            }
        };

        Grammar::new(vec![
            Production::new(Symbol::START, vec![E], keep),
            Production::new(
                E,
                vec![E, PLUS, T],
                logged(1, log.clone(), |v| format!("({}+{})", v[0], v[2])),
            ),
            Production::new(E, vec![T], logged(2, log.clone(), keep)),
            Production::new(T, vec![NUM], logged(3, log, keep)),
        ])
        .unwrap()
    }

    #[test]
    fn test_left_associative() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let parser = Parser::new(expr_grammar(log.clone()));
        assert!(!parser.has_conflicts());

        assert_eq!(parser.parse(&mut TokenList::new("1+2+3"))?, "((1+2)+3)");
        assert_eq!(*log.lock().unwrap(), vec![3, 2, 3, 1, 3, 1]);

        assert_eq!(parser.parse(&mut TokenList::new("7"))?, "7");

        Ok(())
    }

    #[test]
    fn test_deterministic() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let parser = Parser::new(expr_grammar(Arc::new(Mutex::new(Vec::new()))));
        let first = parser.parse(&mut TokenList::new("1+2+3+4"))?;
        let second = parser.parse(&mut TokenList::new("1+2+3+4"))?;
        assert_eq!(first, second);

        Ok(())
    }

    #[test]
    fn test_syntax_error() {
        let parser = Parser::new(expr_grammar(Arc::new(Mutex::new(Vec::new()))));

        assert_eq!(
            parser.parse(&mut TokenList::new("1++2")),
            Err(Error::Syntax {
                line: 1,
                column: 3,
                lexeme: "+".to_string(),
                token: PLUS,
                expected: vec![NUM],
            })
        );

        assert_eq!(
            parser.parse(&mut TokenList::new("1+")),
            Err(Error::Syntax {
                line: 1,
                column: 3,
                lexeme: String::new(),
                token: Symbol::END_OF_INPUT,
                expected: vec![NUM],
            })
        );

        assert!(matches!(
            parser.parse(&mut TokenList::new("")),
            Err(Error::Syntax { expected, .. }) if expected == vec![NUM]
        ));
    }

    #[test]
    fn test_error_handler_retry() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut parser = Parser::new(expr_grammar(Arc::new(Mutex::new(Vec::new()))));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = seen.clone();
        parser.set_error_handler(move |values, expected, token, _| {
            record
                .lock()
                .unwrap()
                .push((values.to_vec(), expected.to_vec()));
            if *token == Symbol::INVALID {
                *token = NUM;
                Recovery::Retry
            } else {
                Recovery::Abort
            }
        });

        assert_eq!(parser.parse(&mut TokenList::new("1+?"))?, "(1+?)");
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(vec!["1".to_string(), "+".to_string()], vec![NUM])]
        );

        assert!(matches!(
            parser.parse(&mut TokenList::new("1+2+")),
            Err(Error::Syntax { column: 5, .. })
        ));

        Ok(())
    }

    #[test]
    fn test_error_handler_bounded() {
        let config = ParserConfig {
            max_recovery_attempts: 3,
            ..ParserConfig::default()
        };
        let mut parser = Parser::with_config(expr_grammar(Arc::new(Mutex::new(Vec::new()))), config);
        let calls = Arc::new(Mutex::new(0));
        let count = calls.clone();
        parser.set_error_handler(move |_, _, _, _| {
            *count.lock().unwrap() += 1;
            Recovery::Retry
        });

        assert!(matches!(
            parser.parse(&mut TokenList::new("1?")),
            Err(Error::Syntax { .. })
        ));
        assert_eq!(*calls.lock().unwrap(), 3);
    }

    #[test]
    fn test_empty_reductions() -> std::result::Result<(), Box<dyn std::error::Error>> {
        // start → L; L → L A 'x' | ϵ; A → ϵ
        let l = Symbol(5001);
        let a = Symbol(5002);
        let x = Symbol::literal(b'x');
        let g = Grammar::new(vec![
            Production::new(Symbol::START, vec![l], keep),
            Production::new(l, vec![l, a, x], |v: Vec<String>| format!("{}{}", v[0], v[2])),
            Production::new(l, vec![], |_| String::new()),
            Production::new(a, vec![], |_| String::new()),
        ])?;
        let config = ParserConfig {
            initial_stack_capacity: 1,
            ..ParserConfig::default()
        };
        let parser = Parser::with_config(g, config);
        assert!(!parser.has_conflicts());

        assert_eq!(parser.parse(&mut TokenList::new("xxxxx"))?, "xxxxx");
        assert_eq!(parser.parse(&mut TokenList::new(""))?, "");

        Ok(())
    }

    #[test]
    fn test_incomplete_accept() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let g = Grammar::new(vec![Production::new(
            Symbol::START,
            vec![Symbol::literal(b'a'), Symbol::literal(b'b')],
            keep,
        )])?;
        let parser = Parser::new(g);

        assert_eq!(
            parser.parse(&mut TokenList::new("ab")),
            Err(Error::IncompleteParse { depth: 3 })
        );

        Ok(())
    }

    #[test]
    fn test_conflicted_grammar() -> std::result::Result<(), Box<dyn std::error::Error>> {
        // start → E; E → A | B; A → 'a'; B → 'a'
        let a = Symbol(5003);
        let b = Symbol(5004);
        let g = Grammar::new(vec![
            Production::new(Symbol::START, vec![E], keep),
            Production::new(E, vec![a], keep),
            Production::new(E, vec![b], keep),
            Production::new(a, vec![Symbol::literal(b'a')], keep),
            Production::new(b, vec![Symbol::literal(b'a')], keep),
        ])?;
        let parser = Parser::new(g);

        assert!(parser.has_conflicts());
        assert_eq!(
            parser.parse(&mut TokenList::new("a")),
            Err(Error::GrammarConflict)
        );

        Ok(())
    }
}
