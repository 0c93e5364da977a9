#![allow(dead_code)]
use lrgen::grammar::loader::TokenMap;
use lrgen::grammar::Symbol;
use lrgen::parsers::Lexer;

pub const OPEN: Symbol = Symbol(300);
pub const END: Symbol = Symbol(301);
pub const CLOSE: Symbol = Symbol(302);
pub const SLASH: Symbol = Symbol(303);
pub const IDENT: Symbol = Symbol(304);
pub const LITERAL: Symbol = Symbol(305);
pub const EQUALS: Symbol = Symbol::literal(b'=');

/// Helper function to read in an entire test data file
pub fn read_test_file(filename: &str) -> String {
    std::fs::read_to_string(test_file_path(filename)).expect("failed to read test file")
}

/// Helper function to get an valid path to a test file in the testdata directory
pub fn test_file_path(filename: &str) -> String {
    let mut p = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push(format!("tests/testdata/{}", filename));

    p.into_os_string()
        .into_string()
        .expect("failed to build filename")
}

/// Returns the token names used by the scene grammar
pub fn scene_tokens() -> TokenMap {
    TokenMap::from([
        ("OPEN".to_string(), OPEN),
        ("END".to_string(), END),
        ("CLOSE".to_string(), CLOSE),
        ("SLASH".to_string(), SLASH),
        ("IDENT".to_string(), IDENT),
        ("LITERAL".to_string(), LITERAL),
        ("=".to_string(), EQUALS),
    ])
}

/// A lexer for scene descriptions written as tags with quoted attribute
/// values. Lines and columns are counted from 1.
pub struct SceneLexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    token_line: usize,
    token_column: usize,
    text: String,
}

impl SceneLexer {
    pub fn new(input: &str) -> SceneLexer {
        SceneLexer {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            token_line: 1,
            token_column: 1,
            text: String::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }
}

impl Lexer for SceneLexer {
    fn next_token(&mut self) -> Symbol {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }

        self.token_line = self.line;
        self.token_column = self.column;
        self.text.clear();

        let Some(c) = self.bump() else {
            return Symbol::END_OF_INPUT;
        };
        self.text.push(c);

        match c {
            '<' if self.peek() == Some('/') => {
                self.bump();
                self.text.push('/');
                END
            }
            '<' => OPEN,
            '>' => CLOSE,
            '/' => SLASH,
            '=' => EQUALS,
            '"' => {
                self.text.clear();
                loop {
                    match self.bump() {
                        Some('"') => return LITERAL,
                        Some(c) => self.text.push(c),
                        None => return Symbol::INVALID,
                    }
                }
            }
            c if c.is_ascii_alphabetic() => {
                while let Some(c) = self.peek().filter(|c| c.is_ascii_alphanumeric()) {
                    self.bump();
                    self.text.push(c);
                }
                IDENT
            }
            _ => Symbol::INVALID,
        }
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn line(&self) -> usize {
        self.token_line
    }

    fn column(&self) -> usize {
        self.token_column
    }
}
