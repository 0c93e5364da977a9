use super::token::{self, EQUALS, FUNC, SEMICOLON, TOK, VAR};
use super::Symbol;
use crate::parsers::Lexer;
use crate::position::Position;

/// A lexer for the grammar description language
pub struct GrammarLexer {
    input: Vec<char>,
    cursor: usize,
    position: Position,
    start: Position,
    text: String,
}

impl GrammarLexer {
    /// Returns a new lexer for the given input string
    pub fn new(input: &str) -> GrammarLexer {
        GrammarLexer {
            input: input.chars().collect(),
            cursor: 0,
            position: Position::new(),
            start: Position::new(),
            text: String::new(),
        }
    }

    /// Returns the lookahead character
    fn lookahead(&self) -> Option<char> {
        self.input.get(self.cursor).copied()
    }

    /// Reads the next character
    fn read(&mut self) -> Option<char> {
        let c = self.lookahead()?;
        self.cursor += 1;
        self.position.advance(c);
        Some(c)
    }

    /// Reads and discards blanks and comments
    fn discard_comments_and_whitespace(&mut self) {
        while let Some(c) = self.lookahead() {
            match c {
                ' ' | '\t' | '\n' | '\r' => {
                    self.read();
                }
                '#' => {
                    while let Some(c) = self.read() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => break,
            }
        }
    }

    /// Returns true if the next character which is not a blank or part of
    /// a comment is '='
    fn equals_follows(&self) -> bool {
        let mut rest = self.input[self.cursor..].iter();
        while let Some(&c) = rest.next() {
            match c {
                ' ' | '\t' | '\n' | '\r' => (),
                '#' => {
                    for &c in rest.by_ref() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                c => return c == '=',
            }
        }
        false
    }

    /// Lexes a name: a bare identifier, or one prefixed with '$' or '&'
    fn lex_name(&mut self) -> Symbol {
        let kind = match self.lookahead() {
            Some('$') => {
                self.read();
                VAR
            }
            Some('&') => {
                self.read();
                FUNC
            }
            _ => TOK,
        };

        while let Some(c) = self.lookahead() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }
            self.text.push(c);
            self.read();
        }

        if self.text.is_empty() {
            return Symbol::INVALID;
        }
        if kind != TOK {
            return kind;
        }

        if let Some(word) = token::reserved(&self.text) {
            word
        } else if self.equals_follows() {
            VAR
        } else {
            TOK
        }
    }

    /// Lexes a quoted single character
    fn lex_quoted(&mut self) -> Symbol {
        self.read();
        match self.read() {
            Some(c) if c != '\n' => self.text.push(c),
            _ => return Symbol::INVALID,
        }

        if self.lookahead() == Some('\'') {
            self.read();
            TOK
        } else {
            Symbol::INVALID
        }
    }
}

impl Lexer for GrammarLexer {
    fn next_token(&mut self) -> Symbol {
        self.discard_comments_and_whitespace();
        self.start = self.position;
        self.text.clear();

        let Some(c) = self.lookahead() else {
            return Symbol::END_OF_INPUT;
        };

        match c {
            '=' | ';' => {
                self.read();
                self.text.push(c);
                if c == '=' {
                    EQUALS
                } else {
                    SEMICOLON
                }
            }
            '\'' => self.lex_quoted(),
            '$' | '&' => self.lex_name(),
            _ if c.is_ascii_alphabetic() => self.lex_name(),
            _ => {
                self.read();
                self.text.push(c);
                Symbol::INVALID
            }
        }
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn line(&self) -> usize {
        self.start.line
    }

    fn column(&self) -> usize {
        self.start.column
    }
}
