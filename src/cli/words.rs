use crate::grammar::loader::TokenMap;
use crate::grammar::Symbol;
use crate::parsers::Lexer;
use crate::position::Position;

/// A lexer for input written as whitespace-separated token names. A name
/// which is not in the token map is returned as [`Symbol::INVALID`].
pub struct WordLexer {
    words: Vec<(Symbol, String, Position)>,
    end: Position,
    current: usize,
}

impl WordLexer {
    pub fn new(input: &str, tokens: &TokenMap) -> WordLexer {
        let mut words = Vec::new();
        let mut pos = Position::new();
        let mut word = String::new();
        let mut start = pos;

        for c in input.chars() {
            if c.is_whitespace() {
                if !word.is_empty() {
                    words.push(lookup(std::mem::take(&mut word), start, tokens));
                }
            } else {
                if word.is_empty() {
                    start = pos;
                }
                word.push(c);
            }
            pos.advance(c);
        }
        if !word.is_empty() {
            words.push(lookup(word, start, tokens));
        }

        WordLexer {
            words,
            end: pos,
            current: 0,
        }
    }

    fn word(&self) -> Option<&(Symbol, String, Position)> {
        self.current.checked_sub(1).and_then(|i| self.words.get(i))
    }

    fn position(&self) -> Position {
        self.word().map_or(self.end, |w| w.2)
    }
}

fn lookup(word: String, pos: Position, tokens: &TokenMap) -> (Symbol, String, Position) {
    let symbol = tokens.get(&word).copied().unwrap_or(Symbol::INVALID);
    (symbol, word, pos)
}

impl Lexer for WordLexer {
    fn next_token(&mut self) -> Symbol {
        if self.current <= self.words.len() {
            self.current += 1;
        }
        self.word().map_or(Symbol::END_OF_INPUT, |w| w.0)
    }

    fn text(&self) -> &str {
        self.word().map_or("", |w| w.1.as_str())
    }

    fn line(&self) -> usize {
        self.position().line
    }

    fn column(&self) -> usize {
        self.position().column
    }
}
