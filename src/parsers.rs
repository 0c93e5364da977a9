pub mod lr;
mod stack;
use crate::grammar::Symbol;

/// A source of terminal symbols for a parser
pub trait Lexer {
    /// Reads and returns the next token. Returns [`Symbol::END_OF_INPUT`] at
    /// the end of the input, and [`Symbol::INVALID`] for unrecognized input.
    fn next_token(&mut self) -> Symbol;

    /// Returns the text of the current token
    fn text(&self) -> &str;

    /// Returns the line of the first character of the current token
    fn line(&self) -> usize;

    /// Returns the column of the first character of the current token
    fn column(&self) -> usize;
}

/// A semantic value held on the parser's value stack
pub trait SemanticValue {
    /// Returns the value for a shifted token with the given text
    fn from_lexeme(text: &str) -> Self;
}

impl SemanticValue for String {
    fn from_lexeme(text: &str) -> Self {
        text.to_string()
    }
}
