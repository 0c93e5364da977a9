use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// The line and column of a token's first character. Both count from 1.
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new() -> Position {
        Position { line: 1, column: 1 }
    }

    /// Returns the position of a token reported by a lexer
    pub fn at(line: usize, column: usize) -> Position {
        Position { line, column }
    }

    /// Moves past character c. A newline moves to the start of the next
    /// line.
    pub fn advance(&mut self, c: char) {
        if c == '\n' {
            self.column = 1;
            self.line += 1;
        } else {
            self.column += 1;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
