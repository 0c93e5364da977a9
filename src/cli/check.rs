use super::common::Session;
use super::words::WordLexer;
use crate::errors::{Error, Result};
use crate::position::Position;

/// Parses a file of whitespace-separated token names and outputs the tree
/// built by the grammar's join functions
pub fn output(session: &Session, path: &str, indent: usize) -> Result<()> {
    let input = std::fs::read_to_string(path)?;
    let mut lexer = WordLexer::new(&input, &session.tokens);

    match session.parser.parse(&mut lexer) {
        Ok(tree) => {
            print!("{}", tree.render(indent));
            Ok(())
        }
        Err(Error::Syntax {
            line,
            column,
            lexeme,
            expected,
            ..
        }) => {
            eprintln!(
                "{}:{}: unexpected '{}', expected one of: {}",
                path,
                Position::at(line, column),
                lexeme,
                session.format_symbols(&expected)
            );
            std::process::exit(1);
        }
        Err(e) => Err(e),
    }
}
