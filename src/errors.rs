use crate::grammar::Symbol;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("grammar contains no productions")]
    EmptyGrammar,
    #[error("grammar contains no start production")]
    NoStartProduction,
    #[error("grammar contains more than one start production")]
    MultipleStartProductions,
    #[error("production {production}: head {head} is not a non-terminal")]
    InvalidHead { production: usize, head: Symbol },
    #[error("production {production}: invalid body symbol {symbol}")]
    InvalidSymbol { production: usize, symbol: Symbol },
    #[error("production {production}: body has {len} symbols, maximum is {max}")]
    ProductionTooLong {
        production: usize,
        len: usize,
        max: usize,
    },
    #[error("parse tables contain unresolved conflicts")]
    GrammarConflict,
    #[error("syntax error at line {line}, column {column}: unexpected '{lexeme}'")]
    Syntax {
        line: usize,
        column: usize,
        lexeme: String,
        token: Symbol,
        expected: Vec<Symbol>,
    },
    #[error("input accepted with {depth} stack entries")]
    IncompleteParse { depth: usize },
    #[error("no goto for {symbol} in state {state}")]
    MissingGoto { state: usize, symbol: Symbol },
    #[error("invalid grammar file: {0}")]
    InvalidGrammarFile(String),
    #[error("{0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}
