//! Terminals of the grammar description language

use super::Symbol;

pub const EQUALS: Symbol = Symbol::literal(b'=');
pub const SEMICOLON: Symbol = Symbol::literal(b';');

/// A non-terminal: `$name`, or a bare name introducing a production
pub const VAR: Symbol = Symbol(259);
/// A token name: a bare name, or a quoted single character
pub const TOK: Symbol = Symbol(260);
pub const ALL: Symbol = Symbol(261);
pub const REDUCE: Symbol = Symbol(262);
pub const SHIFT: Symbol = Symbol(263);
/// A join function: `&name`
pub const FUNC: Symbol = Symbol(264);

/// Returns the reserved word token for name, if it is one
pub fn reserved(name: &str) -> Option<Symbol> {
    match name {
        "ALL" => Some(ALL),
        "REDUCE" => Some(REDUCE),
        "SHIFT" => Some(SHIFT),
        _ => None,
    }
}

/// Returns a readable name for a token of the grammar description language
pub fn name(token: Symbol) -> String {
    match token {
        VAR => "variable".to_string(),
        TOK => "token".to_string(),
        ALL => "ALL".to_string(),
        REDUCE => "REDUCE".to_string(),
        SHIFT => "SHIFT".to_string(),
        FUNC => "function".to_string(),
        Symbol::END_OF_INPUT => "end of input".to_string(),
        t => t.to_string(),
    }
}
