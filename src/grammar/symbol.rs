use std::fmt;

/// A grammar symbol. Terminals and non-terminals share one integer space:
/// terminals occupy the low range (literal characters are their own byte
/// value), non-terminals begin at [`Symbol::START`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(pub u32);

impl Symbol {
    /// Returned by a lexer which could not recognize its input
    pub const INVALID: Symbol = Symbol(0);
    /// The end-of-input marker
    pub const END_OF_INPUT: Symbol = Symbol(256);
    /// The start non-terminal, and the lower bound of the non-terminal range
    pub const START: Symbol = Symbol(5000);
    /// The empty string. Appears only in FIRST sets.
    pub const EPSILON: Symbol = Symbol(u32::MAX);

    /// Returns the terminal for a literal character
    pub const fn literal(c: u8) -> Symbol {
        Symbol(c as u32)
    }

    /// Returns the id of the symbol
    pub fn id(self) -> u32 {
        self.0
    }

    pub fn is_terminal(self) -> bool {
        self.0 > 0 && self.0 < Symbol::START.0
    }

    pub fn is_non_terminal(self) -> bool {
        self.0 >= Symbol::START.0 && self != Symbol::EPSILON
    }

    pub fn is_epsilon(self) -> bool {
        self == Symbol::EPSILON
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Symbol::END_OF_INPUT => write!(f, "$"),
            Symbol::EPSILON => write!(f, "ϵ"),
            Symbol::START => write!(f, "start"),
            Symbol(c) if (33..127).contains(&c) => write!(f, "'{}'", c as u8 as char),
            Symbol(n) => write!(f, "#{}", n),
        }
    }
}
