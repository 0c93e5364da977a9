use super::tree::Tree;
use crate::errors::{Error, Result};
use crate::grammar::lexer::GrammarLexer;
use crate::grammar::loader::{self, JoinMap, LoadDiagnostic, TokenMap};
use crate::grammar::token::{self, FUNC, TOK};
use crate::grammar::Symbol;
use crate::parsers::lr::items::Item;
use crate::parsers::lr::Parser;
use crate::parsers::Lexer;
use crate::position::Position;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

pub const LINE_LENGTH: usize = 72;

/// The first id given to a token name longer than one character
const FIRST_NAMED_TOKEN: u32 = 257;

/// A grammar loaded from a file, with its parser and the names of its
/// symbols
pub struct Session {
    pub parser: Parser<Tree>,
    pub tokens: TokenMap,
    pub non_terminals: BTreeMap<String, Symbol>,
    pub diagnostics: Vec<LoadDiagnostic>,
    names: BTreeMap<Symbol, String>,
}

impl Session {
    /// Loads the grammar description in the named file. Problems found
    /// while resolving names are written to standard error.
    pub fn load(path: &str) -> Result<Session> {
        let source = std::fs::read_to_string(path)?;
        let session = Session::new(&source).map_err(|e| describe(path, e))?;

        for d in &session.diagnostics {
            eprintln!("warning: {}", d);
        }

        Ok(session)
    }

    /// Builds a session from a grammar description. Token and join function
    /// names are taken from the description itself.
    pub fn new(source: &str) -> Result<Session> {
        let (tokens, joins) = discover(source)?;
        let loaded = loader::load(source, &tokens, &joins)?;

        let mut names: BTreeMap<Symbol, String> = BTreeMap::new();
        for (name, &t) in &tokens {
            let name = if name.chars().count() == 1 {
                format!("'{}'", name)
            } else {
                name.clone()
            };
            names.insert(t, name);
        }
        for (name, &nt) in &loaded.non_terminals {
            names.insert(nt, name.clone());
        }

        Ok(Session {
            parser: Parser::new(loaded.grammar),
            tokens,
            non_terminals: loaded.non_terminals,
            diagnostics: loaded.diagnostics,
            names,
        })
    }

    /// Returns the name of a symbol as written in the grammar description
    pub fn name(&self, s: Symbol) -> String {
        match self.names.get(&s) {
            Some(name) => name.clone(),
            None => s.to_string(),
        }
    }

    /// Returns the symbol for a name. `$name` always denotes a non-terminal
    /// and a quoted character always denotes a token; a bare name is looked
    /// up as a token first.
    pub fn symbol(&self, name: &str) -> Option<Symbol> {
        if let Some(nt) = name.strip_prefix('$') {
            return self.non_terminals.get(nt).copied();
        }

        let quoted = name
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .filter(|s| s.chars().count() == 1);
        if let Some(t) = quoted {
            return self.tokens.get(t).copied();
        }

        self.tokens
            .get(name)
            .or_else(|| self.non_terminals.get(name))
            .copied()
    }

    /// Returns a production with its symbols named
    pub fn format_production(&self, id: usize) -> String {
        let p = self.parser.grammar().production(id);
        let mut s = format!("{} →", self.name(p.head));
        if p.is_e() {
            s.push_str(" ϵ");
        }
        for &sym in &p.body {
            let _ = write!(s, " {}", self.name(sym));
        }
        s
    }

    /// Returns an item with its symbols named
    pub fn format_item(&self, item: &Item) -> String {
        let p = self.parser.grammar().production(item.production);
        let mut s = format!("[{} →", self.name(p.head));
        for (i, &sym) in p.body.iter().enumerate() {
            if i == item.dot {
                s.push_str(" ·");
            }
            let _ = write!(s, " {}", self.name(sym));
        }
        if item.dot == p.body.len() {
            s.push_str(" ·");
        }

        let follow: Vec<_> = item.follow.iter().map(|&f| self.name(f)).collect();
        let _ = write!(s, ", {}]", follow.join(" "));
        s
    }

    /// Returns a list of symbol names, separated by commas
    pub fn format_symbols(&self, symbols: &[Symbol]) -> String {
        symbols
            .iter()
            .map(|&s| self.name(s))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Scans a grammar description for token and join function names. A
/// single-character token name denotes that character; longer names are
/// numbered upwards from [`FIRST_NAMED_TOKEN`] in order of first use.
fn discover(source: &str) -> Result<(TokenMap, JoinMap<Tree>)> {
    let mut tokens = TokenMap::new();
    let mut joins: JoinMap<Tree> = JoinMap::new();
    let mut next_id = FIRST_NAMED_TOKEN;

    let mut lexer = GrammarLexer::new(source);
    loop {
        let token = lexer.next_token();
        if token == Symbol::END_OF_INPUT {
            break;
        }

        let text = lexer.text();
        if token == TOK && !tokens.contains_key(text) {
            let mut chars = text.chars();
            let symbol = match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Symbol::literal(c as u8),
                _ => {
                    if next_id >= Symbol::START.id() {
                        return Err(Error::InvalidGrammarFile(format!(
                            "too many token names at '{}'",
                            text
                        )));
                    }
                    next_id += 1;
                    Symbol(next_id - 1)
                }
            };
            tokens.insert(text.to_string(), symbol);
        } else if token == FUNC && !joins.contains_key(text) {
            let label = text.to_string();
            joins.insert(
                label.clone(),
                Arc::new(move |children: Vec<Tree>| Tree::Node {
                    label: label.clone(),
                    children,
                }),
            );
        }
    }

    Ok((tokens, joins))
}

/// Names the tokens of the grammar description language in a syntax error
/// found while reading the named grammar file
fn describe(path: &str, e: Error) -> Error {
    match e {
        Error::Syntax {
            line,
            column,
            lexeme,
            expected,
            ..
        } => {
            let expected: Vec<_> = expected.into_iter().map(token::name).collect();
            Error::InvalidGrammarFile(format!(
                "{}:{}: unexpected '{}', expected one of: {}",
                path,
                Position::at(line, column),
                lexeme,
                expected.join(", ")
            ))
        }
        e => e,
    }
}

/// Prints a list of values separated by spaces, wrapping lines longer than
/// [`LINE_LENGTH`]
pub fn print_wrapped(values: impl IntoIterator<Item = String>) {
    let mut n = 0;

    for v in values {
        let out = format!("{}{}", if n == 0 { "" } else { " " }, v);

        n += out.chars().count();
        if n > LINE_LENGTH {
            print!("\n{}", out.trim());
            n = out.chars().count() - 1;
        } else {
            print!("{}", out);
        }
    }

    println!();
}
