pub mod firstfollow;
pub mod lexer;
pub mod loader;
pub mod parser;
mod symbol;
pub mod token;
use crate::errors::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
pub use symbol::Symbol;

/// The maximum number of symbols in a production body
pub const MAX_PRODUCTION_LEN: usize = 10;

/// Combines the semantic values of a production body, in body order, into
/// the value of its head
pub type JoinFn<V> = Arc<dyn Fn(Vec<V>) -> V + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The verdict for a shift/reduce conflict on one terminal
pub enum Resolution {
    Shift,
    Reduce,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Per-production shift/reduce verdicts, searched in order
pub struct Disambiguation {
    entries: Vec<(Symbol, Resolution)>,
}

impl Disambiguation {
    /// Returns an empty rule list
    pub fn new() -> Disambiguation {
        Disambiguation::default()
    }

    /// Returns the rule list with a verdict appended for terminal
    pub fn with(mut self, terminal: Symbol, resolution: Resolution) -> Disambiguation {
        self.entries.push((terminal, resolution));
        self
    }

    /// Returns the first verdict recorded for terminal
    pub fn lookup(&self, terminal: Symbol) -> Option<Resolution> {
        self.entries
            .iter()
            .find(|(t, _)| *t == terminal)
            .map(|(_, r)| *r)
    }

    pub fn entries(&self) -> &[(Symbol, Resolution)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Symbol, Resolution)> for Disambiguation {
    fn from_iter<I: IntoIterator<Item = (Symbol, Resolution)>>(iter: I) -> Self {
        Disambiguation {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A context-free grammar production
pub struct Production<V> {
    pub head: Symbol,
    pub body: Vec<Symbol>,
    pub join: JoinFn<V>,
    pub rule: Option<Disambiguation>,
}

impl<V> Production<V> {
    /// Returns a new production with the given join function
    pub fn new<F>(head: Symbol, body: Vec<Symbol>, join: F) -> Production<V>
    where
        F: Fn(Vec<V>) -> V + Send + Sync + 'static,
    {
        Production::with_join(head, body, Arc::new(join))
    }

    /// Returns a new production sharing an existing join function
    pub fn with_join(head: Symbol, body: Vec<Symbol>, join: JoinFn<V>) -> Production<V> {
        Production {
            head,
            body,
            join,
            rule: None,
        }
    }

    /// Returns the production with a disambiguation rule list attached
    pub fn with_rule(mut self, rule: Disambiguation) -> Production<V> {
        self.rule = Some(rule);
        self
    }

    /// Returns true if the production has an empty body
    pub fn is_e(&self) -> bool {
        self.body.is_empty()
    }
}

impl<V> Clone for Production<V> {
    fn clone(&self) -> Self {
        Production {
            head: self.head,
            body: self.body.clone(),
            join: Arc::clone(&self.join),
            rule: self.rule.clone(),
        }
    }
}

impl<V> fmt::Debug for Production<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Production")
            .field("head", &self.head)
            .field("body", &self.body)
            .field("rule", &self.rule)
            .finish_non_exhaustive()
    }
}

impl<V> fmt::Display for Production<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} →", self.head)?;
        if self.body.is_empty() {
            return write!(f, " ϵ");
        }
        for s in &self.body {
            write!(f, " {}", s)?;
        }
        Ok(())
    }
}

/// A context-free grammar over integer symbols, with a join function for
/// each production
pub struct Grammar<V> {
    productions: Vec<Production<V>>,
    start: usize,
    terminals: BTreeSet<Symbol>,
    non_terminals: BTreeSet<Symbol>,
    nt_productions: BTreeMap<Symbol, Vec<usize>>,
}

impl<V> Grammar<V> {
    /// Creates a grammar from a list of productions. Production ids are
    /// positions in the list. Exactly one production must have
    /// [`Symbol::START`] as its head.
    pub fn new(productions: Vec<Production<V>>) -> Result<Grammar<V>> {
        if productions.is_empty() {
            return Err(Error::EmptyGrammar);
        }

        let mut start: Option<usize> = None;
        let mut terminals = BTreeSet::from([Symbol::END_OF_INPUT]);
        let mut non_terminals = BTreeSet::new();
        let mut nt_productions: BTreeMap<Symbol, Vec<usize>> = BTreeMap::new();

        for (id, p) in productions.iter().enumerate() {
            if !p.head.is_non_terminal() {
                return Err(Error::InvalidHead {
                    production: id,
                    head: p.head,
                });
            }
            if p.body.len() > MAX_PRODUCTION_LEN {
                return Err(Error::ProductionTooLong {
                    production: id,
                    len: p.body.len(),
                    max: MAX_PRODUCTION_LEN,
                });
            }
            if p.head == Symbol::START && start.replace(id).is_some() {
                return Err(Error::MultipleStartProductions);
            }

            for &s in &p.body {
                if s.is_terminal() {
                    terminals.insert(s);
                } else if s.is_non_terminal() && s != Symbol::START {
                    non_terminals.insert(s);
                } else {
                    return Err(Error::InvalidSymbol {
                        production: id,
                        symbol: s,
                    });
                }
            }

            non_terminals.insert(p.head);
            nt_productions.entry(p.head).or_default().push(id);
        }

        let Some(start) = start else {
            return Err(Error::NoStartProduction);
        };

        Ok(Grammar {
            productions,
            start,
            terminals,
            non_terminals,
            nt_productions,
        })
    }

    /// Returns the production with the given id
    pub fn production(&self, id: usize) -> &Production<V> {
        &self.productions[id]
    }

    pub fn productions(&self) -> &[Production<V>] {
        &self.productions
    }

    /// Returns the number of productions in the grammar
    pub fn num_productions(&self) -> usize {
        self.productions.len()
    }

    /// Returns the id of the start production
    pub fn start_production(&self) -> usize {
        self.start
    }

    /// Returns the ids of all productions for the given non-terminal, in
    /// ascending order. Empty for symbols with no productions.
    pub fn productions_for_non_terminal(&self, nt: Symbol) -> &[usize] {
        self.nt_productions.get(&nt).map_or(&[], |v| v.as_slice())
    }

    /// Returns all terminals appearing in production bodies, plus
    /// end-of-input
    pub fn terminals(&self) -> &BTreeSet<Symbol> {
        &self.terminals
    }

    /// Returns all non-terminals appearing in the grammar
    pub fn non_terminals(&self) -> &BTreeSet<Symbol> {
        &self.non_terminals
    }

    /// Returns a string representation of a production
    pub fn format_production(&self, id: usize) -> String {
        self.productions[id].to_string()
    }
}

impl<V> Clone for Grammar<V> {
    fn clone(&self) -> Self {
        Grammar {
            productions: self.productions.clone(),
            start: self.start,
            terminals: self.terminals.clone(),
            non_terminals: self.non_terminals.clone(),
            nt_productions: self.nt_productions.clone(),
        }
    }
}

impl<V> fmt::Debug for Grammar<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("productions", &self.productions)
            .field("start", &self.start)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const E: Symbol = Symbol(5001);
    const T: Symbol = Symbol(5002);

    fn keep(mut v: Vec<String>) -> String {
        v.pop().unwrap_or_default()
    }

    #[test]
    fn test_new() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let g = Grammar::new(vec![
            Production::new(E, vec![E, Symbol::literal(b'+'), T], keep),
            Production::new(Symbol::START, vec![E], keep),
            Production::new(E, vec![T], keep),
            Production::new(T, vec![Symbol::literal(b'n')], keep),
        ])?;

        assert_eq!(g.start_production(), 1);
        assert_eq!(g.num_productions(), 4);
        assert_eq!(g.productions_for_non_terminal(E), &[0, 2]);
        assert_eq!(g.productions_for_non_terminal(Symbol(5009)), &[] as &[usize]);
        assert_eq!(
            g.terminals().iter().copied().collect::<Vec<_>>(),
            vec![
                Symbol::literal(b'+'),
                Symbol::literal(b'n'),
                Symbol::END_OF_INPUT
            ]
        );
        assert_eq!(g.non_terminals().len(), 3);
        assert_eq!(g.format_production(0), "#5001 → #5001 '+' #5002");

        Ok(())
    }

    #[test]
    fn test_new_errors() {
        let empty: Vec<Production<String>> = Vec::new();
        assert_eq!(Grammar::new(empty).unwrap_err(), Error::EmptyGrammar);

        assert_eq!(
            Grammar::new(vec![Production::new(E, vec![T], keep)]).unwrap_err(),
            Error::NoStartProduction
        );

        assert_eq!(
            Grammar::new(vec![
                Production::new(Symbol::START, vec![E], keep),
                Production::new(Symbol::START, vec![T], keep),
            ])
            .unwrap_err(),
            Error::MultipleStartProductions
        );

        assert_eq!(
            Grammar::new(vec![
                Production::new(Symbol::START, vec![E], keep),
                Production::new(Symbol::literal(b'x'), vec![T], keep),
            ])
            .unwrap_err(),
            Error::InvalidHead {
                production: 1,
                head: Symbol::literal(b'x')
            }
        );

        assert_eq!(
            Grammar::new(vec![Production::new(Symbol::START, vec![E, Symbol::EPSILON],
                keep
            )])
            .unwrap_err(),
            Error::InvalidSymbol {
                production: 0,
                symbol: Symbol::EPSILON
            }
        );

        assert_eq!(
            Grammar::new(vec![
                Production::new(Symbol::START, vec![E], keep),
                Production::new(E, vec![Symbol::literal(b'a'); 11], keep),
            ])
            .unwrap_err(),
            Error::ProductionTooLong {
                production: 1,
                len: 11,
                max: MAX_PRODUCTION_LEN
            }
        );
    }

    #[test]
    fn test_disambiguation() {
        let rule = Disambiguation::new()
            .with(Symbol::literal(b'a'), Resolution::Shift)
            .with(Symbol::literal(b'b'), Resolution::Reduce)
            .with(Symbol::literal(b'a'), Resolution::Reduce);

        assert_eq!(rule.lookup(Symbol::literal(b'a')), Some(Resolution::Shift));
        assert_eq!(rule.lookup(Symbol::literal(b'b')), Some(Resolution::Reduce));
        assert_eq!(rule.lookup(Symbol::literal(b'c')), None);
    }
}
