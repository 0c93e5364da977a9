use super::parser::{self, ProductionSpec, RuleSpec};
use super::{Disambiguation, Grammar, JoinFn, Production, Resolution, Symbol, MAX_PRODUCTION_LEN};
use crate::errors::Result;
use crate::parsers::SemanticValue;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{instrument, warn};

/// Token names and the terminals they denote
pub type TokenMap = BTreeMap<String, Symbol>;

/// Join function names and the functions they denote
pub type JoinMap<V> = BTreeMap<String, JoinFn<V>>;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
/// A problem found while resolving a grammar description. The offending
/// reference is dropped and loading continues.
pub enum LoadDiagnostic {
    #[error("production {production} for '{head}': undefined token '{name}'")]
    UndefinedToken {
        production: usize,
        head: String,
        name: String,
    },
    #[error("production {production} for '{head}': undefined join function '{name}'")]
    UndefinedJoin {
        production: usize,
        head: String,
        name: String,
    },
    #[error("production {production} for '{head}': the start symbol may not appear in a body")]
    StartInBody { production: usize, head: String },
    #[error("production {production} for '{head}': reached maximal production length {max}, body truncated")]
    ProductionTooLong {
        production: usize,
        head: String,
        max: usize,
    },
}

/// A grammar built from a grammar description, with the non-terminal ids
/// allocated for it and any problems found
pub struct LoadedGrammar<V> {
    pub grammar: Grammar<V>,
    pub non_terminals: BTreeMap<String, Symbol>,
    pub diagnostics: Vec<LoadDiagnostic>,
}

impl<V> LoadedGrammar<V> {
    /// Returns true if any reference could not be resolved. The grammar
    /// should not be used if this is set.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Resolves names in parsed productions. `start` is always
/// [`Symbol::START`]; other non-terminals are numbered upwards from the
/// one after it, in order of first use.
struct Resolver<'r, V> {
    tokens: &'r TokenMap,
    joins: &'r JoinMap<V>,
    non_terminals: BTreeMap<String, Symbol>,
    next_id: u32,
    diagnostics: Vec<LoadDiagnostic>,
}

impl<'r, V: SemanticValue + 'static> Resolver<'r, V> {
    fn new(tokens: &'r TokenMap, joins: &'r JoinMap<V>) -> Resolver<'r, V> {
        Resolver {
            tokens,
            joins,
            non_terminals: BTreeMap::from([("start".to_string(), Symbol::START)]),
            next_id: Symbol::START.id() + 1,
            diagnostics: Vec::new(),
        }
    }

    fn non_terminal(&mut self, name: &str) -> Symbol {
        if let Some(&s) = self.non_terminals.get(name) {
            return s;
        }

        let s = Symbol(self.next_id);
        self.next_id += 1;
        self.non_terminals.insert(name.to_string(), s);
        s
    }

    fn report(&mut self, diagnostic: LoadDiagnostic) {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    fn production(&mut self, id: usize, spec: &ProductionSpec) -> Production<V> {
        let head = self.non_terminal(&spec.head);

        let mut body = Vec::with_capacity(spec.body.len());
        for s in &spec.body {
            if body.len() == MAX_PRODUCTION_LEN {
                self.report(LoadDiagnostic::ProductionTooLong {
                    production: id,
                    head: spec.head.clone(),
                    max: MAX_PRODUCTION_LEN,
                });
                break;
            }

            if s.non_terminal && self.non_terminal(&s.name) == Symbol::START {
                self.report(LoadDiagnostic::StartInBody {
                    production: id,
                    head: spec.head.clone(),
                });
            } else if s.non_terminal {
                body.push(self.non_terminal(&s.name));
            } else if let Some(&t) = self.tokens.get(&s.name) {
                body.push(t);
            } else {
                self.report(LoadDiagnostic::UndefinedToken {
                    production: id,
                    head: spec.head.clone(),
                    name: s.name.clone(),
                });
            }
        }

        let join: JoinFn<V> = match self.joins.get(&spec.join) {
            Some(join) => Arc::clone(join),
            None => {
                self.report(LoadDiagnostic::UndefinedJoin {
                    production: id,
                    head: spec.head.clone(),
                    name: spec.join.clone(),
                });
                Arc::new(|_: Vec<V>| V::from_lexeme(""))
            }
        };

        let production = Production::with_join(head, body, join);
        match &spec.rule {
            Some(rule) => production.with_rule(self.rule(rule)),
            None => production,
        }
    }

    /// Expands a disambiguation clause to a verdict for every known token
    fn rule(&self, rule: &RuleSpec) -> Disambiguation {
        if let RuleSpec::ShiftOn(listed) = rule {
            for name in listed.iter().filter(|n| !self.tokens.contains_key(*n)) {
                warn!("disambiguation rule names undefined token '{}'", name);
            }
        }

        self.tokens
            .iter()
            .map(|(name, &t)| {
                let resolution = match rule {
                    RuleSpec::AllReduce => Resolution::Reduce,
                    RuleSpec::AllShift => Resolution::Shift,
                    RuleSpec::ShiftOn(listed) if listed.contains(name) => Resolution::Shift,
                    RuleSpec::ShiftOn(_) => Resolution::Reduce,
                };
                (t, resolution)
            })
            .collect()
    }
}

/// Builds a grammar from a grammar description, resolving token and join
/// function names against the given maps. Unresolved names are reported
/// in the result; a malformed description is an error.
#[instrument(level = "debug", skip_all)]
pub fn load<V: SemanticValue + 'static>(
    input: &str,
    tokens: &TokenMap,
    joins: &JoinMap<V>,
) -> Result<LoadedGrammar<V>> {
    let specs = parser::parse(input)?;

    let mut resolver = Resolver::new(tokens, joins);
    let productions: Vec<Production<V>> = specs
        .iter()
        .enumerate()
        .map(|(id, spec)| resolver.production(id, spec))
        .collect();

    Ok(LoadedGrammar {
        grammar: Grammar::new(productions)?,
        non_terminals: resolver.non_terminals,
        diagnostics: resolver.diagnostics,
    })
}

/// Builds a grammar from a grammar description in a file with the given
/// path
pub fn load_file<V: SemanticValue + 'static>(
    path: &str,
    tokens: &TokenMap,
    joins: &JoinMap<V>,
) -> Result<LoadedGrammar<V>> {
    load(&std::fs::read_to_string(path)?, tokens, joins)
}
