use super::items::Automaton;
use crate::grammar::{Grammar, Resolution, Symbol};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
/// An entry in the ACTION table
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
    Error,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Shift(s) => write!(f, "s{}", s),
            Action::Reduce(p) => write!(f, "r{}", p),
            Action::Accept => write!(f, "acc"),
            Action::Error => write!(f, "."),
        }
    }
}

#[derive(Debug, Error, Eq, PartialEq, Clone)]
/// A problem found while building the parse table. All variants except
/// `UnresolvedShiftReduce` make the table unusable.
pub enum Conflict {
    #[error("state {state}: reduce/reduce conflict between productions {existing} and {production} on {terminal}")]
    ReduceReduce {
        state: usize,
        existing: usize,
        production: usize,
        terminal: Symbol,
    },
    #[error("state {state}: conflicting goto entries on {symbol}")]
    Goto { state: usize, symbol: Symbol },
    #[error("state {state}: conflict between shift and accept on {terminal}")]
    ShiftAccept { state: usize, terminal: Symbol },
    #[error("state {state}: unresolved shift/reduce conflict for production {production} on {terminal}, defaulting to reduce")]
    UnresolvedShiftReduce {
        state: usize,
        production: usize,
        terminal: Symbol,
    },
}

impl Conflict {
    /// Returns true if the conflict makes the table unusable
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Conflict::UnresolvedShiftReduce { .. })
    }
}

/// A canonical LR parse table: ACTION keyed by (terminal, state) and GOTO
/// keyed by (non-terminal, state)
#[derive(Debug, Clone)]
pub struct ParseTable {
    actions: BTreeMap<Symbol, Vec<Action>>,
    gotos: BTreeMap<Symbol, Vec<Option<usize>>>,
    num_states: usize,
    conflicts: Vec<Conflict>,
    fatal: bool,
}

impl ParseTable {
    /// Creates a new parse table from the canonical collection of a grammar
    #[instrument(level = "debug", skip_all, fields(states = automaton.len()))]
    pub fn new<V>(g: &Grammar<V>, automaton: &Automaton) -> ParseTable {
        // Algorithm adapted from Aho et al (2007) pp.265
        let num_states = automaton.len();
        let mut table = ParseTable {
            actions: g
                .terminals()
                .iter()
                .map(|&t| (t, vec![Action::Error; num_states]))
                .collect(),
            gotos: g
                .non_terminals()
                .iter()
                .map(|&nt| (nt, vec![None; num_states]))
                .collect(),
            num_states,
            conflicts: Vec::new(),
            fatal: false,
        };

        for node in &automaton.nodes {
            // Reductions first, so that shifts can detect conflicts with them
            for item in node.items.iter().filter(|i| i.is_end(g)) {
                for &t in &item.follow {
                    table.add_reduction(g, node.id, item.production, t);
                }
            }

            for (&symbol, &to) in &node.arcs {
                if symbol.is_non_terminal() {
                    table.add_goto(node.id, to, symbol);
                } else {
                    table.add_shift(g, node.id, to, symbol);
                }
            }
        }

        debug!(
            terminals = table.actions.len(),
            non_terminals = table.gotos.len(),
            conflicts = table.conflicts.len(),
            "built parse table"
        );
        table
    }

    fn record(&mut self, conflict: Conflict) {
        if conflict.is_fatal() {
            error!("{}", conflict);
            self.fatal = true;
        } else {
            warn!("{}", conflict);
        }
        self.conflicts.push(conflict);
    }

    fn cell(&mut self, state: usize, t: Symbol) -> &mut Action {
        let n = self.num_states;
        &mut self.actions.entry(t).or_insert_with(|| vec![Action::Error; n])[state]
    }

    /// Adds a REDUCE entry for production p in state on terminal t, or an
    /// ACCEPT entry if p is the start production. An occupied cell is a
    /// reduce/reduce conflict; the later production takes the cell.
    fn add_reduction<V>(&mut self, g: &Grammar<V>, state: usize, p: usize, t: Symbol) {
        let existing = *self.cell(state, t);
        match existing {
            Action::Reduce(q) => self.record(Conflict::ReduceReduce {
                state,
                existing: q,
                production: p,
                terminal: t,
            }),
            Action::Accept => self.record(Conflict::ReduceReduce {
                state,
                existing: g.start_production(),
                production: p,
                terminal: t,
            }),
            _ => (),
        }

        *self.cell(state, t) = if g.production(p).head == Symbol::START {
            Action::Accept
        } else {
            Action::Reduce(p)
        };
    }

    /// Adds a SHIFT entry from state to state to on terminal t, consulting
    /// the disambiguation rule of any production already reduced there
    fn add_shift<V>(&mut self, g: &Grammar<V>, state: usize, to: usize, t: Symbol) {
        match *self.cell(state, t) {
            Action::Error => *self.cell(state, t) = Action::Shift(to),
            Action::Reduce(p) => {
                let verdict = g.production(p).rule.as_ref().and_then(|r| r.lookup(t));
                match verdict {
                    Some(Resolution::Shift) => *self.cell(state, t) = Action::Shift(to),
                    Some(Resolution::Reduce) => (),
                    None => self.record(Conflict::UnresolvedShiftReduce {
                        state,
                        production: p,
                        terminal: t,
                    }),
                }
            }
            Action::Accept => self.record(Conflict::ShiftAccept { state, terminal: t }),
            // Each state has at most one arc per symbol
            Action::Shift(_) => (),
        }
    }

    fn add_goto(&mut self, state: usize, to: usize, nt: Symbol) {
        if self.goto(state, nt).is_some() {
            self.record(Conflict::Goto { state, symbol: nt });
            return;
        }

        let n = self.num_states;
        self.gotos.entry(nt).or_insert_with(|| vec![None; n])[state] = Some(to);
    }

    /// Returns the action for a state and lookahead terminal. Terminals
    /// unknown to the grammar always yield ERROR.
    pub fn action(&self, state: usize, t: Symbol) -> Action {
        self.actions
            .get(&t)
            .and_then(|row| row.get(state))
            .copied()
            .unwrap_or(Action::Error)
    }

    /// Returns the state to go to from state after reducing to nt
    pub fn goto(&self, state: usize, nt: Symbol) -> Option<usize> {
        self.gotos.get(&nt).and_then(|row| row.get(state)).copied().flatten()
    }

    /// Returns the terminals with a non-error action in state, in ascending
    /// order
    pub fn expected(&self, state: usize) -> Vec<Symbol> {
        self.actions
            .iter()
            .filter(|(_, row)| row.get(state).is_some_and(|a| *a != Action::Error))
            .map(|(&t, _)| t)
            .collect()
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Returns every conflict found while building the table
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Returns true if a fatal conflict was found. The flag is sticky.
    pub fn has_conflicts(&self) -> bool {
        self.fatal
    }
}

impl fmt::Display for ParseTable {
    /// Writes one row per state: the non-error actions, then the gotos
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for state in 0..self.num_states {
            write!(f, "{:>4}:", state)?;
            for (t, row) in &self.actions {
                if row[state] != Action::Error {
                    write!(f, " {}={}", t, row[state])?;
                }
            }
            for (nt, row) in &self.gotos {
                if let Some(to) = row[state] {
                    write!(f, " {}→{}", nt, to)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
