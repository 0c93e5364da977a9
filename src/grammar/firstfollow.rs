use super::{Grammar, Symbol};
use std::collections::{BTreeMap, BTreeSet};

/// Calculates nullability, FIRST and FOLLOW for the symbols of a grammar.
/// FIRST sets may contain [`Symbol::EPSILON`]; FOLLOW sets never do.
pub struct Builder<'b, V> {
    grammar: &'b Grammar<V>,
    nullable: BTreeSet<Symbol>,
    firsts: BTreeMap<Symbol, BTreeSet<Symbol>>,
}

impl<'b, V> Builder<'b, V> {
    /// Returns a new builder with nullability and FIRST calculated for every
    /// non-terminal of the grammar
    pub fn new(grammar: &'b Grammar<V>) -> Builder<'b, V> {
        let mut b = Builder {
            grammar,
            nullable: nullable_set(grammar),
            firsts: BTreeMap::new(),
        };

        let firsts: BTreeMap<_, _> = grammar
            .non_terminals()
            .iter()
            .map(|&nt| (nt, b.first_uncached(nt, &mut Vec::new())))
            .collect();
        b.firsts = firsts;

        b
    }

    /// Returns the set of nullable non-terminals
    pub fn nullable(&self) -> &BTreeSet<Symbol> {
        &self.nullable
    }

    /// Returns true if symbol derives the empty string
    pub fn is_nullable(&self, symbol: Symbol) -> bool {
        self.nullable.contains(&symbol)
    }

    /// Returns FIRST(symbol)
    pub fn first(&self, symbol: Symbol) -> BTreeSet<Symbol> {
        if let Some(set) = self.firsts.get(&symbol) {
            return set.clone();
        }
        self.first_uncached(symbol, &mut Vec::new())
    }

    /// Calculates FIRST(symbol). Symbols on the current recursion path are
    /// not re-entered, so a non-terminal which derives itself as its own
    /// leading symbol contributes nothing further to its own FIRST set.
    fn first_uncached(&self, symbol: Symbol, path: &mut Vec<Symbol>) -> BTreeSet<Symbol> {
        let mut set = BTreeSet::new();
        if symbol.is_terminal() {
            set.insert(symbol);
            return set;
        }

        path.push(symbol);
        for &p in self.grammar.productions_for_non_terminal(symbol) {
            let mut all_nullable = true;

            for &s in &self.grammar.production(p).body {
                if s.is_terminal() {
                    set.insert(s);
                    all_nullable = false;
                    break;
                }

                let nullable = self.is_nullable(s);
                if !path.contains(&s) {
                    let mut first = self.first_uncached(s, path);
                    if nullable {
                        first.remove(&Symbol::EPSILON);
                    }
                    set.append(&mut first);
                }

                if !nullable {
                    all_nullable = false;
                    break;
                }
            }

            // Also covers empty bodies
            if all_nullable {
                set.insert(Symbol::EPSILON);
            }
        }
        path.pop();

        set
    }

    /// Returns FOLLOW(symbol)
    pub fn follow(&self, symbol: Symbol) -> BTreeSet<Symbol> {
        self.follow_uncached(symbol, &mut Vec::new())
    }

    fn follow_uncached(&self, symbol: Symbol, path: &mut Vec<Symbol>) -> BTreeSet<Symbol> {
        // Algorithm adapted from Aho et al (2007) p.221
        let mut set = BTreeSet::new();
        if symbol == Symbol::START {
            set.insert(Symbol::END_OF_INPUT);
            return set;
        }

        path.push(symbol);
        for p in self.grammar.productions() {
            let mut tail_nullable = false;

            for (i, &s) in p.body.iter().enumerate() {
                if s != symbol {
                    continue;
                }

                if let Some(&next) = p.body.get(i + 1) {
                    set.append(&mut self.first(next));
                }

                if !tail_nullable {
                    tail_nullable = p.body[i + 1..]
                        .iter()
                        .all(|&s| self.first(s).contains(&Symbol::EPSILON));
                }
            }

            if tail_nullable && p.head != symbol && !path.contains(&p.head) {
                set.append(&mut self.follow_uncached(p.head, path));
            }
        }
        path.pop();

        set.remove(&Symbol::EPSILON);
        set
    }
}

/// Calculates the set of nullable non-terminals of a grammar
pub fn nullable_set<V>(grammar: &Grammar<V>) -> BTreeSet<Symbol> {
    let mut nullable = BTreeSet::new();
    extend_nullable(grammar, &mut nullable);
    nullable
}

/// Adds to nullable every non-terminal with a production whose body
/// consists entirely of nullable non-terminals, repeating until nothing
/// changes. Returns true if any symbol was added.
pub fn extend_nullable<V>(grammar: &Grammar<V>, nullable: &mut BTreeSet<Symbol>) -> bool {
    let mut changed = false;

    loop {
        let mut added = false;
        for p in grammar.productions() {
            if !nullable.contains(&p.head) && p.body.iter().all(|s| nullable.contains(s)) {
                nullable.insert(p.head);
                added = true;
            }
        }

        if !added {
            break;
        }
        changed = true;
    }

    changed
}
