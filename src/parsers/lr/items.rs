use crate::grammar::firstfollow::Builder as FirstFollow;
use crate::grammar::{Grammar, Symbol};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// An item: a production with a dot position and the set of terminals
/// which may follow the production once it is complete
pub struct Item {
    pub production: usize,
    pub dot: usize,
    pub follow: BTreeSet<Symbol>,
}

impl Item {
    /// Returns a new item with the dot at the left
    pub fn new(production: usize, follow: BTreeSet<Symbol>) -> Item {
        Item {
            production,
            dot: 0,
            follow,
        }
    }

    /// Returns a copy of the item with the dot advanced one position. The
    /// production is not checked to ensure the advanced position is valid.
    pub fn advance(&self) -> Item {
        Item {
            production: self.production,
            dot: self.dot + 1,
            follow: self.follow.clone(),
        }
    }

    /// Returns true if the dot is at the right
    pub fn is_end<V>(&self, g: &Grammar<V>) -> bool {
        self.dot == g.production(self.production).body.len()
    }

    /// Returns the symbol after the dot, or None if the dot is at the right
    pub fn next_symbol<V>(&self, g: &Grammar<V>) -> Option<Symbol> {
        g.production(self.production).body.get(self.dot).copied()
    }

    /// Returns a string representation of the item
    pub fn format<V>(&self, g: &Grammar<V>) -> String {
        let p = g.production(self.production);
        let mut s = format!("[{} →", p.head);
        for (i, sym) in p.body.iter().enumerate() {
            if i == self.dot {
                s.push_str(" ·");
            }
            let _ = write!(s, " {}", sym);
        }
        if self.dot == p.body.len() {
            s.push_str(" ·");
        }

        let follow: Vec<_> = self.follow.iter().map(|f| f.to_string()).collect();
        let _ = write!(s, ", {{{}}}]", follow.join(" "));
        s
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// A closed set of items, kept sorted by production and dot so that two
/// sets holding the same items with the same follow sets compare equal
pub struct ItemSet(Vec<Item>);

impl ItemSet {
    fn new(mut items: Vec<Item>) -> ItemSet {
        items.sort_by_key(|i| (i.production, i.dot));
        ItemSet(items)
    }

    pub fn items(&self) -> &[Item] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the symbols which appear after the dot in any item
    pub fn next_symbols<V>(&self, g: &Grammar<V>) -> BTreeSet<Symbol> {
        self.0.iter().filter_map(|i| i.next_symbol(g)).collect()
    }
}

impl<'a> IntoIterator for &'a ItemSet {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone)]
/// A state of the automaton, with its outgoing transitions
pub struct Node {
    pub id: usize,
    pub items: ItemSet,
    pub arcs: BTreeMap<Symbol, usize>,
}

#[derive(Debug, Clone)]
/// The canonical collection of item sets for a grammar. Item sets whose
/// follow sets differ are distinct states; no merging takes place.
pub struct Automaton {
    pub nodes: Vec<Node>,
}

impl Automaton {
    /// Builds the canonical collection for a grammar
    #[instrument(level = "debug", skip_all, fields(productions = g.num_productions()))]
    pub fn new<V>(g: &Grammar<V>) -> Automaton {
        // Algorithm adapted from Aho et al (2007) p.261
        let mut builder = Builder::new(g);

        let start = builder.closure(vec![Item::new(
            g.start_production(),
            BTreeSet::from([Symbol::END_OF_INPUT]),
        )]);

        let mut seen: HashMap<ItemSet, usize> = HashMap::new();
        seen.insert(start.clone(), 0);
        let mut nodes = vec![Node {
            id: 0,
            items: start,
            arcs: BTreeMap::new(),
        }];

        // Nodes are appended in discovery order, so processing them by index
        // is a breadth-first traversal
        let mut next = 0;
        while next < nodes.len() {
            for symbol in nodes[next].items.next_symbols(g) {
                let target = builder.goto(&nodes[next].items, symbol);

                let id = match seen.get(&target) {
                    Some(&id) => id,
                    None => {
                        let id = nodes.len();
                        seen.insert(target.clone(), id);
                        nodes.push(Node {
                            id,
                            items: target,
                            arcs: BTreeMap::new(),
                        });
                        id
                    }
                };

                nodes[next].arcs.insert(symbol, id);
            }
            next += 1;
        }

        debug!(states = nodes.len(), "built canonical collection");
        Automaton { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the state reached from state on symbol, if any
    pub fn transition(&self, state: usize, symbol: Symbol) -> Option<usize> {
        self.nodes.get(state)?.arcs.get(&symbol).copied()
    }
}

/// Builds closures and gotos of item sets for a grammar
pub struct Builder<'b, V> {
    g: &'b Grammar<V>,
    ff: FirstFollow<'b, V>,
    expanded: BTreeSet<Symbol>,
}

impl<'b, V> Builder<'b, V> {
    /// Returns a new builder for the grammar
    pub fn new(g: &'b Grammar<V>) -> Builder<'b, V> {
        Builder {
            g,
            ff: FirstFollow::new(g),
            expanded: BTreeSet::new(),
        }
    }

    /// Returns the closure of a set of items
    pub fn closure(&mut self, mut items: Vec<Item>) -> ItemSet {
        // Algorithm adapted from Aho et al (2007) p.261
        self.expanded.clear();

        loop {
            let mut changed = false;

            let mut i = 0;
            while i < items.len() {
                let Some(symbol) = items[i].next_symbol(self.g).filter(|s| s.is_non_terminal())
                else {
                    i += 1;
                    continue;
                };

                let follow = self.lookahead(&items[i]);

                if self.expanded.insert(symbol) {
                    for &p in self.g.productions_for_non_terminal(symbol) {
                        items.push(Item::new(p, follow.clone()));
                        changed = true;
                    }
                } else {
                    for item in items.iter_mut() {
                        if item.dot == 0 && self.g.production(item.production).head == symbol {
                            let before = item.follow.len();
                            item.follow.extend(follow.iter().copied());
                            changed |= item.follow.len() != before;
                        }
                    }
                }

                i += 1;
            }

            if !changed {
                break;
            }
        }

        ItemSet::new(items)
    }

    /// Returns the follow set for items expanded from the non-terminal
    /// after the dot in parent: FIRST of the symbols after it, continuing
    /// past nullable non-terminals, plus the follow set of parent if every
    /// remaining symbol is nullable
    pub fn lookahead(&self, parent: &Item) -> BTreeSet<Symbol> {
        let body = &self.g.production(parent.production).body;
        let mut follow = BTreeSet::new();

        let mut dot = parent.dot + 1;
        while dot < body.len() {
            follow.append(&mut self.ff.first(body[dot]));
            if !(body[dot].is_non_terminal() && self.ff.is_nullable(body[dot])) {
                break;
            }
            dot += 1;
        }

        follow.remove(&Symbol::EPSILON);
        if dot >= body.len() {
            follow.extend(parent.follow.iter().copied());
        }

        follow
    }

    /// Returns the closure of the items of set with the dot advanced past
    /// symbol
    pub fn goto(&mut self, set: &ItemSet, symbol: Symbol) -> ItemSet {
        let kernel: Vec<Item> = set
            .iter()
            .filter(|i| i.next_symbol(self.g) == Some(symbol))
            .map(Item::advance)
            .collect();

        self.closure(kernel)
    }
}
