use std::collections::{HashMap, VecDeque};

use log::debug;

use crate::{AugmentedGrammar, FirstSets, ItemSet, ItemSetId, SymbolId};

/// The canonical collection of LR(1) item sets, and the goto edges between them.
pub struct Graph<'rule> {
    rules: &'rule AugmentedGrammar,
    first: &'rule FirstSets,
    pub(super) sets: Vec<ItemSet>,
    pub(super) edges: Vec<(ItemSetId, SymbolId, ItemSetId)>,
    index: HashMap<ItemSet, ItemSetId>,
}

impl<'rule> Graph<'rule> {
    pub fn new(rules: &'rule AugmentedGrammar, first: &'rule FirstSets) -> Self {
        let start = ItemSet::start(rules).closure(rules, first);

        Self {
            rules,
            first,
            index: HashMap::from_iter([(start.clone(), 0)]),
            sets: vec![start],
            edges: vec![],
        }
    }

    /// Push a new set in the graph, if it does not yet exist.
    ///
    /// Returns the set's id, and whether it was added.
    fn push(&mut self, set: ItemSet) -> (ItemSetId, bool) {
        if let Some(&id) = self.index.get(&set) {
            return (id, false);
        }

        let id = self.sets.len();
        self.index.insert(set.clone(), id);
        self.sets.push(set);
        (id, true)
    }

    /// Explores states breadth-first until no new state nor edge appears.
    ///
    /// The walk ends because a finite grammar only has finitely many item sets.
    pub fn build(&mut self) {
        let mut queue = VecDeque::from_iter([0]);
        let (rules, first) = (self.rules, self.first);

        while let Some(set_id) = queue.pop_front() {
            for symbol in rules.iter_symbols() {
                let target = self.sets[set_id].goto(symbol, rules, first);
                if target.is_empty() {
                    continue;
                }

                let (to_id, added) = self.push(target);
                if added {
                    queue.push_back(to_id);
                }

                self.edges.push((set_id, symbol, to_id));
            }
        }

        debug!(
            "canonical collection: {} states, {} edges",
            self.sets.len(),
            self.edges.len()
        );
    }

    /// Consumes the graph, returning the states in id order.
    pub fn into_sets(self) -> Vec<ItemSet> {
        self.sets
    }
}
