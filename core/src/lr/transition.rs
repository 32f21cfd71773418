use crate::{ItemSet, ItemSetId, SymbolId};

use super::graph::Graph;

/// A state of the canonical collection with its outgoing edges.
pub struct Transition<'graph> {
    pub(super) id: ItemSetId,
    pub(super) from: &'graph ItemSet,
    pub(super) edges: Vec<(SymbolId, ItemSetId)>,
}

impl Transition<'_> {
    /// The state reached by moving over `symbol`, if any.
    pub fn target(&self, symbol: SymbolId) -> Option<ItemSetId> {
        self.edges
            .iter()
            .find(|(sym, _)| *sym == symbol)
            .map(|(_, to)| *to)
    }
}

impl Graph<'_> {
    pub fn iter_transitions(&self) -> impl Iterator<Item = Transition<'_>> {
        self.sets.iter().enumerate().map(|(id, set)| Transition {
            id,
            from: set,
            edges: self
                .edges
                .iter()
                .filter(|(from, _, _)| id == *from)
                .map(|(_, sym, to)| (*sym, *to))
                .collect(),
        })
    }
}
