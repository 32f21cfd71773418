use prettytable::Table as PtTable;
use std::collections::HashMap;

use log::debug;

use crate::{
    traits::SymbolSlice as _, AugmentedGrammar, ClrResult, ErrorKind, FirstSets, FollowSets,
    Grammar, ItemSet, ItemSetId, SymbolId, EOS_ID,
};

use super::{Action, Graph, Transition};

pub mod traits {
    use crate::lr::Action;
    use crate::SymbolId;

    pub trait LrTable {
        fn action(&self, state: usize, symbol: SymbolId) -> Option<&Action>;
        fn goto(&self, state: usize, symbol: SymbolId) -> Option<usize>;

        /// Terminals having an action in the given state.
        fn iter_terminals(&self, state: usize) -> impl Iterator<Item = SymbolId> + '_;

        /// The number of rows in the table.
        fn len(&self) -> usize;
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Row {
    actions: HashMap<SymbolId, Action>,
    goto: HashMap<SymbolId, ItemSetId>,
}

impl Row {
    pub fn action(&self, symbol: SymbolId) -> Option<&Action> {
        self.actions.get(&symbol)
    }

    pub fn goto(&self, symbol: SymbolId) -> Option<ItemSetId> {
        self.goto.get(&symbol).copied()
    }

    /// Fills an ACTION cell, two different values in the same cell is a conflict.
    fn set_action(&mut self, state: ItemSetId, symbol: SymbolId, action: Action, rules: &AugmentedGrammar) -> ClrResult<()> {
        match self.actions.get(&symbol) {
            Some(existing) if *existing != action => Err(ErrorKind::Conflict {
                state,
                symbol: rules.name(symbol).to_string(),
                conflict: [*existing, action],
            }
            .into()),
            _ => {
                self.actions.insert(symbol, action);
                Ok(())
            }
        }
    }

    fn from_transition(transition: Transition<'_>, rules: &AugmentedGrammar) -> ClrResult<Self> {
        let mut row = Row::default();

        for item in transition.from.iter() {
            match item.symbol(rules) {
                // A -> α • a β, shift if the automaton moves over a.
                Some(sym) if rules.is_terminal(sym) => {
                    if let Some(to) = transition.target(sym) {
                        row.set_action(transition.id, sym, Action::Shift(to), rules)?;
                    }
                }
                Some(_) => {}
                None if item.is_accepting(rules) => {
                    row.set_action(transition.id, EOS_ID, Action::Accept, rules)?;
                }
                None => {
                    row.set_action(transition.id, item.lookahead, Action::Reduce(item.rule), rules)?;
                }
            }
        }

        row.goto.extend(
            transition
                .edges
                .iter()
                .filter(|(sym, _)| rules.is_non_terminal(*sym))
                .copied(),
        );

        Ok(row)
    }
}

/// A canonical LR(1) parsing table.
///
/// Alongside the ACTION and GOTO rows, the table keeps the grammar
/// analysis it was derived from: the augmented rules, FIRST/FOLLOW sets,
/// and the canonical collection (one item set per row).
#[derive(PartialEq)]
pub struct LrTable {
    rules: AugmentedGrammar,
    first: FirstSets,
    follow: FollowSets,
    states: Vec<ItemSet>,
    /// ACTION columns, $ last.
    terminals: Vec<SymbolId>,
    /// GOTO columns, S' first.
    non_terminals: Vec<SymbolId>,
    rows: Vec<Row>,
}

impl std::fmt::Debug for LrTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

impl std::fmt::Display for LrTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut table = PtTable::new();

        table.add_row(
            ["#"]
                .into_iter()
                .chain(
                    self.terminals
                        .iter()
                        .chain(self.non_terminals.iter())
                        .map(|&sym| self.rules.name(sym)),
                )
                .collect(),
        );

        for (id, row) in self.rows.iter().enumerate() {
            table.add_row(
                [id.to_string()]
                    .into_iter()
                    .chain(self.terminals.iter().map(|&sym| {
                        row.action(sym)
                            .map(ToString::to_string)
                            .unwrap_or_default()
                    }))
                    .chain(self.non_terminals.iter().map(|&sym| {
                        row.goto(sym)
                            .map(|to| to.to_string())
                            .unwrap_or_default()
                    }))
                    .collect(),
            );
        }

        write!(f, "{}", table)
    }
}

impl traits::LrTable for LrTable {
    fn action(&self, state: usize, symbol: SymbolId) -> Option<&Action> {
        self.rows.get(state).and_then(|row| row.action(symbol))
    }

    fn goto(&self, state: usize, symbol: SymbolId) -> Option<usize> {
        self.rows.get(state).and_then(|row| row.goto(symbol))
    }

    fn iter_terminals(&self, state: usize) -> impl Iterator<Item = SymbolId> + '_ {
        let row = self.rows.get(state);
        self.terminals
            .iter()
            .copied()
            .filter(move |sym| row.is_some_and(|row| row.action(*sym).is_some()))
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

impl LrTable {
    fn from_graph(graph: &Graph<'_>, rules: &AugmentedGrammar) -> ClrResult<Vec<Row>> {
        graph
            .iter_transitions()
            .map(|t| Row::from_transition(t, rules))
            .collect()
    }

    /// Build a canonical LR(1) table from a grammar.
    ///
    /// Fails with a conflict if a cell would hold two different actions.
    pub fn build(grammar: &Grammar) -> ClrResult<Self> {
        let rules = AugmentedGrammar::new(grammar);
        let first = FirstSets::new(&rules);
        let follow = FollowSets::new(&rules, &first);

        let mut graph = Graph::new(&rules, &first);
        graph.build();

        let rows = Self::from_graph(&graph, &rules)?;
        let states = graph.into_sets();

        debug!(
            "table: {} rows, {} actions, {} gotos",
            rows.len(),
            rows.iter().map(|row| row.actions.len()).sum::<usize>(),
            rows.iter().map(|row| row.goto.len()).sum::<usize>(),
        );

        Ok(Self {
            terminals: rules.terminals(),
            non_terminals: rules.non_terminals(),
            rules,
            first,
            follow,
            states,
            rows,
        })
    }

    /// The augmented grammar, whose rule ids label reductions.
    pub fn rules(&self) -> &AugmentedGrammar {
        &self.rules
    }

    pub fn first(&self) -> &FirstSets {
        &self.first
    }

    pub fn follow(&self) -> &FollowSets {
        &self.follow
    }

    /// The canonical collection, indexed by state.
    pub fn states(&self) -> &[ItemSet] {
        &self.states
    }

    /// ACTION columns, terminals then $.
    pub fn terminals(&self) -> &[SymbolId] {
        &self.terminals
    }

    /// GOTO columns, the synthetic start symbol first.
    pub fn non_terminals(&self) -> &[SymbolId] {
        &self.non_terminals
    }
}
