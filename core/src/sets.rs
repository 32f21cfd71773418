use std::collections::BTreeSet;

use itertools::Itertools;
use log::debug;

use crate::{traits::SymbolSlice, AugmentedGrammar, SymbolId, EOS_ID, EPSILON_ID};

/// A set of terminals, possibly holding ε or $.
pub type TerminalSet = BTreeSet<SymbolId>;

/// FIRST(X) for every symbol of an augmented grammar.
///
/// FIRST of a terminal is the terminal itself, FIRST of a non-terminal
/// holds ε if it derives the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets(Vec<TerminalSet>);

impl FirstSets {
    pub fn new(rules: &AugmentedGrammar) -> Self {
        let mut sets: Vec<TerminalSet> = (0..rules.symbol_count())
            .map(|id| {
                if rules.is_non_terminal(id) {
                    TerminalSet::default()
                } else {
                    TerminalSet::from_iter([id])
                }
            })
            .collect();

        let mut passes = 0;
        loop {
            passes += 1;
            let mut changed = false;

            for rule in rules.iter() {
                let derived = first_of_sequence(&sets, &rule.rhs);
                let set = &mut sets[rule.lhs];
                let before = set.len();
                set.extend(derived);
                changed |= set.len() > before;
            }

            if !changed {
                break;
            }
        }

        debug!("FIRST sets converged after {passes} passes");
        Self(sets)
    }

    pub fn get(&self, symbol: SymbolId) -> &TerminalSet {
        &self.0[symbol]
    }

    pub fn is_nullable(&self, symbol: SymbolId) -> bool {
        self.0[symbol].contains(&EPSILON_ID)
    }

    /// FIRST(Y1 Y2 ... Yk), holding ε if every Yi is nullable (or k = 0).
    pub fn of_sequence(&self, symbols: &[SymbolId]) -> TerminalSet {
        first_of_sequence(&self.0, symbols)
    }

    /// Lookaheads of the items spawned by B in `A -> α·Bβ, a`.
    ///
    /// FIRST(β), where ε is replaced by the item's lookahead.
    pub fn lookaheads(&self, beta: &[SymbolId], lookahead: SymbolId) -> TerminalSet {
        let mut set = self.of_sequence(beta);
        if set.remove(&EPSILON_ID) {
            set.insert(lookahead);
        }
        set
    }

    pub fn display<'a, S>(&'a self, symbols: &'a S) -> SetsDisplay<'a, S>
    where
        S: SymbolSlice + ?Sized,
    {
        SetsDisplay {
            label: "FIRST",
            sets: &self.0,
            symbols,
        }
    }
}

fn first_of_sequence(sets: &[TerminalSet], symbols: &[SymbolId]) -> TerminalSet {
    let mut result = TerminalSet::default();

    for &sym in symbols {
        let first = &sets[sym];
        result.extend(first.iter().copied().filter(|&s| s != EPSILON_ID));

        if !first.contains(&EPSILON_ID) {
            return result;
        }
    }

    result.insert(EPSILON_ID);
    result
}

/// FOLLOW(A) for every non-terminal of an augmented grammar.
///
/// FOLLOW of the start symbol is seeded with $.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets(Vec<TerminalSet>);

impl FollowSets {
    pub fn new(rules: &AugmentedGrammar, first: &FirstSets) -> Self {
        let mut sets = vec![TerminalSet::default(); rules.symbol_count()];
        sets[rules.start()].insert(EOS_ID);

        let mut passes = 0;
        loop {
            passes += 1;
            let mut changed = false;

            for rule in rules.iter() {
                for (pos, &sym) in rule.rhs.iter().enumerate() {
                    if !rules.is_non_terminal(sym) {
                        continue;
                    }

                    // A -> αBβ: FIRST(β) \ {ε}, plus FOLLOW(A) if β is nullable.
                    let mut gained = first.of_sequence(&rule.rhs[pos + 1..]);
                    if gained.remove(&EPSILON_ID) {
                        gained.extend(sets[rule.lhs].iter().copied());
                    }

                    let set = &mut sets[sym];
                    let before = set.len();
                    set.extend(gained);
                    changed |= set.len() > before;
                }
            }

            if !changed {
                break;
            }
        }

        debug!("FOLLOW sets converged after {passes} passes");
        Self(sets)
    }

    pub fn get(&self, symbol: SymbolId) -> &TerminalSet {
        &self.0[symbol]
    }

    pub fn display<'a, S>(&'a self, symbols: &'a S) -> SetsDisplay<'a, S>
    where
        S: SymbolSlice + ?Sized,
    {
        SetsDisplay {
            label: "FOLLOW",
            sets: &self.0,
            symbols,
        }
    }
}

/// One `FIRST(X) = { a, b }` line per non-terminal.
pub struct SetsDisplay<'a, S: ?Sized> {
    label: &'static str,
    sets: &'a [TerminalSet],
    symbols: &'a S,
}

impl<S> std::fmt::Display for SetsDisplay<'_, S>
where
    S: SymbolSlice + ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (id, set) in self
            .sets
            .iter()
            .enumerate()
            .filter(|(id, _)| self.symbols.is_non_terminal(*id))
        {
            writeln!(
                f,
                "{}({}) = {{ {} }}",
                self.label,
                self.symbols.name(id),
                set.iter().map(|&sym| self.symbols.name(sym)).join(", ")
            )?;
        }

        Ok(())
    }
}
