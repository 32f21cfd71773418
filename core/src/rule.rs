use itertools::Itertools;
use log::debug;

use crate::{
    symbol::EPSILON, traits::SymbolSlice, Grammar, Symbol, SymbolId, SymbolKind, EOS_ID,
};

/// The rule's identifier in the grammar.
///
/// In an augmented grammar, rule 0 is the synthetic start rule.
pub type RuleId = usize;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
/// A grammar rule
///
/// An empty right-hand side stands for an ε-production.
///
/// # Example
/// A -> w
pub struct Rule {
    pub id: RuleId,
    pub lhs: SymbolId,
    pub rhs: Vec<SymbolId>,
}

impl Rule {
    pub fn new(id: RuleId, lhs: SymbolId, rhs: Vec<SymbolId>) -> Self {
        Self { id, lhs, rhs }
    }

    /// True for A -> ε
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }

    /// Renders the rule with the symbol names of the given table.
    pub fn display<'a, S>(&'a self, symbols: &'a S) -> RuleDisplay<'a, S>
    where
        S: SymbolSlice + ?Sized,
    {
        RuleDisplay {
            rule: self,
            symbols,
        }
    }
}

pub struct RuleDisplay<'a, S: ?Sized> {
    rule: &'a Rule,
    symbols: &'a S,
}

impl<S> std::fmt::Display for RuleDisplay<'_, S>
where
    S: SymbolSlice + ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> ", self.symbols.name(self.rule.lhs))?;

        if self.rule.is_empty() {
            write!(f, "{}", EPSILON)
        } else {
            write!(
                f,
                "{}",
                self.rule.rhs.iter().map(|&sym| self.symbols.name(sym)).join(" ")
            )
        }
    }
}

/// A grammar augmented with a synthetic start rule `S' -> S`.
///
/// This object is used to generate parser tables. The synthetic rule is
/// always rule 0, declared rules keep their order and are shifted by one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentedGrammar {
    symbols: Vec<Symbol>,
    rules: Vec<Rule>,
    start: SymbolId,
}

impl AsRef<[Symbol]> for AugmentedGrammar {
    fn as_ref(&self) -> &[Symbol] {
        &self.symbols
    }
}

impl From<&Grammar> for AugmentedGrammar {
    fn from(grammar: &Grammar) -> Self {
        Self::new(grammar)
    }
}

impl AugmentedGrammar {
    pub fn new(grammar: &Grammar) -> Self {
        let mut symbols = grammar.as_symbol_slice().to_vec();

        let mut name = format!("{}'", grammar.start_symbol());
        while symbols.get_symbol_id(&name).is_some() {
            name.push('\'');
        }

        let start = symbols.len();
        symbols.push(Symbol::new(name, SymbolKind::Start));

        let rules = std::iter::once(Rule::new(0, start, vec![grammar.start()]))
            .chain(
                grammar
                    .rules()
                    .iter()
                    .map(|rule| Rule::new(rule.id + 1, rule.lhs, rule.rhs.clone())),
            )
            .collect::<Vec<_>>();

        debug!(
            "augmented grammar: start symbol {}, {} rules",
            symbols[start],
            rules.len()
        );

        Self {
            symbols,
            rules,
            start,
        }
    }

    /// The synthetic start symbol (S').
    pub fn start(&self) -> SymbolId {
        self.start
    }

    /// The synthetic start rule (S' -> S).
    pub fn start_rule(&self) -> &Rule {
        &self.rules[0]
    }

    /// Iterate over all rules of the grammar
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Iterate over the rules deriving the given symbol.
    pub fn iter_by_symbol(&self, sym: SymbolId) -> impl Iterator<Item = &Rule> + '_ {
        self.iter().filter(move |rule| rule.lhs == sym)
    }

    /// # Panics
    /// Panics if the rule does not exist.
    pub fn borrow_rule(&self, id: RuleId) -> &Rule {
        &self.rules[id]
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// ACTION columns: terminals in order of first appearance, then $.
    pub fn terminals(&self) -> Vec<SymbolId> {
        self.symbols
            .iter()
            .enumerate()
            .filter(|(_, sym)| sym.kind() == SymbolKind::Terminal)
            .map(|(id, _)| id)
            .chain(std::iter::once(EOS_ID))
            .collect()
    }

    /// GOTO columns: the synthetic start symbol, then declared non-terminals.
    pub fn non_terminals(&self) -> Vec<SymbolId> {
        std::iter::once(self.start)
            .chain(
                self.symbols
                    .iter()
                    .enumerate()
                    .filter(|(_, sym)| sym.kind() == SymbolKind::NonTerminal)
                    .map(|(id, _)| id),
            )
            .collect()
    }

    /// Every symbol an item's dot can move over, terminals first.
    pub fn iter_symbols(&self) -> impl Iterator<Item = SymbolId> {
        let terminals = self.terminals();
        let non_terminals = self.non_terminals();
        terminals
            .into_iter()
            .filter(|&sym| sym != EOS_ID)
            .chain(non_terminals)
    }
}
