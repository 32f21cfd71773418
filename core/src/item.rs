use std::collections::BTreeSet;

use itertools::Itertools;

use crate::{
    traits::SymbolSlice, AugmentedGrammar, FirstSets, Rule, RuleId, SymbolId, EOS_ID,
};

pub type ItemSetId = usize;

/// A LR(1) item.
///
/// Items are ordered by (rule, position, lookahead), which is the
/// canonical key used to compare item sets.
///
/// # Example
/// [A -> w • x, a]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub rule: RuleId,
    pub position: usize,
    pub lookahead: SymbolId,
}

impl Rule {
    /// The rule's item with the dot at the given position.
    pub fn at(&self, position: usize, lookahead: SymbolId) -> Option<Item> {
        (position <= self.rhs.len()).then_some(Item {
            rule: self.id,
            position,
            lookahead,
        })
    }
}

impl Item {
    /// Check if we reached the end of a rule.
    ///
    /// # Example
    /// A -> w •
    pub fn is_exhausted(&self, rules: &AugmentedGrammar) -> bool {
        self.position >= rules.borrow_rule(self.rule).rhs.len()
    }

    /// Returns the symbol right after the dot.
    /// If A -> w •, then returns None.
    pub fn symbol(&self, rules: &AugmentedGrammar) -> Option<SymbolId> {
        rules.borrow_rule(self.rule).rhs.get(self.position).copied()
    }

    /// The symbols following the one after the dot (β in A -> α • X β).
    pub fn tail<'r>(&self, rules: &'r AugmentedGrammar) -> &'r [SymbolId] {
        let rhs = &rules.borrow_rule(self.rule).rhs;
        rhs.get(self.position + 1..).unwrap_or_default()
    }

    /// Returns the item with the dot moved one symbol forward.
    ///
    /// Returns None, if the current rule is exhausted.
    ///
    /// # Example
    /// (A -> • w eof).next() -> (A -> w • eof)
    pub fn next(&self, rules: &AugmentedGrammar) -> Option<Self> {
        rules
            .borrow_rule(self.rule)
            .at(self.position + 1, self.lookahead)
    }

    /// True for [S' -> S •, $]
    pub fn is_accepting(&self, rules: &AugmentedGrammar) -> bool {
        self.rule == rules.start_rule().id
            && self.lookahead == EOS_ID
            && self.is_exhausted(rules)
    }

    pub fn display<'a>(&'a self, rules: &'a AugmentedGrammar) -> ItemDisplay<'a> {
        ItemDisplay { item: self, rules }
    }
}

pub struct ItemDisplay<'a> {
    item: &'a Item,
    rules: &'a AugmentedGrammar,
}

impl std::fmt::Display for ItemDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rule = self.rules.borrow_rule(self.item.rule);
        let mut rhs = rule
            .rhs
            .iter()
            .enumerate()
            .map(|(pos, &sym)| {
                let name = self.rules.name(sym);
                if pos == self.item.position {
                    format!("• {name}")
                } else {
                    name.to_string()
                }
            })
            .join(" ");

        if self.item.position >= rule.rhs.len() {
            if !rhs.is_empty() {
                rhs.push(' ');
            }
            rhs.push('•');
        }

        write!(
            f,
            "[{} -> {}, {}]",
            self.rules.name(rule.lhs),
            rhs,
            self.rules.name(self.item.lookahead)
        )
    }
}

/// A set of LR(1) items, a state of the automaton.
///
/// Two sets are equal when they hold the same items, regardless of the
/// order in which the items were produced.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct ItemSet(BTreeSet<Item>);

impl FromIterator<Item> for ItemSet {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl ItemSet {
    /// The kernel of state 0: [S' -> • S, $]
    pub fn start(rules: &AugmentedGrammar) -> Self {
        rules.start_rule().at(0, EOS_ID).into_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over all items within the set, by canonical order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Item> {
        self.0.iter()
    }

    /// Iterate over all exhausted items (A -> w •)
    pub fn iter_exhausted_items<'a>(
        &'a self,
        rules: &'a AugmentedGrammar,
    ) -> impl Iterator<Item = &'a Item> + 'a {
        self.iter().filter(move |item| item.is_exhausted(rules))
    }

    /// Close the item set
    ///
    /// For every [A -> α • B β, a] and every rule B -> γ, adds
    /// [B -> • γ, l] for each l in FIRST(β a), until nothing is added.
    pub fn closure(&self, rules: &AugmentedGrammar, first: &FirstSets) -> Self {
        let mut items = self.0.clone();
        let mut stack: Vec<Item> = items.iter().copied().collect();

        while let Some(item) = stack.pop() {
            let Some(sym) = item
                .symbol(rules)
                .filter(|&sym| rules.is_non_terminal(sym))
            else {
                continue;
            };

            let lookaheads = first.lookaheads(item.tail(rules), item.lookahead);

            for rule in rules.iter_by_symbol(sym) {
                for &lookahead in lookaheads.iter() {
                    if let Some(spawned) = rule.at(0, lookahead) {
                        if items.insert(spawned) {
                            stack.push(spawned);
                        }
                    }
                }
            }
        }

        Self(items)
    }

    /// Moves the dot over `symbol` in every item expecting it, then closes the result.
    ///
    /// Returns an empty set if no item expects the symbol.
    pub fn goto(&self, symbol: SymbolId, rules: &AugmentedGrammar, first: &FirstSets) -> Self {
        let kernel: ItemSet = self
            .iter()
            .filter(|item| item.symbol(rules) == Some(symbol))
            .flat_map(|item| item.next(rules))
            .collect();

        if kernel.is_empty() {
            return kernel;
        }

        kernel.closure(rules, first)
    }

    pub fn display<'a>(&'a self, rules: &'a AugmentedGrammar) -> ItemSetDisplay<'a> {
        ItemSetDisplay { set: self, rules }
    }
}

/// One item per line.
pub struct ItemSetDisplay<'a> {
    set: &'a ItemSet,
    rules: &'a AugmentedGrammar,
}

impl std::fmt::Display for ItemSetDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.set
                .iter()
                .map(|item| item.display(self.rules).to_string())
                .join("\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        fixtures::FIXTURE_ASSIGNMENT_GRAMMAR, traits::SymbolSlice as _, AugmentedGrammar,
        FirstSets, Grammar, ItemSet,
    };

    fn setup(text: &str) -> (AugmentedGrammar, FirstSets) {
        let rules = AugmentedGrammar::new(&Grammar::parse(text).unwrap());
        let first = FirstSets::new(&rules);
        (rules, first)
    }

    fn rendered(set: &ItemSet, rules: &AugmentedGrammar) -> Vec<String> {
        set.iter().map(|item| item.display(rules).to_string()).collect()
    }

    #[test]
    fn test_001_item_set_closure() {
        let (rules, first) = setup(FIXTURE_ASSIGNMENT_GRAMMAR);
        let i0 = ItemSet::start(&rules).closure(&rules, &first);

        assert_eq!(
            rendered(&i0, &rules),
            vec![
                "[S' -> • S, $]",
                "[S -> • L = R, $]",
                "[S -> • R, $]",
                "[L -> • * R, $]",
                "[L -> • * R, =]",
                "[L -> • id, $]",
                "[L -> • id, =]",
                "[R -> • L, $]",
            ]
        );
    }

    #[test]
    fn test_002_closure_idempotence() {
        let (rules, first) = setup(FIXTURE_ASSIGNMENT_GRAMMAR);
        let i0 = ItemSet::start(&rules).closure(&rules, &first);

        assert_eq!(i0.closure(&rules, &first), i0);
    }

    #[test]
    fn test_003_goto() {
        let (rules, first) = setup(FIXTURE_ASSIGNMENT_GRAMMAR);
        let i0 = ItemSet::start(&rules).closure(&rules, &first);
        let l = rules.get_symbol_id("L").unwrap();
        let eq = rules.get_symbol_id("=").unwrap();

        let on_l = i0.goto(l, &rules, &first);
        assert_eq!(
            rendered(&on_l, &rules),
            vec!["[S -> L • = R, $]", "[R -> L •, $]"]
        );

        assert!(i0.goto(eq, &rules, &first).is_empty());
    }

    #[test]
    fn test_004_value_equality() {
        let (rules, first) = setup(FIXTURE_ASSIGNMENT_GRAMMAR);
        let i0 = ItemSet::start(&rules).closure(&rules, &first);

        let reversed: ItemSet = i0.iter().rev().copied().collect();
        assert_eq!(reversed, i0);
    }

    #[test]
    fn test_005_epsilon_item_is_exhausted() {
        let (rules, first) = setup("S -> A b\nA -> a | ε");
        let i0 = ItemSet::start(&rules).closure(&rules, &first);

        let exhausted: Vec<_> = i0
            .iter_exhausted_items(&rules)
            .map(|item| item.display(&rules).to_string())
            .collect();

        assert_eq!(exhausted, vec!["[A -> •, b]"]);
    }
}
