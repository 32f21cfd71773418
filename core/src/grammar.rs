use std::collections::HashMap;
use std::str::FromStr;

use log::debug;

use crate::{
    symbol::{EOS, EPSILON},
    traits::SymbolSlice as _,
    ClrError, ClrResult, ErrorKind, Rule, Symbol, SymbolId,
};

/// Separates the left-hand side from the alternatives.
pub const ARROW: &str = "->";
/// Separates alternatives of the same left-hand side.
pub const ALTERNATIVE: &str = "|";
/// Lines starting with this marker are ignored.
pub const COMMENT: &str = "//";

/// A grammar rule group, as written on one line.
type Definition<'a> = (&'a str, Vec<Vec<&'a str>>);

#[derive(Debug, Clone, PartialEq, Eq)]
/// A context-free grammar
///
/// Built from a textual rule list, one rule group per line. Any symbol
/// never used as a left-hand side is a terminal.
///
/// # Example
///
/// ```grammar
/// // assignments
/// S -> L = R | R
/// L -> * R | id
/// R -> L
/// ```
///
/// ```
/// use clr1_core::Grammar;
///
/// let grammar = Grammar::parse("S -> L = R | R\nL -> * R | id\nR -> L").unwrap();
/// assert_eq!(grammar.rules().len(), 5);
/// ```
pub struct Grammar {
    /// Symbol table, ε and $ occupy the first two slots.
    symbols: Vec<Symbol>,
    rules: Vec<Rule>,
    start: SymbolId,
}

impl AsRef<[Symbol]> for Grammar {
    fn as_ref(&self) -> &[Symbol] {
        &self.symbols
    }
}

impl FromStr for Grammar {
    type Err = ClrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Grammar {
    pub fn parse(text: &str) -> ClrResult<Self> {
        let definitions = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with(COMMENT))
            .map(|(number, line)| parse_definition(number, line))
            .collect::<ClrResult<Vec<_>>>()?;

        if definitions.is_empty() {
            return Err(ErrorKind::EmptyGrammar.into());
        }

        // Classification waits for every rule: a symbol may be used before its definition.
        let mut symbols = vec![Symbol::epsilon(), Symbol::eos()];
        let mut ids = HashMap::<&str, SymbolId>::default();

        for (lhs, _) in definitions.iter() {
            ids.entry(*lhs).or_insert_with(|| {
                symbols.push(Symbol::nterm(*lhs));
                symbols.len() - 1
            });
        }

        for sym in definitions.iter().flat_map(|(_, alts)| alts.iter().flatten()) {
            ids.entry(*sym).or_insert_with(|| {
                symbols.push(Symbol::term(*sym));
                symbols.len() - 1
            });
        }

        let rules: Vec<Rule> = definitions
            .iter()
            .flat_map(|(lhs, alts)| alts.iter().map(move |alt| (*lhs, alt)))
            .enumerate()
            .map(|(id, (lhs, alt))| Rule::new(id, ids[lhs], alt.iter().map(|sym| ids[sym]).collect()))
            .collect();

        let start = ids[definitions[0].0];

        debug!(
            "grammar: {} rules, {} non-terminals, {} terminals",
            rules.len(),
            symbols.iter().filter(|sym| sym.is_non_terminal()).count(),
            symbols.iter().filter(|sym| sym.is_terminal() && !sym.is_eos()).count(),
        );

        Ok(Self {
            symbols,
            rules,
            start,
        })
    }

    /// The start symbol, left-hand side of the first declared rule.
    pub fn start(&self) -> SymbolId {
        self.start
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Terminals, in order of first appearance. Never includes ε or $.
    pub fn iter_terminals(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols
            .iter()
            .filter(|sym| sym.is_terminal() && !sym.is_eos())
    }

    /// Non-terminals, in order of first definition.
    pub fn iter_non_terminals(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|sym| sym.is_non_terminal())
    }

    pub fn start_symbol(&self) -> &Symbol {
        self.sym(self.start)
    }
}

/// Parses `LHS -> RHS1 | RHS2 | ...`, the line being already trimmed.
fn parse_definition(number: usize, line: &str) -> ClrResult<Definition<'_>> {
    let malformed = || ClrError::from(ErrorKind::malformed_rule(number, line));

    let (lhs, rhs) = line.split_once(ARROW).ok_or_else(malformed)?;
    let (lhs, rhs) = (lhs.trim(), rhs.trim());

    if lhs.is_empty() || rhs.is_empty() || lhs.split_whitespace().count() > 1 {
        return Err(malformed());
    }

    if lhs == EPSILON || lhs == EOS {
        return Err(ErrorKind::ReservedSymbol(lhs.to_string()).into());
    }

    let alts = rhs
        .split(ALTERNATIVE)
        .map(|alt| {
            if alt.trim().is_empty() {
                return Err(malformed());
            }

            alt.split_whitespace()
                .filter(|&sym| sym != EPSILON)
                .map(|sym| {
                    if sym == EOS {
                        Err(ErrorKind::ReservedSymbol(sym.to_string()).into())
                    } else {
                        Ok(sym)
                    }
                })
                .collect::<ClrResult<Vec<_>>>()
        })
        .collect::<ClrResult<Vec<_>>>()?;

    Ok((lhs, alts))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{fixtures::FIXTURE_ASSIGNMENT_GRAMMAR, traits::SymbolSlice as _, ErrorKind, Grammar};

    fn names<'a>(symbols: impl Iterator<Item = &'a crate::Symbol>) -> Vec<&'a str> {
        symbols.map(|sym| sym.name.as_str()).collect()
    }

    #[test]
    fn test_001_terminal_inference() {
        let grammar = Grammar::parse(FIXTURE_ASSIGNMENT_GRAMMAR).unwrap();

        assert_eq!(names(grammar.iter_terminals()), vec!["=", "*", "id"]);
        assert_eq!(names(grammar.iter_non_terminals()), vec!["S", "L", "R"]);
        assert_eq!(grammar.start_symbol().name, "S");
        assert_eq!(grammar.rules().len(), 5);
    }

    #[test]
    fn test_002_alternatives_share_lhs() {
        let grammar = Grammar::parse("S -> a S | b | ε").unwrap();
        let s = grammar.get_symbol_id("S").unwrap();

        assert_eq!(grammar.rules().len(), 3);
        assert!(grammar.rules().iter().all(|rule| rule.lhs == s));
        assert!(grammar.rules()[2].is_empty());
        assert_eq!(grammar.rules()[0].rhs.len(), 2);
    }

    #[test]
    fn test_003_comments_and_blank_lines() {
        let grammar = Grammar::parse(
            r#"
            // a comment
            S -> A

            // another one
            A -> x
            "#,
        )
        .unwrap();

        assert_eq!(grammar.rules().len(), 2);
        assert_eq!(names(grammar.iter_terminals()), vec!["x"]);
    }

    #[test]
    fn test_004_start_is_first_declared_lhs() {
        let grammar = Grammar::parse("Z -> A\nA -> a").unwrap();
        assert_eq!(grammar.start_symbol().name, "Z");
    }

    #[test]
    fn test_005_symbol_used_before_definition() {
        let grammar = Grammar::parse("S -> B c\nB -> b").unwrap();
        assert_eq!(names(grammar.iter_terminals()), vec!["c", "b"]);
        assert_eq!(names(grammar.iter_non_terminals()), vec!["S", "B"]);
    }

    #[test]
    fn test_006_malformed_rules() {
        for (text, line) in [("S a b", 1), ("S ->", 1), ("-> a", 1), ("S -> a\nA B -> c", 2), ("S -> a |", 1)] {
            let err = Grammar::parse(text).unwrap_err();
            assert!(
                matches!(err.kind(), ErrorKind::MalformedRule { line: l, .. } if *l == line),
                "{text}: {err}"
            );
        }
    }

    #[test]
    fn test_007_reserved_and_empty() {
        assert_eq!(
            Grammar::parse("S -> a $").unwrap_err().kind(),
            &ErrorKind::ReservedSymbol("$".into())
        );
        assert_eq!(
            Grammar::parse("ε -> a").unwrap_err().kind(),
            &ErrorKind::ReservedSymbol("ε".into())
        );
        assert_eq!(
            Grammar::parse("// nothing\n\n").unwrap_err().kind(),
            &ErrorKind::EmptyGrammar
        );
    }

    #[test]
    fn test_008_deterministic() {
        let a: Grammar = FIXTURE_ASSIGNMENT_GRAMMAR.parse().unwrap();
        let b: Grammar = FIXTURE_ASSIGNMENT_GRAMMAR.parse().unwrap();
        assert_eq!(a, b);
    }
}
