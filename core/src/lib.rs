//! Canonical LR(1) table construction and table-driven parsing.
//!
//! ```
//! use clr1_core::{Grammar, LrParser, LrTable};
//!
//! let grammar = Grammar::parse("S -> L = R | R\nL -> * R | id\nR -> L").unwrap();
//! let table = LrTable::build(&grammar).unwrap();
//! let trace = LrParser::new(&table).parse("id = * id").unwrap();
//!
//! assert!(trace.is_accepted());
//! ```
pub mod error;
pub mod grammar;
pub mod item;
pub mod lr;
pub mod rule;
pub mod sets;
pub mod symbol;
pub mod token;
pub mod trace;

pub use grammar::Grammar;
pub use item::*;
pub use rule::*;
pub use sets::{FirstSets, FollowSets, TerminalSet};
pub use symbol::{Symbol, SymbolId, SymbolKind, EOS_ID, EPSILON_ID};
pub use trace::{ParseTrace, StackCell, Step, StepAction};

pub use lr::{Action, LrParser, LrTable};

pub mod traits {
    pub use crate::lr::traits::LrTable;
    pub use crate::symbol::traits::SymbolSlice;
}

pub use error::{ClrError, ErrorKind};
pub type ClrResult<T> = Result<T, ClrError>;

/// Builds the parsing table of a grammar written as text.
pub fn build(text: &str) -> ClrResult<LrTable> {
    LrTable::build(&Grammar::parse(text)?)
}

#[cfg(test)]
pub mod fixtures {
    pub const FIXTURE_ASSIGNMENT_GRAMMAR: &str = r#"
        S -> L = R
        S -> R
        L -> * R
        L -> id
        R -> L
    "#;

    pub const FIXTURE_EXPR_GRAMMAR: &str = r#"
        // E' clashes with the synthetic start symbol.
        E -> T E'
        E' -> + T E' | ε
        T -> F T'
        T' -> * F T' | ε
        F -> ( E ) | id
    "#;

    pub const FIXTURE_DANGLING_ELSE_GRAMMAR: &str = r#"
        S -> if E then S | if E then S else S | other
        E -> b
    "#;

    pub const FIXTURE_AMBIGUOUS_GRAMMAR: &str = "E -> E + E | id";

    #[test]
    fn test_grammars() {
        for text in [
            FIXTURE_ASSIGNMENT_GRAMMAR,
            FIXTURE_EXPR_GRAMMAR,
            FIXTURE_DANGLING_ELSE_GRAMMAR,
            FIXTURE_AMBIGUOUS_GRAMMAR,
        ] {
            println!("{:#?}", crate::Grammar::parse(text).unwrap());
        }
    }
}
