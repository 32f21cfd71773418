/// Index of a symbol in its grammar's symbol table.
pub type SymbolId = usize;

pub const EPSILON: &str = "ε";
pub const EOS: &str = "$";

/// Reserved slots of every symbol table.
pub const EPSILON_ID: SymbolId = 0;
pub const EOS_ID: SymbolId = 1;

#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub enum SymbolKind {
    Terminal,
    NonTerminal,
    /// The synthetic start symbol of an augmented grammar (S').
    Start,
    EOS,
    Epsilon,
}

/// Defines a symbol
#[derive(Debug, Eq, PartialEq, Clone, Hash)]
pub struct Symbol {
    pub name: String,
    kind: SymbolKind,
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn term(name: impl Into<String>) -> Self {
        Self::new(name, SymbolKind::Terminal)
    }

    pub fn nterm(name: impl Into<String>) -> Self {
        Self::new(name, SymbolKind::NonTerminal)
    }

    /// Creates the end-of-stream marker ($)
    pub fn eos() -> Self {
        Self::new(EOS, SymbolKind::EOS)
    }

    /// Creates the epsilon marker (ε)
    ///
    /// This is used for empty rule such as A -> ε ;
    pub fn epsilon() -> Self {
        Self::new(EPSILON, SymbolKind::Epsilon)
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// Terminals and the end-of-stream marker can label an ACTION column.
    #[inline(always)]
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, SymbolKind::EOS | SymbolKind::Terminal)
    }

    #[inline(always)]
    pub fn is_non_terminal(&self) -> bool {
        matches!(self.kind, SymbolKind::NonTerminal | SymbolKind::Start)
    }

    #[inline(always)]
    pub fn is_eos(&self) -> bool {
        matches!(self.kind, SymbolKind::EOS)
    }

    #[inline(always)]
    pub fn is_epsilon(&self) -> bool {
        matches!(self.kind, SymbolKind::Epsilon)
    }
}

pub mod traits {
    use super::{Symbol, SymbolId};

    /// Common lookups for objects holding a symbol table.
    pub trait SymbolSlice: AsRef<[Symbol]> {
        fn as_symbol_slice(&self) -> &[Symbol] {
            self.as_ref()
        }

        /// # Panics
        /// Panics if the identifier does not belong to the table.
        fn sym(&self, id: SymbolId) -> &Symbol {
            &self.as_ref()[id]
        }

        fn name(&self, id: SymbolId) -> &str {
            &self.sym(id).name
        }

        fn get_symbol_id(&self, name: &str) -> Option<SymbolId> {
            self.as_ref().iter().position(|sym| sym.name == name)
        }

        fn is_terminal(&self, id: SymbolId) -> bool {
            self.sym(id).is_terminal()
        }

        fn is_non_terminal(&self, id: SymbolId) -> bool {
            self.sym(id).is_non_terminal()
        }

        fn symbol_count(&self) -> usize {
            self.as_ref().len()
        }
    }

    impl<T> SymbolSlice for T where T: AsRef<[Symbol]> + ?Sized {}
}
