use itertools::Itertools as _;
use thiserror::Error;

use crate::{lr::Action, trace::ParseTrace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedSymbols(Vec<String>);

impl ExpectedSymbols {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl std::fmt::Display for ExpectedSymbols {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.iter().join(", ").fmt(f)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("malformed rule at line {line}: `{text}`, expecting `LHS -> RHS | ...`")]
    MalformedRule { line: usize, text: String },

    #[error("the grammar does not declare any rule")]
    EmptyGrammar,

    #[error("the symbol {0} is reserved")]
    ReservedSymbol(String),

    #[error("grammar is not CLR(1): conflict on symbol {symbol} in state {state} [{} / {}]", .conflict[0], .conflict[1])]
    Conflict {
        state: usize,
        symbol: String,
        conflict: [Action; 2],
    },

    #[error("parse error at token {token} (position {position}), expecting {expecting}")]
    UnexpectedToken {
        token: String,
        position: usize,
        expecting: ExpectedSymbols,
    },

    #[error("no goto entry for {symbol} in state {state}")]
    MissingGoto { state: usize, symbol: String },
}

impl ErrorKind {
    pub fn malformed_rule(line: usize, text: &str) -> Self {
        Self::MalformedRule {
            line,
            text: text.to_string(),
        }
    }

    pub fn unexpected_token<I, S>(token: &str, position: usize, expecting: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self::UnexpectedToken {
            token: token.to_string(),
            position,
            expecting: ExpectedSymbols(expecting.into_iter().map(|s| s.to_string()).collect()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}")]
pub struct ClrError {
    /// Kind of error
    kind: ErrorKind,
    /// Steps taken by the parser before it halted.
    trace: Option<ParseTrace>,
}

impl ClrError {
    pub fn new(kind: impl Into<ErrorKind>, trace: Option<ParseTrace>) -> Self {
        Self {
            kind: kind.into(),
            trace,
        }
    }
}

impl From<ErrorKind> for ClrError {
    fn from(kind: ErrorKind) -> Self {
        Self { kind, trace: None }
    }
}

impl ClrError {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The trace recorded up to the failing step, if the error was raised while parsing.
    pub fn partial_trace(&self) -> Option<&ParseTrace> {
        self.trace.as_ref()
    }
}
