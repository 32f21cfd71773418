use crate::{symbol::EOS, ClrResult, ErrorKind};

/// A whitespace-delimited input token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'stream> {
    pub value: &'stream str,
    /// Index of the token in the input.
    pub position: usize,
}

impl<'stream> Token<'stream> {
    pub fn new(value: &'stream str, position: usize) -> Self {
        Self { value, position }
    }
}

/// Splits the input on whitespace.
///
/// The end marker is reserved: the parser appends it by itself.
pub fn tokenize(input: &str) -> ClrResult<Vec<Token<'_>>> {
    input
        .split_whitespace()
        .enumerate()
        .map(|(position, value)| {
            if value == EOS {
                Err(ErrorKind::ReservedSymbol(value.to_string()).into())
            } else {
                Ok(Token::new(value, position))
            }
        })
        .collect()
}
