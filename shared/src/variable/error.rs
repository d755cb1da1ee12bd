use thiserror::Error;

use snapnet_serde::SerdeErr;

/// Errors that can occur while mutating, encoding or decoding a replicated variable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariableError {
    /// Index outside of the list bounds
    #[error("Index {index} is out of range for a list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A list event arrived with a negative index
    #[error("Received negative list index {index}")]
    NegativeIndex { index: i32 },

    /// A count or index does not fit its fixed-width wire field
    #[error("{what} {count} does not fit in its wire field")]
    LengthOverflow { what: &'static str, count: usize },

    /// The payload could not be parsed
    #[error("Malformed variable payload: {0}")]
    Serde(#[from] SerdeErr),
}
