use thiserror::Error;

/// Errors that can occur while reading values off the wire
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The reader ran out of bytes before the value was complete
    #[error("Unexpected end of buffer: needed {needed} bytes at offset {offset}, only {remaining} remaining")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A tag byte did not match any known variant
    #[error("Invalid {type_name} tag: {tag}")]
    InvalidTag { type_name: &'static str, tag: u8 },

    /// A bool was encoded as something other than 0 or 1
    #[error("Invalid bool byte: {byte}")]
    InvalidBool { byte: u8 },
}
