use thiserror::Error;

use snapnet_serde::SerdeErr;

use crate::variable::error::VariableError;

use super::key::VariableKey;

/// Errors that reject an incoming snapshot message as a whole. Nothing of a
/// rejected message is applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The index announced a negative number of entries
    #[error("Snapshot index announced a negative entry count: {count}")]
    NegativeEntryCount { count: i16 },

    /// The index announced more entries than this receiver accepts
    #[error("Snapshot index announced {count} entries, limit is {max}")]
    EntryCountTooLarge { count: usize, max: usize },

    /// The index ended before all announced entries were read
    #[error("Truncated snapshot index: {0}")]
    Truncated(#[from] SerdeErr),

    /// The payload region is larger than any arena can be
    #[error("Snapshot payload of {length} bytes exceeds the maximum arena size")]
    PayloadTooLarge { length: usize },

    /// A never-written entry claims a payload region
    #[error("Unwritten entry {key:?} claims a payload of {length} bytes")]
    UnwrittenEntryWithPayload { key: VariableKey, length: u16 },

    /// An entry points outside of the payload region carried by the message
    #[error("Entry {key:?} covers [{position}, {position}+{length}) but the payload is {payload_length} bytes")]
    PayloadOutOfBounds {
        key: VariableKey,
        position: u16,
        length: u16,
        payload_length: usize,
    },
}

/// Errors raised by the directory, the arena and the snapshot drivers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The arena has no room left for a region of the requested size
    #[error("Snapshot arena exhausted: requested {requested} bytes with cursor at {cursor} of {capacity}")]
    ArenaExhausted {
        requested: usize,
        cursor: usize,
        capacity: usize,
    },

    /// The directory reached its configured bound
    #[error("Variable directory is full ({capacity} entries)")]
    CapacityExceeded { capacity: usize },

    /// The directory holds more entries than the index can describe
    #[error("Variable directory holds {count} entries, more than an index can carry")]
    TooManyEntries { count: usize },

    /// A read or write touched bytes past the arena cursor
    #[error("Arena access [{position}, {position}+{length}) is past the cursor at {cursor}")]
    RegionOutOfBounds {
        position: usize,
        length: usize,
        cursor: usize,
    },

    /// Tick 0 marks never-written entries and cannot carry a payload
    #[error("Cannot store a payload at the reserved tick 0")]
    ReservedTick,

    /// A single payload does not fit a 16-bit length
    #[error("Payload of {length} bytes does not fit in a snapshot entry")]
    PayloadTooLarge { length: usize },

    /// An incoming message was malformed
    #[error("Snapshot protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A variable failed to encode or decode its payload
    #[error("Variable {key:?} failed: {source}")]
    Variable {
        key: VariableKey,
        #[source]
        source: VariableError,
    },
}
