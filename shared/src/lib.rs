//! # Snapnet Shared
//! Replicated variables and the snapshot machinery that carries their deltas
//! between a sender and its peers.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use snapnet_serde::{
    ByteCounter, ByteReader, ByteWrite, ByteWriter, ConstByteLength, Serde, SerdeErr,
};

mod config;
mod registry;
mod snapshot;
mod tick;
mod transport;
mod types;
mod variable;

#[cfg(test)]
mod test_fixtures;

pub use config::{AllocationPolicy, ApplyPolicy, SnapshotConfig};
pub use registry::{resolve_variable, ComponentSet, ObjectRegistry, ReplicatedComponent};
pub use snapshot::{
    arena::{ArenaRegion, SnapshotArena, MAX_ARENA_CAPACITY},
    directory::VariableDirectory,
    entry::SnapshotEntry,
    error::{ProtocolError, SnapshotError},
    key::VariableKey,
    message::{snapshot_length, write_snapshot, IncomingSnapshot},
    receiver::{ReceiveReport, ReceiveStats, SnapshotReceiver},
    session::{SnapshotSession, TickReport},
    transmitter::{SnapshotTransmitter, TransmitStats},
};
pub use tick::{tick_greater_than, tick_less_than};
pub use transport::{error::TransportError, ConnectionManager, SnapshotTransport, TickClock};
pub use types::{ChannelIndex, ComponentIndex, ObjectId, PeerId, Tick, VariableIndex, NO_TICK};
pub use variable::{
    error::VariableError,
    list_event::{ListEvent, ListEventType},
    notifier::{ChangeNotifier, ObserverId},
    replicated_list::ReplicatedList,
    replicated_value::{ReplicatedValue, ValueChange},
    replicated_variable::ReplicatedVariable,
};
