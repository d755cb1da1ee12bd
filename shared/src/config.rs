use std::default::Default;

use crate::ChannelIndex;

/// How a SnapshotArena hands out and takes back regions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AllocationPolicy {
    /// Monotonic bump allocation. Vacated regions are never reused, so a
    /// long-lived session eventually hits `ArenaExhausted`.
    Bump,
    /// First-fit reuse of vacated regions, which are coalesced on free. Live
    /// regions are never moved.
    #[default]
    FreeList,
}

/// When the receiver hands a payload to its variable
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ApplyPolicy {
    /// Apply every written entry of every message
    Always,
    /// Apply an entry only when its tick differs from the tick last applied
    /// to the same variable. The sender retransmits its whole arena each tick
    /// and only restamps an entry when it stores a new delta, so this keeps a
    /// delta from being applied more than once.
    #[default]
    ChangedTickOnly,
}

/// Contains Config properties which will be used by a SnapshotSession
#[derive(Clone, Debug)]
pub struct SnapshotConfig {
    /// Capacity in bytes of each arena (sender and receiver mirror). Clamped
    /// to `u16::MAX`, since positions and lengths are 16-bit on the wire.
    pub arena_capacity: usize,
    /// Upper bound on the number of entries in each directory. `None` lets
    /// the directory grow until the wire limit of `i16::MAX` entries.
    pub max_directory_entries: Option<usize>,
    /// Allocation strategy of both arenas
    pub allocation: AllocationPolicy,
    /// Duplicate-delta suppression on the receiving side
    pub apply_policy: ApplyPolicy,
    /// Incoming messages announcing more entries than this are rejected
    pub max_incoming_entries: usize,
    /// Channel passed to the transport for every snapshot message
    pub snapshot_channel: ChannelIndex,
    /// Randomize peer order each tick so no peer is always served first
    pub shuffle_peers: bool,
    /// Keep received events in the local dirty logs so they can be forwarded
    /// to further peers
    pub keep_received_dirty: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            arena_capacity: 20_000,
            max_directory_entries: None,
            allocation: AllocationPolicy::default(),
            apply_policy: ApplyPolicy::default(),
            max_incoming_entries: 4096,
            snapshot_channel: 0,
            shuffle_peers: true,
            keep_received_dirty: false,
        }
    }
}
