use std::collections::HashMap;

use log::{debug, log_enabled, trace, warn, Level};

use snapnet_serde::ByteReader;

use crate::{
    config::{ApplyPolicy, SnapshotConfig},
    registry::{resolve_variable, ObjectRegistry},
    ObjectId, Tick,
};

use super::{
    arena::SnapshotArena,
    directory::VariableDirectory,
    entry::SnapshotEntry,
    error::SnapshotError,
    key::VariableKey,
    message::IncomingSnapshot,
};

/// What happened to the entries of one received message
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReceiveReport {
    pub entries: usize,
    /// Handed to their variable
    pub applied: usize,
    /// Never written by the sender
    pub unwritten: usize,
    /// Already applied at this tick
    pub stale: usize,
    /// Object or component not present locally
    pub unresolved: usize,
    /// Rejected by their variable
    pub failed: usize,
}

/// Running totals of a SnapshotReceiver
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReceiveStats {
    pub messages: u64,
    pub entries_applied: u64,
    pub entries_unwritten: u64,
    pub entries_stale: u64,
    pub entries_unresolved: u64,
    pub entries_failed: u64,
}

impl ReceiveStats {
    fn absorb(&mut self, report: &ReceiveReport) {
        self.messages += 1;
        self.entries_applied += report.applied as u64;
        self.entries_unwritten += report.unwritten as u64;
        self.entries_stale += report.stale as u64;
        self.entries_unresolved += report.unresolved as u64;
        self.entries_failed += report.failed as u64;
    }
}

/// Mirrors the sender's directory and arena and dispatches each received
/// payload to the local variable it belongs to
pub struct SnapshotReceiver {
    directory: VariableDirectory,
    arena: SnapshotArena,
    // tick of the payload last handed to each variable
    applied_ticks: HashMap<VariableKey, Tick>,
    apply_policy: ApplyPolicy,
    max_incoming_entries: usize,
    keep_dirty: bool,
    stats: ReceiveStats,
}

impl SnapshotReceiver {
    pub fn new(config: &SnapshotConfig) -> Self {
        let directory = match config.max_directory_entries {
            Some(max_entries) => VariableDirectory::with_bound(max_entries),
            None => VariableDirectory::new(),
        };
        Self {
            directory,
            arena: SnapshotArena::new(config.arena_capacity, config.allocation),
            applied_ticks: HashMap::new(),
            apply_policy: config.apply_policy,
            max_incoming_entries: config.max_incoming_entries,
            keep_dirty: config.keep_received_dirty,
            stats: ReceiveStats::default(),
        }
    }

    pub fn directory(&self) -> &VariableDirectory {
        &self.directory
    }

    pub fn arena(&self) -> &SnapshotArena {
        &self.arena
    }

    pub fn stats(&self) -> &ReceiveStats {
        &self.stats
    }

    /// Tick of the payload last applied to the variable `key` names
    pub fn applied_tick(&self, key: &VariableKey) -> Option<Tick> {
        self.applied_ticks.get(key).copied()
    }

    /// Process one snapshot message.
    ///
    /// The message is parsed and validated before anything is touched, so a
    /// `ProtocolError` means nothing was applied. Then, in encounter order,
    /// each entry updates its mirror entry and its payload is copied into the
    /// local arena; finally every written entry is resolved through
    /// `registry` and handed to its variable.
    ///
    /// An entry whose object is not spawned locally, or whose variable
    /// rejects the payload, is counted and left unapplied, so a
    /// retransmission of the same tick is tried again. The other entries are
    /// still dispatched.
    pub fn receive(
        &mut self,
        bytes: &[u8],
        registry: &mut dyn ObjectRegistry,
    ) -> Result<ReceiveReport, SnapshotError> {
        let snapshot = IncomingSnapshot::parse(bytes, self.max_incoming_entries)?;
        debug!("Got {} snapshot entries", snapshot.entries().len());

        let mut report = ReceiveReport {
            entries: snapshot.entries().len(),
            ..Default::default()
        };

        let mut slots = Vec::with_capacity(snapshot.entries().len());
        for incoming in snapshot.entries() {
            let slot = self.directory.find_or_add(incoming.key)?;
            let mirror = &mut self.directory[slot];

            // unwritten entries carry no region, parse guarantees it
            self.arena.fit_entry(mirror, usize::from(incoming.length))?;
            mirror.tick_written = incoming.tick_written;
            if incoming.is_written() {
                self.arena
                    .write(mirror.position, snapshot.payload_of(incoming))?;
            }
            slots.push(slot);
        }

        for slot in slots {
            let entry = self.directory[slot];
            if !entry.is_written() {
                report.unwritten += 1;
                continue;
            }
            if self.apply_policy == ApplyPolicy::ChangedTickOnly
                && self.applied_tick(&entry.key) == Some(entry.tick_written)
            {
                report.stale += 1;
                continue;
            }

            match self.apply(&entry, registry) {
                Ok(true) => {
                    self.applied_ticks.insert(entry.key, entry.tick_written);
                    report.applied += 1;
                }
                Ok(false) => {
                    debug!(
                        "Skipping snapshot entry for unknown variable {:?}",
                        entry.key
                    );
                    report.unresolved += 1;
                }
                Err(SnapshotError::Variable { key, source }) => {
                    warn!("Variable {:?} rejected its snapshot payload: {}", key, source);
                    report.failed += 1;
                }
                Err(error) => return Err(error),
            }
        }

        self.stats.absorb(&report);
        if log_enabled!(Level::Trace) {
            trace!("{}", self.directory.debug_table("Received Entries"));
        }
        Ok(report)
    }

    /// Forget the mirror entries of a despawned object and release their
    /// regions. Returns the number of entries removed.
    pub fn remove_object(&mut self, object_id: ObjectId) -> usize {
        let removed = self.directory.remove_object(object_id);
        for entry in &removed {
            self.arena.free(entry.position, entry.length);
        }
        self.applied_ticks
            .retain(|key, _| key.object_id != object_id);
        removed.len()
    }

    // Returns false if the variable could not be resolved
    fn apply(
        &self,
        entry: &SnapshotEntry,
        registry: &mut dyn ObjectRegistry,
    ) -> Result<bool, SnapshotError> {
        let Some(variable) = resolve_variable(registry, &entry.key) else {
            return Ok(false);
        };
        let payload = self.arena.read(entry.position, usize::from(entry.length))?;
        let mut reader = ByteReader::new(payload);
        variable
            .read_delta(&mut reader, self.keep_dirty)
            .map_err(|source| SnapshotError::Variable {
                key: entry.key,
                source,
            })?;
        Ok(true)
    }
}
