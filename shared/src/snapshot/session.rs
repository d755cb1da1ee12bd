use log::{debug, info, warn};

use snapnet_serde::ByteWriter;

use crate::{
    config::SnapshotConfig,
    registry::{resolve_variable, ObjectRegistry},
    transport::{ConnectionManager, SnapshotTransport, TickClock},
    variable::replicated_variable::ReplicatedVariable,
    ObjectId, Tick, NO_TICK,
};

use super::{
    arena::SnapshotArena,
    directory::VariableDirectory,
    error::SnapshotError,
    key::VariableKey,
    receiver::{ReceiveReport, SnapshotReceiver},
    transmitter::SnapshotTransmitter,
};

/// What one call to `SnapshotSession::tick` did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: Tick,
    pub variables_stored: usize,
    pub messages_sent: usize,
    pub messages_received: usize,
    pub messages_rejected: usize,
    pub entries_applied: usize,
    pub entries_unresolved: usize,
    pub entries_failed: usize,
}

/// Owns both sides of the snapshot exchange for one endpoint: the sending
/// directory and arena with their transmitter, and the receiving mirror.
///
/// Nothing here is global; a process may run as many sessions as it likes.
pub struct SnapshotSession {
    config: SnapshotConfig,
    directory: VariableDirectory,
    arena: SnapshotArena,
    transmitter: SnapshotTransmitter,
    receiver: SnapshotReceiver,
    // variables checked for changes each tick
    tracked: Vec<VariableKey>,
    // stored since the last reset_stored
    stored: Vec<VariableKey>,
}

impl SnapshotSession {
    pub fn new(config: SnapshotConfig) -> Self {
        let directory = match config.max_directory_entries {
            Some(max_entries) => VariableDirectory::with_bound(max_entries),
            None => VariableDirectory::new(),
        };
        let arena = SnapshotArena::new(config.arena_capacity, config.allocation);
        let transmitter = SnapshotTransmitter::new(&config);
        let receiver = SnapshotReceiver::new(&config);
        info!(
            "Snapshot session started with an arena of {} bytes",
            arena.capacity()
        );
        Self {
            config,
            directory,
            arena,
            transmitter,
            receiver,
            tracked: Vec::new(),
            stored: Vec::new(),
        }
    }

    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    pub fn directory(&self) -> &VariableDirectory {
        &self.directory
    }

    pub fn arena(&self) -> &SnapshotArena {
        &self.arena
    }

    pub fn transmitter(&self) -> &SnapshotTransmitter {
        &self.transmitter
    }

    pub fn receiver(&self) -> &SnapshotReceiver {
        &self.receiver
    }

    pub fn tracked(&self) -> &[VariableKey] {
        &self.tracked
    }

    /// Have `tick` check this variable for changes. Tracking twice is a no-op.
    pub fn track(&mut self, key: VariableKey) {
        if !self.tracked.contains(&key) {
            self.tracked.push(key);
        }
    }

    /// Returns whether the key was tracked
    pub fn untrack(&mut self, key: &VariableKey) -> bool {
        let before = self.tracked.len();
        self.tracked.retain(|tracked| tracked != key);
        self.tracked.len() != before
    }

    /// Encode the pending delta of `variable` into the arena under `key`,
    /// stamped with `tick`. The entry's region is resized to the new payload.
    pub fn store(
        &mut self,
        key: VariableKey,
        variable: &dyn ReplicatedVariable,
        tick: Tick,
    ) -> Result<(), SnapshotError> {
        if tick == NO_TICK {
            return Err(SnapshotError::ReservedTick);
        }

        let mut writer = ByteWriter::new();
        variable
            .write_delta(&mut writer)
            .map_err(|source| SnapshotError::Variable { key, source })?;
        let payload = writer.to_bytes();

        let slot = self.directory.find_or_add(key)?;
        let entry = &mut self.directory[slot];
        self.arena.fit_entry(entry, payload.len())?;
        entry.tick_written = tick;
        self.arena.write(entry.position, &payload)?;

        if !self.stored.contains(&key) {
            self.stored.push(key);
        }
        Ok(())
    }

    /// Store the variable `key` names if it is dirty. Returns whether it was
    /// stored; a key that no longer resolves is skipped.
    pub fn store_dirty(
        &mut self,
        registry: &mut dyn ObjectRegistry,
        key: VariableKey,
        tick: Tick,
    ) -> Result<bool, SnapshotError> {
        let Some(variable) = resolve_variable(registry, &key) else {
            debug!("Tracked variable {:?} is gone, not storing it", key);
            return Ok(false);
        };
        if !variable.is_dirty() {
            return Ok(false);
        }
        self.store(key, &*variable, tick)?;
        Ok(true)
    }

    /// Send the current snapshot to every connected peer
    pub fn send_tick(
        &mut self,
        connections: &dyn ConnectionManager,
        transport: &mut dyn SnapshotTransport,
    ) -> Result<usize, SnapshotError> {
        let peers = connections.connected_peers();
        self.transmitter
            .send_all(&self.directory, &self.arena, &peers, transport)
    }

    /// Reset the dirty state of every variable stored since the last call,
    /// now that its delta has gone out. Returns how many were reset.
    pub fn reset_stored(&mut self, registry: &mut dyn ObjectRegistry) -> usize {
        let mut reset = 0;
        for key in self.stored.drain(..) {
            if let Some(variable) = resolve_variable(&mut *registry, &key) {
                variable.reset_dirty();
                reset += 1;
            }
        }
        reset
    }

    /// Apply one incoming snapshot message to the local variables
    pub fn receive(
        &mut self,
        bytes: &[u8],
        registry: &mut dyn ObjectRegistry,
    ) -> Result<ReceiveReport, SnapshotError> {
        self.receiver.receive(bytes, registry)
    }

    /// Run one network tick: store the dirty tracked variables, send the
    /// snapshot to every peer, reset what was sent, then apply `inbound`
    /// messages in order.
    ///
    /// An inbound message that cannot be received is logged and counted as
    /// rejected, and the remaining messages are still applied. Errors while
    /// storing or sending end the tick.
    pub fn tick<I: IntoIterator<Item = Vec<u8>>>(
        &mut self,
        clock: &dyn TickClock,
        connections: &dyn ConnectionManager,
        transport: &mut dyn SnapshotTransport,
        registry: &mut dyn ObjectRegistry,
        inbound: I,
    ) -> Result<TickReport, SnapshotError> {
        let tick = clock.current_tick();
        let mut report = TickReport {
            tick,
            ..Default::default()
        };

        if tick == NO_TICK {
            // dirty variables stay dirty and go out on the next tick
            debug!("Not storing on reserved tick {}", tick);
        } else {
            let tracked = self.tracked.clone();
            for key in tracked {
                if self.store_dirty(&mut *registry, key, tick)? {
                    report.variables_stored += 1;
                }
            }
        }

        report.messages_sent = self.send_tick(connections, transport)?;
        self.reset_stored(&mut *registry);

        for bytes in inbound {
            report.messages_received += 1;
            match self.receiver.receive(&bytes, &mut *registry) {
                Ok(received) => {
                    report.entries_applied += received.applied;
                    report.entries_unresolved += received.unresolved;
                    report.entries_failed += received.failed;
                }
                Err(error) => {
                    warn!("Dropping snapshot message: {}", error);
                    report.messages_rejected += 1;
                }
            }
        }

        Ok(report)
    }

    /// Forget every variable of a despawned object on both sides and release
    /// their arena regions. Returns the number of entries removed.
    pub fn despawn_object(&mut self, object_id: ObjectId) -> usize {
        let removed = self.directory.remove_object(object_id);
        for entry in &removed {
            self.arena.free(entry.position, entry.length);
        }
        self.tracked.retain(|key| key.object_id != object_id);
        self.stored.retain(|key| key.object_id != object_id);

        removed.len() + self.receiver.remove_object(object_id)
    }
}
