use log::{debug, log_enabled, trace, warn, Level};

use snapnet_serde::ByteWriter;

use crate::{
    config::SnapshotConfig, transport::SnapshotTransport, ChannelIndex, PeerId,
};

use super::{
    arena::SnapshotArena,
    directory::VariableDirectory,
    error::SnapshotError,
    message::{snapshot_length, write_snapshot},
};

/// Running totals of a SnapshotTransmitter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransmitStats {
    pub ticks: u64,
    pub messages_sent: u64,
    pub bytes_sent: u64,
    pub send_failures: u64,
}

/// Sends the sender-side directory and arena to every connected peer, once
/// per tick
pub struct SnapshotTransmitter {
    channel: ChannelIndex,
    shuffle_peers: bool,
    stats: TransmitStats,
}

impl SnapshotTransmitter {
    pub fn new(config: &SnapshotConfig) -> Self {
        Self {
            channel: config.snapshot_channel,
            shuffle_peers: config.shuffle_peers,
            stats: TransmitStats::default(),
        }
    }

    pub fn stats(&self) -> &TransmitStats {
        &self.stats
    }

    /// Serialize the snapshot once, then hand the same bytes to the transport
    /// for each peer. Returns the number of peers the transport accepted.
    ///
    /// A failed send to one peer is logged and counted; the other peers are
    /// still served.
    pub fn send_all(
        &mut self,
        directory: &VariableDirectory,
        arena: &SnapshotArena,
        peers: &[PeerId],
        transport: &mut dyn SnapshotTransport,
    ) -> Result<usize, SnapshotError> {
        let mut writer = ByteWriter::with_capacity(snapshot_length(directory, arena));
        write_snapshot(directory, arena, &mut writer)?;
        let payload = writer.to_bytes();

        let mut peers = peers.to_vec();
        if self.shuffle_peers {
            // shuffle order of peers in order to avoid priority among them
            fastrand::shuffle(&mut peers);
        }

        let mut sent = 0;
        for peer in peers {
            match transport.send(peer, self.channel, &payload) {
                Ok(()) => {
                    sent += 1;
                    self.stats.messages_sent += 1;
                    self.stats.bytes_sent += payload.len() as u64;
                }
                Err(error) => {
                    warn!("Snapshot not delivered to peer {}: {}", peer, error);
                    self.stats.send_failures += 1;
                }
            }
        }
        self.stats.ticks += 1;

        debug!(
            "Sent snapshot of {} entries ({} bytes) to {} peers",
            directory.len(),
            payload.len(),
            sent
        );
        if log_enabled!(Level::Trace) {
            trace!("{}", directory.debug_table("Entries"));
        }

        Ok(sent)
    }
}
