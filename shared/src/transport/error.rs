use thiserror::Error;

use crate::PeerId;

/// Errors a SnapshotTransport can report for a single send
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The peer disconnected between enumeration and send
    #[error("Peer {peer} is not connected")]
    PeerNotConnected { peer: PeerId },

    /// The underlying transport refused the payload
    #[error("Failed to send {length} bytes to peer {peer}: {reason}")]
    SendFailed {
        peer: PeerId,
        length: usize,
        reason: String,
    },
}
