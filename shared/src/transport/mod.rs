pub mod error;

use crate::{ChannelIndex, PeerId, Tick};

use error::TransportError;

/// Per-peer send primitive. Delivery guarantees are the transport's business.
pub trait SnapshotTransport {
    fn send(
        &mut self,
        peer: PeerId,
        channel: ChannelIndex,
        payload: &[u8],
    ) -> Result<(), TransportError>;
}

/// Source of the current network tick
pub trait TickClock {
    fn current_tick(&self) -> Tick;
}

/// Knows which peers are connected right now
pub trait ConnectionManager {
    fn connected_peers(&self) -> Vec<PeerId>;
}
