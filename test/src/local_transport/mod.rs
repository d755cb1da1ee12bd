/// In-memory transport for end-to-end testing
/// Queues every payload per peer instead of doing network I/O
use std::collections::{HashMap, HashSet, VecDeque};

use snapnet_shared::{
    ChannelIndex, ConnectionManager, PeerId, SnapshotTransport, Tick, TickClock, TransportError,
};

#[derive(Default)]
pub struct LocalTransport {
    queues: HashMap<PeerId, VecDeque<(ChannelIndex, Vec<u8>)>>,
    unreachable: HashSet<PeerId>,
}

impl LocalTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends to `peer` fail from now on
    pub fn cut(&mut self, peer: PeerId) {
        self.unreachable.insert(peer);
    }

    pub fn restore(&mut self, peer: PeerId) {
        self.unreachable.remove(&peer);
    }

    /// Everything queued for `peer`, oldest first
    pub fn drain(&mut self, peer: PeerId) -> Vec<Vec<u8>> {
        self.queues
            .get_mut(&peer)
            .map(|queue| queue.drain(..).map(|(_, payload)| payload).collect())
            .unwrap_or_default()
    }

    pub fn pending(&self, peer: PeerId) -> usize {
        self.queues.get(&peer).map_or(0, VecDeque::len)
    }

    pub fn last_channel(&self, peer: PeerId) -> Option<ChannelIndex> {
        self.queues
            .get(&peer)
            .and_then(|queue| queue.back())
            .map(|(channel, _)| *channel)
    }
}

impl SnapshotTransport for LocalTransport {
    fn send(
        &mut self,
        peer: PeerId,
        channel: ChannelIndex,
        payload: &[u8],
    ) -> Result<(), TransportError> {
        if self.unreachable.contains(&peer) {
            return Err(TransportError::PeerNotConnected { peer });
        }
        self.queues
            .entry(peer)
            .or_default()
            .push_back((channel, payload.to_vec()));
        Ok(())
    }
}

/// Manually advanced tick source
pub struct TestClock {
    tick: Tick,
}

impl TestClock {
    pub fn new(tick: Tick) -> Self {
        Self { tick }
    }

    pub fn advance(&mut self) -> Tick {
        self.tick = self.tick.wrapping_add(1);
        self.tick
    }
}

impl TickClock for TestClock {
    fn current_tick(&self) -> Tick {
        self.tick
    }
}

/// Fixed list of connected peers
#[derive(Default)]
pub struct TestConnections {
    pub peers: Vec<PeerId>,
}

impl TestConnections {
    pub fn new(peers: Vec<PeerId>) -> Self {
        Self { peers }
    }
}

impl ConnectionManager for TestConnections {
    fn connected_peers(&self) -> Vec<PeerId> {
        self.peers.clone()
    }
}
