use snapnet_shared::{SnapshotError, TickClock};

use crate::local_transport::{LocalTransport, TestClock, TestConnections};

use super::TestPeer;

/// Advance `clock`, run the host's tick, then let every remote run its tick
/// on whatever the host just sent it
pub fn tick_and_exchange<C: TickClock>(
    host: &mut TestPeer,
    remotes: &mut [&mut TestPeer],
    clock: &C,
    transport: &mut LocalTransport,
) -> Result<(), SnapshotError> {
    let connections = TestConnections::new(remotes.iter().map(|remote| remote.id).collect());
    host.last_report =
        host.session
            .tick(clock, &connections, transport, &mut host.world, Vec::new())?;

    for remote in remotes.iter_mut() {
        let inbound = transport.drain(remote.id);
        remote.last_report = remote.session.tick(
            clock,
            &TestConnections::default(),
            transport,
            &mut remote.world,
            inbound,
        )?;
    }
    Ok(())
}

/// Run `tick_and_exchange` `n` times, advancing the clock first each time
pub fn tick_and_exchange_n_times(
    host: &mut TestPeer,
    remotes: &mut [&mut TestPeer],
    clock: &mut TestClock,
    transport: &mut LocalTransport,
    n: usize,
) -> Result<(), SnapshotError> {
    for _ in 0..n {
        clock.advance();
        tick_and_exchange(host, remotes, &*clock, transport)?;
    }
    Ok(())
}
