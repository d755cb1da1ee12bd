pub mod packet_exchange;
pub mod test_peer;

pub use packet_exchange::{tick_and_exchange, tick_and_exchange_n_times};
pub use test_peer::TestPeer;
