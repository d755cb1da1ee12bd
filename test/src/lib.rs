pub mod helpers;
pub mod local_transport;
pub mod test_world;

pub use helpers::*;
pub use local_transport::{LocalTransport, TestClock, TestConnections};
pub use test_protocol::{Inventory, Position, TestObject, INVENTORY, POSITION};
pub use test_world::TestWorld;
