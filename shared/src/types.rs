pub type Tick = u16;
pub type ObjectId = u64;
pub type ComponentIndex = u16;
pub type VariableIndex = u16;
pub type PeerId = u64;
pub type ChannelIndex = u8;

/// Tick value of an entry that has never been written
pub const NO_TICK: Tick = 0;
