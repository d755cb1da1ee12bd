use snapnet_serde::{ByteReader, ByteWrite, ConstByteLength, Serde, SerdeErr};

use crate::{Tick, NO_TICK};

use super::key::VariableKey;

/// Where the latest payload of one variable lives in an arena, and when it
/// was written
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub key: VariableKey,
    pub tick_written: Tick,
    pub position: u16,
    pub length: u16,
}

impl SnapshotEntry {
    /// A never-written entry with an empty region
    pub fn new(key: VariableKey) -> Self {
        Self {
            key,
            tick_written: NO_TICK,
            position: 0,
            length: 0,
        }
    }

    pub fn is_written(&self) -> bool {
        self.tick_written != NO_TICK
    }

    /// One past the last byte of the entry's region
    pub fn end(&self) -> usize {
        usize::from(self.position) + usize::from(self.length)
    }
}

impl Serde for SnapshotEntry {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        self.key.ser(writer);
        self.tick_written.ser(writer);
        self.position.ser(writer);
        self.length.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            key: VariableKey::de(reader)?,
            tick_written: Tick::de(reader)?,
            position: u16::de(reader)?,
            length: u16::de(reader)?,
        })
    }

    fn byte_length(&self) -> usize {
        Self::const_byte_length()
    }
}

impl ConstByteLength for SnapshotEntry {
    fn const_byte_length() -> usize {
        VariableKey::const_byte_length() + 3 * <u16 as ConstByteLength>::const_byte_length()
    }
}
