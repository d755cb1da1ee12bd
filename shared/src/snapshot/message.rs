use snapnet_serde::{ByteReader, ByteWrite, ConstByteLength, Serde};

use super::{
    arena::{SnapshotArena, MAX_ARENA_CAPACITY},
    directory::VariableDirectory,
    entry::SnapshotEntry,
    error::{ProtocolError, SnapshotError},
};

/// Write one snapshot message: `entry_count: i16`, every entry of the
/// directory, then the used part of the arena
pub fn write_snapshot(
    directory: &VariableDirectory,
    arena: &SnapshotArena,
    writer: &mut dyn ByteWrite,
) -> Result<(), SnapshotError> {
    let count = i16::try_from(directory.len()).map_err(|_| SnapshotError::TooManyEntries {
        count: directory.len(),
    })?;
    count.ser(writer);
    for entry in directory.entries() {
        entry.ser(writer);
    }
    writer.write_bytes(arena.used());
    Ok(())
}

/// Size in bytes of the message `write_snapshot` would produce
pub fn snapshot_length(directory: &VariableDirectory, arena: &SnapshotArena) -> usize {
    <i16 as ConstByteLength>::const_byte_length()
        + directory.len() * SnapshotEntry::const_byte_length()
        + arena.cursor()
}

/// A parsed and validated incoming snapshot message, borrowing its payload
/// from the received bytes
#[derive(Debug)]
pub struct IncomingSnapshot<'b> {
    entries: Vec<SnapshotEntry>,
    payload: &'b [u8],
}

impl<'b> IncomingSnapshot<'b> {
    /// Parse the whole index and check every entry against the payload
    /// region, so that a message is either fully usable or rejected
    pub fn parse(bytes: &'b [u8], max_entries: usize) -> Result<Self, ProtocolError> {
        let mut reader = ByteReader::new(bytes);

        let count = i16::de(&mut reader)?;
        let count = usize::try_from(count)
            .map_err(|_| ProtocolError::NegativeEntryCount { count })?;
        if count > max_entries {
            return Err(ProtocolError::EntryCountTooLarge {
                count,
                max: max_entries,
            });
        }

        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            entries.push(SnapshotEntry::de(&mut reader)?);
        }

        let payload = reader.read_rest();
        if payload.len() > MAX_ARENA_CAPACITY {
            return Err(ProtocolError::PayloadTooLarge {
                length: payload.len(),
            });
        }
        for entry in &entries {
            if !entry.is_written() && entry.length != 0 {
                return Err(ProtocolError::UnwrittenEntryWithPayload {
                    key: entry.key,
                    length: entry.length,
                });
            }
            if entry.is_written() && entry.end() > payload.len() {
                return Err(ProtocolError::PayloadOutOfBounds {
                    key: entry.key,
                    position: entry.position,
                    length: entry.length,
                    payload_length: payload.len(),
                });
            }
        }

        Ok(Self { entries, payload })
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn payload(&self) -> &'b [u8] {
        self.payload
    }

    /// The payload bytes of one written entry
    pub fn payload_of(&self, entry: &SnapshotEntry) -> &'b [u8] {
        &self.payload[usize::from(entry.position)..entry.end()]
    }
}
