use log::{trace, warn};

use crate::config::AllocationPolicy;

use super::{entry::SnapshotEntry, error::SnapshotError};

/// Entries address the arena with 16-bit positions and lengths
pub const MAX_ARENA_CAPACITY: usize = u16::MAX as usize;

/// A vacated span of the arena, waiting to be reused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaRegion {
    pub position: usize,
    pub length: usize,
}

impl ArenaRegion {
    fn end(&self) -> usize {
        self.position + self.length
    }
}

/// One contiguous byte region holding the serialized payloads of many
/// variables, plus a cursor marking the end of the used part.
///
/// Every live region lies below the cursor and the cursor never passes the
/// capacity. Under `AllocationPolicy::Bump` the cursor only moves forward and
/// nothing is reclaimed. Under `AllocationPolicy::FreeList` freed regions are
/// coalesced and reused first-fit, and a free region ending at the cursor
/// pulls the cursor back.
#[derive(Debug)]
pub struct SnapshotArena {
    buffer: Vec<u8>,
    cursor: usize,
    capacity: usize,
    policy: AllocationPolicy,
    // sorted by position, never adjacent, always below the cursor
    free_regions: Vec<ArenaRegion>,
}

impl SnapshotArena {
    pub fn new(capacity: usize, policy: AllocationPolicy) -> Self {
        if capacity > MAX_ARENA_CAPACITY {
            warn!(
                "Snapshot arena capacity {} clamped to {}",
                capacity, MAX_ARENA_CAPACITY
            );
        }
        Self {
            buffer: Vec::new(),
            cursor: 0,
            capacity: capacity.min(MAX_ARENA_CAPACITY),
            policy,
            free_regions: Vec::new(),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> AllocationPolicy {
        self.policy
    }

    pub fn free_regions(&self) -> &[ArenaRegion] {
        &self.free_regions
    }

    /// Bytes in vacated regions below the cursor
    pub fn hole_bytes(&self) -> usize {
        self.free_regions.iter().map(|region| region.length).sum()
    }

    /// Bytes still available, counting reusable regions below the cursor
    pub fn free_bytes(&self) -> usize {
        self.capacity - self.cursor + self.hole_bytes()
    }

    /// The used part of the arena, from offset 0 up to the cursor
    pub fn used(&self) -> &[u8] {
        &self.buffer[..self.cursor]
    }

    /// Reserve `length` bytes and return their start offset. On failure the
    /// arena is left untouched.
    pub fn allocate(&mut self, length: usize) -> Result<u16, SnapshotError> {
        if length > MAX_ARENA_CAPACITY {
            return Err(SnapshotError::PayloadTooLarge { length });
        }

        if length > 0 && self.policy == AllocationPolicy::FreeList {
            if let Some(position) = self.take_free_region(length) {
                return Ok(position as u16);
            }
        }

        if self.cursor + length > self.capacity {
            return Err(SnapshotError::ArenaExhausted {
                requested: length,
                cursor: self.cursor,
                capacity: self.capacity,
            });
        }

        let position = self.cursor;
        self.cursor += length;
        if self.buffer.len() < self.cursor {
            self.buffer.resize(self.cursor, 0);
        }
        Ok(position as u16)
    }

    /// Give a region back. A no-op under the bump policy.
    pub fn free(&mut self, position: u16, length: u16) {
        if length == 0 {
            return;
        }
        if self.policy == AllocationPolicy::Bump {
            trace!("Bump arena leaks {} bytes at {}", length, position);
            return;
        }

        let region = ArenaRegion {
            position: usize::from(position),
            length: usize::from(length),
        };
        if region.end() > self.cursor {
            warn!(
                "Ignoring free of [{}, {}) past the arena cursor at {}",
                region.position,
                region.end(),
                self.cursor
            );
            return;
        }

        let index = self
            .free_regions
            .partition_point(|free| free.position < region.position);
        let overlaps_previous = index > 0 && self.free_regions[index - 1].end() > region.position;
        let overlaps_next = index < self.free_regions.len()
            && region.end() > self.free_regions[index].position;
        if overlaps_previous || overlaps_next {
            warn!(
                "Ignoring free of [{}, {}): already free",
                region.position,
                region.end()
            );
            return;
        }

        self.free_regions.insert(index, region);
        self.coalesce_around(index);
        self.release_tail();
    }

    /// Make `entry` own a region of exactly `length` bytes. A longer payload
    /// gets a fresh region and the old one is freed; a shorter one keeps its
    /// region and frees the unused tail.
    pub fn fit_entry(
        &mut self,
        entry: &mut SnapshotEntry,
        length: usize,
    ) -> Result<(), SnapshotError> {
        let new_length =
            u16::try_from(length).map_err(|_| SnapshotError::PayloadTooLarge { length })?;

        if new_length > entry.length {
            // allocate first, so a failure leaves the entry untouched
            let position = self.allocate(length)?;
            self.free(entry.position, entry.length);
            entry.position = position;
            entry.length = new_length;
        } else if new_length < entry.length {
            self.free(entry.position + new_length, entry.length - new_length);
            entry.length = new_length;
        }
        Ok(())
    }

    pub fn write(&mut self, position: u16, bytes: &[u8]) -> Result<(), SnapshotError> {
        let start = usize::from(position);
        let end = self.check_bounds(start, bytes.len())?;
        self.buffer[start..end].copy_from_slice(bytes);
        Ok(())
    }

    pub fn read(&self, position: u16, length: usize) -> Result<&[u8], SnapshotError> {
        let start = usize::from(position);
        let end = self.check_bounds(start, length)?;
        Ok(&self.buffer[start..end])
    }

    /// Forget every region
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.free_regions.clear();
    }

    fn check_bounds(&self, start: usize, length: usize) -> Result<usize, SnapshotError> {
        let end = start + length;
        if end > self.cursor {
            return Err(SnapshotError::RegionOutOfBounds {
                position: start,
                length,
                cursor: self.cursor,
            });
        }
        Ok(end)
    }

    fn take_free_region(&mut self, length: usize) -> Option<usize> {
        let index = self
            .free_regions
            .iter()
            .position(|region| region.length >= length)?;
        let region = &mut self.free_regions[index];
        let position = region.position;
        if region.length == length {
            self.free_regions.remove(index);
        } else {
            region.position += length;
            region.length -= length;
        }
        Some(position)
    }

    fn coalesce_around(&mut self, index: usize) {
        let mut index = index;
        if index > 0 && self.free_regions[index - 1].end() == self.free_regions[index].position {
            let region = self.free_regions.remove(index);
            index -= 1;
            self.free_regions[index].length += region.length;
        }
        if index + 1 < self.free_regions.len()
            && self.free_regions[index].end() == self.free_regions[index + 1].position
        {
            let next = self.free_regions.remove(index + 1);
            self.free_regions[index].length += next.length;
        }
    }

    fn release_tail(&mut self) {
        if let Some(last) = self.free_regions.last() {
            if last.end() == self.cursor {
                self.cursor = last.position;
                self.free_regions.pop();
            }
        }
    }
}
