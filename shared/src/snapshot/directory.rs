use std::{
    fmt::Write,
    ops::{Index, IndexMut},
};

use crate::ObjectId;

use super::{entry::SnapshotEntry, error::SnapshotError, key::VariableKey};

/// Insertion-ordered table of SnapshotEntry, looked up by key with a linear
/// scan. The number of live variables per session is small, so a scan beats
/// hashing here.
///
/// A directory grows on demand. When built with a bound, adding past it fails
/// with `CapacityExceeded` instead of growing.
#[derive(Debug, Default)]
pub struct VariableDirectory {
    entries: Vec<SnapshotEntry>,
    max_entries: Option<usize>,
}

impl VariableDirectory {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            max_entries: None,
        }
    }

    pub fn with_bound(max_entries: usize) -> Self {
        Self {
            entries: Vec::with_capacity(max_entries),
            max_entries: Some(max_entries),
        }
    }

    pub fn bound(&self) -> Option<usize> {
        self.max_entries
    }

    /// Slot of the entry for `key`, or None if it was never added
    pub fn find(&self, key: &VariableKey) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == *key)
    }

    /// Append a never-written entry for `key` and return its slot.
    ///
    /// Does not check for an existing entry, use `find_or_add` for that.
    pub fn add_entry(&mut self, key: VariableKey) -> Result<usize, SnapshotError> {
        if let Some(max_entries) = self.max_entries {
            if self.entries.len() >= max_entries {
                return Err(SnapshotError::CapacityExceeded {
                    capacity: max_entries,
                });
            }
        }
        self.entries.push(SnapshotEntry::new(key));
        Ok(self.entries.len() - 1)
    }

    pub fn find_or_add(&mut self, key: VariableKey) -> Result<usize, SnapshotError> {
        match self.find(&key) {
            Some(slot) => Ok(slot),
            None => self.add_entry(key),
        }
    }

    pub fn get(&self, slot: usize) -> Option<&SnapshotEntry> {
        self.entries.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut SnapshotEntry> {
        self.entries.get_mut(slot)
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry owned by `object_id`, returning them so their arena
    /// regions can be released. Slots of the remaining entries may shift.
    pub fn remove_object(&mut self, object_id: ObjectId) -> Vec<SnapshotEntry> {
        let mut removed = Vec::new();
        self.entries.retain(|entry| {
            if entry.key.object_id == object_id {
                removed.push(*entry);
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Human-readable dump of the table, one line per entry
    pub fn debug_table(&self, name: &str) -> String {
        let mut table = format!("=== Snapshot table === {} ===\n", name);
        for entry in &self.entries {
            let _ = writeln!(
                table,
                "Object {}:{}:{} tick {} range [{}, {})",
                entry.key.object_id,
                entry.key.component_index,
                entry.key.variable_index,
                entry.tick_written,
                entry.position,
                entry.end(),
            );
        }
        table
    }
}

impl Index<usize> for VariableDirectory {
    type Output = SnapshotEntry;

    fn index(&self, slot: usize) -> &Self::Output {
        &self.entries[slot]
    }
}

impl IndexMut<usize> for VariableDirectory {
    fn index_mut(&mut self, slot: usize) -> &mut Self::Output {
        &mut self.entries[slot]
    }
}
