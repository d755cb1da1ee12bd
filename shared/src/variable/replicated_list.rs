use std::slice::Iter;

use snapnet_serde::{ByteReader, ByteWrite, ByteWriter, Serde};

use super::{
    error::VariableError,
    list_event::{read_index, read_values, write_values, ListEvent, ListEventType},
    notifier::{ChangeNotifier, ObserverId},
    replicated_variable::ReplicatedVariable,
};

/// An ordered list whose mutations are recorded as typed events, so they can
/// be replayed on a remote mirror.
///
/// Every mutating call commits the change, appends the matching event to the
/// dirty log, then notifies observers with that same event. The dirty log is
/// drained by `reset_dirty` once the encoded delta has been transmitted.
#[derive(Debug)]
pub struct ReplicatedList<T: Serde> {
    list: Vec<T>,
    dirty_events: Vec<ListEvent<T>>,
    full_resync: bool,
    notifier: ChangeNotifier<ListEvent<T>>,
}

impl<T: Serde> ReplicatedList<T> {
    pub fn new() -> Self {
        Self::from_values(Vec::new())
    }

    /// Create a list holding `values`, with an empty dirty log
    pub fn from_values<I: IntoIterator<Item = T>>(values: I) -> Self {
        Self {
            list: values.into_iter().collect(),
            dirty_events: Vec::new(),
            full_resync: false,
            notifier: ChangeNotifier::new(),
        }
    }

    // Reads

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.list.get(index)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.list.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.list
    }

    pub fn contains(&self, value: &T) -> bool {
        self.list.contains(value)
    }

    /// Index of the first element equal to `value`
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.list.iter().position(|item| item == value)
    }

    // Mutations

    pub fn add(&mut self, value: T) {
        self.list.push(value.clone());
        let index = self.list.len() - 1;
        self.record(ListEvent::Add { index, value }, true);
    }

    /// Insert `value` at `index`, shifting later elements. `index == len()`
    /// appends.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), VariableError> {
        self.check_insert_index(index)?;
        self.list.insert(index, value.clone());
        self.record(ListEvent::Insert { index, value }, true);
        Ok(())
    }

    /// Remove the first element equal to `value`. Returns false, and records
    /// nothing, if there is no such element.
    pub fn remove(&mut self, value: &T) -> bool {
        let Some(index) = self.index_of(value) else {
            return false;
        };
        let value = self.list.remove(index);
        self.record(ListEvent::Remove { index, value }, true);
        true
    }

    /// Remove and return the element at `index`
    pub fn remove_at(&mut self, index: usize) -> Result<T, VariableError> {
        self.check_index(index)?;
        let value = self.list.remove(index);
        self.record(
            ListEvent::RemoveAt {
                index,
                value: value.clone(),
            },
            true,
        );
        Ok(value)
    }

    /// Replace the element at `index`, returning the previous one
    pub fn set(&mut self, index: usize, value: T) -> Result<T, VariableError> {
        self.check_index(index)?;
        let previous = std::mem::replace(&mut self.list[index], value.clone());
        self.record(ListEvent::Value { index, value }, true);
        Ok(previous)
    }

    pub fn clear(&mut self) {
        self.list.clear();
        self.record(ListEvent::Clear, true);
    }

    // Observers

    pub fn subscribe<F: FnMut(&ListEvent<T>) + 'static>(&mut self, observer: F) -> ObserverId {
        self.notifier.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.notifier.unsubscribe(id)
    }

    // Dirty tracking

    pub fn is_dirty(&self) -> bool {
        self.full_resync || !self.dirty_events.is_empty()
    }

    /// Mark the list for a full resync: the next delta carries the whole
    /// contents instead of the dirty log (e.g. for a newly connected peer)
    pub fn set_dirty(&mut self) {
        self.full_resync = true;
    }

    pub fn needs_full_resync(&self) -> bool {
        self.full_resync
    }

    pub fn dirty_events(&self) -> &[ListEvent<T>] {
        &self.dirty_events
    }

    pub fn reset_dirty(&mut self) {
        self.dirty_events.clear();
        self.full_resync = false;
    }

    // Encoding

    /// Encode the pending changes: a single Full event when marked for
    /// resync, otherwise the dirty log
    pub fn encode_delta(&self) -> Result<Vec<u8>, VariableError> {
        let mut writer = ByteWriter::new();
        self.write_delta_inner(&mut writer)?;
        Ok(writer.to_bytes())
    }

    /// Encode the whole contents, length prefixed
    pub fn encode_full(&self) -> Result<Vec<u8>, VariableError> {
        let mut writer = ByteWriter::new();
        write_values(&self.list, &mut writer)?;
        Ok(writer.to_bytes())
    }

    /// Apply a delta produced by a remote `encode_delta`
    pub fn decode_delta(&mut self, bytes: &[u8], keep_as_dirty: bool) -> Result<(), VariableError> {
        let mut reader = ByteReader::new(bytes);
        self.read_delta_inner(&mut reader, keep_as_dirty)
    }

    /// Replace the contents with a remote `encode_full`
    pub fn decode_full(&mut self, bytes: &[u8]) -> Result<(), VariableError> {
        let mut reader = ByteReader::new(bytes);
        self.read_full_inner(&mut reader)
    }

    fn write_delta_inner(&self, writer: &mut dyn ByteWrite) -> Result<(), VariableError> {
        if self.full_resync {
            1u16.ser(writer);
            ListEventType::Full.ser(writer);
            return write_values(&self.list, writer);
        }

        let count = u16::try_from(self.dirty_events.len()).map_err(|_| {
            VariableError::LengthOverflow {
                what: "Dirty event count",
                count: self.dirty_events.len(),
            }
        })?;
        count.ser(writer);
        for event in &self.dirty_events {
            event.write(writer)?;
        }
        Ok(())
    }

    fn read_delta_inner(
        &mut self,
        reader: &mut ByteReader,
        keep_dirty: bool,
    ) -> Result<(), VariableError> {
        let count = u16::de(reader)?;
        for _ in 0..count {
            match ListEventType::de(reader)? {
                ListEventType::Add => {
                    let value = T::de(reader)?;
                    self.list.push(value.clone());
                    let index = self.list.len() - 1;
                    self.record(ListEvent::Add { index, value }, keep_dirty);
                }
                ListEventType::Insert => {
                    let index = read_index(reader)?;
                    let value = T::de(reader)?;
                    self.check_insert_index(index)?;
                    self.list.insert(index, value.clone());
                    self.record(ListEvent::Insert { index, value }, keep_dirty);
                }
                ListEventType::Remove => {
                    let value = T::de(reader)?;
                    // the sender only records removals that matched, but the
                    // mirror may have diverged; nothing to do then
                    if let Some(index) = self.index_of(&value) {
                        let value = self.list.remove(index);
                        self.record(ListEvent::Remove { index, value }, keep_dirty);
                    }
                }
                ListEventType::RemoveAt => {
                    let index = read_index(reader)?;
                    self.check_index(index)?;
                    let value = self.list.remove(index);
                    self.record(ListEvent::RemoveAt { index, value }, keep_dirty);
                }
                ListEventType::Value => {
                    let index = read_index(reader)?;
                    let value = T::de(reader)?;
                    self.check_index(index)?;
                    self.list[index] = value.clone();
                    self.record(ListEvent::Value { index, value }, keep_dirty);
                }
                ListEventType::Clear => {
                    self.list.clear();
                    self.record(ListEvent::Clear, keep_dirty);
                }
                ListEventType::Full => {
                    self.list = read_values(reader)?;
                    self.reset_dirty();
                    // forwarding a Full event means resyncing downstream peers
                    self.full_resync = keep_dirty;
                    self.notifier.notify(&ListEvent::Full {
                        values: self.list.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn read_full_inner(&mut self, reader: &mut ByteReader) -> Result<(), VariableError> {
        self.list = read_values(reader)?;
        self.notifier.notify(&ListEvent::Full {
            values: self.list.clone(),
        });
        Ok(())
    }

    fn record(&mut self, event: ListEvent<T>, keep_dirty: bool) {
        if keep_dirty {
            self.dirty_events.push(event.clone());
        }
        self.notifier.notify(&event);
    }

    fn check_index(&self, index: usize) -> Result<(), VariableError> {
        if index >= self.list.len() {
            return Err(VariableError::IndexOutOfRange {
                index,
                len: self.list.len(),
            });
        }
        Ok(())
    }

    fn check_insert_index(&self, index: usize) -> Result<(), VariableError> {
        if index > self.list.len() {
            return Err(VariableError::IndexOutOfRange {
                index,
                len: self.list.len(),
            });
        }
        Ok(())
    }
}

impl<T: Serde> Default for ReplicatedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Serde> IntoIterator for &'a ReplicatedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

impl<T: Serde> ReplicatedVariable for ReplicatedList<T> {
    fn is_dirty(&self) -> bool {
        ReplicatedList::is_dirty(self)
    }

    fn write_delta(&self, writer: &mut dyn ByteWrite) -> Result<(), VariableError> {
        self.write_delta_inner(writer)
    }

    fn write_field(&self, writer: &mut dyn ByteWrite) -> Result<(), VariableError> {
        write_values(&self.list, writer)
    }

    fn read_delta(
        &mut self,
        reader: &mut ByteReader,
        keep_dirty: bool,
    ) -> Result<(), VariableError> {
        self.read_delta_inner(reader, keep_dirty)
    }

    fn read_field(&mut self, reader: &mut ByteReader) -> Result<(), VariableError> {
        self.read_full_inner(reader)
    }

    fn reset_dirty(&mut self) {
        ReplicatedList::reset_dirty(self)
    }
}
