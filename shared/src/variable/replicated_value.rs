use snapnet_serde::{ByteReader, ByteWrite, ByteWriter, Serde};

use super::{
    error::VariableError,
    notifier::{ChangeNotifier, ObserverId},
    replicated_variable::ReplicatedVariable,
};

/// Delivered to observers of a ReplicatedValue
#[derive(Clone, Debug, PartialEq)]
pub struct ValueChange<T> {
    pub previous: T,
    pub current: T,
}

/// A single replicated value. Its delta is simply the current value.
#[derive(Debug)]
pub struct ReplicatedValue<T: Serde> {
    value: T,
    dirty: bool,
    notifier: ChangeNotifier<ValueChange<T>>,
}

impl<T: Serde> ReplicatedValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            dirty: false,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Store `value`; only a different value marks the variable dirty and
    /// notifies observers
    pub fn set(&mut self, value: T) {
        if value == self.value {
            return;
        }
        self.replace(value);
        self.dirty = true;
    }

    pub fn subscribe<F: FnMut(&ValueChange<T>) + 'static>(&mut self, observer: F) -> ObserverId {
        self.notifier.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn reset_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn encode_delta(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.value.byte_length());
        self.value.ser(&mut writer);
        writer.to_bytes()
    }

    pub fn decode_delta(&mut self, bytes: &[u8], keep_as_dirty: bool) -> Result<(), VariableError> {
        let mut reader = ByteReader::new(bytes);
        self.read_value(&mut reader, keep_as_dirty)
    }

    fn read_value(&mut self, reader: &mut ByteReader, keep_dirty: bool) -> Result<(), VariableError> {
        let value = T::de(reader)?;
        if value != self.value {
            self.replace(value);
            if keep_dirty {
                self.dirty = true;
            }
        }
        Ok(())
    }

    fn replace(&mut self, value: T) {
        let previous = std::mem::replace(&mut self.value, value);
        self.notifier.notify(&ValueChange {
            previous,
            current: self.value.clone(),
        });
    }
}

impl<T: Serde + Default> Default for ReplicatedValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Serde> ReplicatedVariable for ReplicatedValue<T> {
    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn write_delta(&self, writer: &mut dyn ByteWrite) -> Result<(), VariableError> {
        self.value.ser(writer);
        Ok(())
    }

    fn write_field(&self, writer: &mut dyn ByteWrite) -> Result<(), VariableError> {
        self.value.ser(writer);
        Ok(())
    }

    fn read_delta(
        &mut self,
        reader: &mut ByteReader,
        keep_dirty: bool,
    ) -> Result<(), VariableError> {
        self.read_value(reader, keep_dirty)
    }

    fn read_field(&mut self, reader: &mut ByteReader) -> Result<(), VariableError> {
        self.read_value(reader, false)
    }

    fn reset_dirty(&mut self) {
        self.dirty = false;
    }
}
