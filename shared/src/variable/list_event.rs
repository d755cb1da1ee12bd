use snapnet_serde::{ByteReader, ByteWrite, ConstByteLength, Serde, SerdeErr};

use super::error::VariableError;

/// Wire tag of a list event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ListEventType {
    Add = 0,
    Insert = 1,
    Remove = 2,
    RemoveAt = 3,
    Value = 4,
    Clear = 5,
    Full = 6,
}

impl ListEventType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Add),
            1 => Some(Self::Insert),
            2 => Some(Self::Remove),
            3 => Some(Self::RemoveAt),
            4 => Some(Self::Value),
            5 => Some(Self::Clear),
            6 => Some(Self::Full),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl Serde for ListEventType {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(self.tag());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let tag = reader.read_byte()?;
        Self::from_tag(tag).ok_or(SerdeErr::InvalidTag {
            type_name: "ListEventType",
            tag,
        })
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl ConstByteLength for ListEventType {
    fn const_byte_length() -> usize {
        1
    }
}

/// One change to a ReplicatedList.
///
/// The same value is recorded in the dirty log and delivered to observers.
/// Some fields only exist for observers and never reach the wire: the index
/// of `Add` and `Remove`, and the removed value of `RemoveAt`.
#[derive(Clone, Debug, PartialEq)]
pub enum ListEvent<T> {
    Add { index: usize, value: T },
    Insert { index: usize, value: T },
    Remove { index: usize, value: T },
    RemoveAt { index: usize, value: T },
    Value { index: usize, value: T },
    Clear,
    Full { values: Vec<T> },
}

impl<T: Serde> ListEvent<T> {
    pub fn event_type(&self) -> ListEventType {
        match self {
            ListEvent::Add { .. } => ListEventType::Add,
            ListEvent::Insert { .. } => ListEventType::Insert,
            ListEvent::Remove { .. } => ListEventType::Remove,
            ListEvent::RemoveAt { .. } => ListEventType::RemoveAt,
            ListEvent::Value { .. } => ListEventType::Value,
            ListEvent::Clear => ListEventType::Clear,
            ListEvent::Full { .. } => ListEventType::Full,
        }
    }

    /// Write the tag followed by the payload of this event
    pub fn write(&self, writer: &mut dyn ByteWrite) -> Result<(), VariableError> {
        self.event_type().ser(writer);
        match self {
            ListEvent::Add { value, .. } | ListEvent::Remove { value, .. } => {
                value.ser(writer);
            }
            ListEvent::Insert { index, value } | ListEvent::Value { index, value } => {
                write_index(*index, writer)?;
                value.ser(writer);
            }
            ListEvent::RemoveAt { index, .. } => {
                write_index(*index, writer)?;
            }
            ListEvent::Clear => {}
            ListEvent::Full { values } => {
                write_values(values, writer)?;
            }
        }
        Ok(())
    }
}

pub(crate) fn write_index(index: usize, writer: &mut dyn ByteWrite) -> Result<(), VariableError> {
    let index = i32::try_from(index).map_err(|_| VariableError::LengthOverflow {
        what: "List index",
        count: index,
    })?;
    index.ser(writer);
    Ok(())
}

pub(crate) fn read_index(reader: &mut ByteReader) -> Result<usize, VariableError> {
    let index = i32::de(reader)?;
    usize::try_from(index).map_err(|_| VariableError::NegativeIndex { index })
}

/// `length: u16` followed by every value
pub(crate) fn write_values<T: Serde>(
    values: &[T],
    writer: &mut dyn ByteWrite,
) -> Result<(), VariableError> {
    let length = u16::try_from(values.len()).map_err(|_| VariableError::LengthOverflow {
        what: "List length",
        count: values.len(),
    })?;
    length.ser(writer);
    for value in values {
        value.ser(writer);
    }
    Ok(())
}

/// Reads every value before returning, so a truncated payload yields nothing
pub(crate) fn read_values<T: Serde>(reader: &mut ByteReader) -> Result<Vec<T>, VariableError> {
    let length = u16::de(reader)?;
    let mut values = Vec::with_capacity(usize::from(length).min(reader.remaining()));
    for _ in 0..length {
        values.push(T::de(reader)?);
    }
    Ok(values)
}
