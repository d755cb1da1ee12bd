use crate::{byte_reader::ByteReader, byte_writer::ByteWrite, error::SerdeErr};

/// A type that can be written to and read from the snapshot wire format
pub trait Serde: Sized + Clone + PartialEq {
    /// Serialize Self into the given writer
    fn ser(&self, writer: &mut dyn ByteWrite);

    /// Parse Self from the given reader
    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr>;

    /// Return the number of bytes `ser` will write for this value
    fn byte_length(&self) -> usize;
}

/// A type whose encoding always has the same length
pub trait ConstByteLength {
    fn const_byte_length() -> usize;
}
