use snapnet_serde::{ByteReader, ByteWrite};

use super::error::VariableError;

/// A value that can be stored in a snapshot and rebuilt on the remote side.
///
/// This is the seam between the snapshot machinery and the variables it
/// carries: the directory and arena only ever see the bytes produced by
/// `write_delta`, and the receiver hands those bytes back to `read_delta`.
pub trait ReplicatedVariable {
    /// Whether there are changes not yet reset by `reset_dirty`
    fn is_dirty(&self) -> bool;

    /// Write the changes accumulated since the last `reset_dirty`
    fn write_delta(&self, writer: &mut dyn ByteWrite) -> Result<(), VariableError>;

    /// Write the entire current value
    fn write_field(&self, writer: &mut dyn ByteWrite) -> Result<(), VariableError>;

    /// Apply changes written by a remote `write_delta`. With `keep_dirty` the
    /// applied changes are also recorded locally, to be forwarded again.
    fn read_delta(&mut self, reader: &mut ByteReader, keep_dirty: bool)
        -> Result<(), VariableError>;

    /// Replace the current value with one written by a remote `write_field`
    fn read_field(&mut self, reader: &mut ByteReader) -> Result<(), VariableError>;

    /// Forget pending changes, called once they have been transmitted
    fn reset_dirty(&mut self);
}
