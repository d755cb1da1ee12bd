use crate::error::SerdeErr;

/// Cursor over a borrowed byte slice
pub struct ByteReader<'b> {
    buffer: &'b [u8],
    cursor: usize,
}

impl<'b> ByteReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Borrow the next `length` bytes and advance past them
    pub fn read_bytes(&mut self, length: usize) -> Result<&'b [u8], SerdeErr> {
        let remaining = self.remaining();
        if length > remaining {
            return Err(SerdeErr::Truncated {
                offset: self.cursor,
                needed: length,
                remaining,
            });
        }
        let start = self.cursor;
        self.cursor += length;
        Ok(&self.buffer[start..self.cursor])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerdeErr> {
        let mut output = [0u8; N];
        output.copy_from_slice(self.read_bytes(N)?);
        Ok(output)
    }

    /// Borrow everything not yet read, leaving the reader at the end
    pub fn read_rest(&mut self) -> &'b [u8] {
        let start = self.cursor;
        self.cursor = self.buffer.len();
        &self.buffer[start..]
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
