use crate::{
    byte_reader::ByteReader, byte_writer::ByteWrite, error::SerdeErr, serde::Serde,
    ConstByteLength,
};

// Numbers are written little-endian at their native width.
macro_rules! impl_serde_for_number {
    ($($t:ty),*) => {$(
        impl Serde for $t {
            fn ser(&self, writer: &mut dyn ByteWrite) {
                writer.write_bytes(&self.to_le_bytes());
            }

            fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
                let bytes = reader.read_array::<{ std::mem::size_of::<$t>() }>()?;
                Ok(<$t>::from_le_bytes(bytes))
            }

            fn byte_length(&self) -> usize {
                std::mem::size_of::<$t>()
            }
        }

        impl ConstByteLength for $t {
            fn const_byte_length() -> usize {
                std::mem::size_of::<$t>()
            }
        }
    )*};
}

impl_serde_for_number!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl Serde for bool {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(u8::from(*self));
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(SerdeErr::InvalidBool { byte }),
        }
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl ConstByteLength for bool {
    fn const_byte_length() -> usize {
        1
    }
}

impl<T: Serde + Copy + Default, const N: usize> Serde for [T; N] {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        for item in self {
            item.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let mut output = [T::default(); N];
        for item in output.iter_mut() {
            *item = T::de(reader)?;
        }
        Ok(output)
    }

    fn byte_length(&self) -> usize {
        self.iter().map(Serde::byte_length).sum()
    }
}

impl<T: ConstByteLength, const N: usize> ConstByteLength for [T; N] {
    fn const_byte_length() -> usize {
        T::const_byte_length() * N
    }
}

// Tests
