//! # Snapnet Serde
//! Fixed-width, byte-aligned, little-endian serialization for the snapnet
//! snapshot wire format.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod byte_reader;
mod byte_writer;
mod error;
mod integer;
mod serde;

pub use byte_reader::ByteReader;
pub use byte_writer::{ByteCounter, ByteWrite, ByteWriter};
pub use error::SerdeErr;
pub use serde::{ConstByteLength, Serde};
