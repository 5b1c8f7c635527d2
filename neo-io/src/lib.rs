//! # Neo IO
//!
//! Binary codec for the Neo N3 wire format.
//!
//! Everything the network exchanges is encoded little-endian, with
//! variable-length integers (`VarInt`) prefixing byte strings and arrays.
//! This crate provides the two halves of that codec:
//!
//! - [`MemoryReader`]: a bounds-checked cursor over a borrowed buffer, with
//!   mark/reset for speculative reads.
//! - [`BinaryWriter`]: an append-only buffer producing canonical encodings.
//!
//! Types that travel on the wire implement [`Serializable`].
//!
//! ## Example
//!
//! ```rust
//! use neo_io::{BinaryWriter, MemoryReader};
//!
//! let mut writer = BinaryWriter::new();
//! writer.write_u32(42);
//! writer.write_var_string("Hello, Neo!");
//! let bytes = writer.into_bytes();
//!
//! let mut reader = MemoryReader::new(&bytes);
//! assert_eq!(reader.read_u32().unwrap(), 42);
//! assert_eq!(reader.read_var_string(64).unwrap(), "Hello, Neo!");
//! ```

pub mod binary_writer;
pub mod error;
pub mod memory_reader;
pub mod serializable;

pub use binary_writer::BinaryWriter;
pub use error::{IoError, IoResult};
pub use memory_reader::MemoryReader;
pub use serializable::helper::{
    deserialize_array, get_var_size, get_var_size_bytes, get_var_size_serializable_slice,
    get_var_size_str, get_var_size_usize, serialize_array,
};
pub use serializable::Serializable;

/// Size in bytes of a compressed EC point.
pub const EC_POINT_COMPRESSED_SIZE: usize = 33;

/// Size in bytes of an uncompressed EC point.
pub const EC_POINT_UNCOMPRESSED_SIZE: usize = 65;

/// Returns the encoded length implied by an EC point prefix byte.
///
/// `0x00` is the point at infinity (a single byte), `0x02`/`0x03` start a
/// compressed point and `0x04` an uncompressed one.
#[inline]
pub fn ec_point_encoded_len(prefix: u8) -> Option<usize> {
    match prefix {
        0x00 => Some(1),
        0x02 | 0x03 => Some(EC_POINT_COMPRESSED_SIZE),
        0x04 => Some(EC_POINT_UNCOMPRESSED_SIZE),
        _ => None,
    }
}
