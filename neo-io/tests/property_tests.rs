//! Property-based tests for the neo-io codec.

use neo_io::{get_var_size, BinaryWriter, IoError, MemoryReader};
use proptest::prelude::*;

proptest! {
    /// Every var-int decodes back to itself and consumes exactly its encoded size.
    #[test]
    fn test_var_int_round_trip(value in any::<u64>()) {
        let mut writer = BinaryWriter::new();
        writer.write_var_int(value);
        let bytes = writer.into_bytes();
        prop_assert_eq!(bytes.len(), get_var_size(value));

        let mut reader = MemoryReader::new(&bytes);
        prop_assert_eq!(reader.read_var_int(u64::MAX).unwrap(), value);
        prop_assert!(reader.is_at_end());
    }

    /// A var-int larger than the caller's bound is rejected without consuming input.
    #[test]
    fn test_var_int_bound(value in 1u64..u64::MAX) {
        let mut writer = BinaryWriter::new();
        writer.write_var_int(value);
        let bytes = writer.into_bytes();

        let mut reader = MemoryReader::new(&bytes);
        let is_out_of_range = matches!(reader.read_var_int(value - 1), Err(IoError::ValueOutOfRange { .. }));
        prop_assert!(is_out_of_range);
        prop_assert_eq!(reader.position(), 0);
    }

    /// Var-bytes survive a round trip and truncation is always detected.
    #[test]
    fn test_var_bytes_round_trip(data in proptest::collection::vec(any::<u8>(), 0..600)) {
        let mut writer = BinaryWriter::new();
        writer.write_var_bytes(&data);
        let bytes = writer.into_bytes();

        let mut reader = MemoryReader::new(&bytes);
        prop_assert_eq!(reader.read_var_bytes(data.len()).unwrap(), &data[..]);

        if !data.is_empty() {
            let truncated = &bytes[..bytes.len() - 1];
            let mut reader = MemoryReader::new(truncated);
            prop_assert!(reader.read_var_bytes(data.len()).is_err());
            prop_assert_eq!(reader.position(), 0);
        }
    }

    /// Every fixed-width integer and bool reads back as written, in order.
    #[test]
    fn test_fixed_width_round_trip(
        a in any::<u8>(),
        b in any::<i8>(),
        c in any::<u16>(),
        d in any::<i16>(),
        e in any::<u32>(),
        f in any::<i32>(),
        g in any::<u64>(),
        h in any::<i64>(),
        flag in any::<bool>(),
    ) {
        let mut writer = BinaryWriter::new();
        writer.write_u8(a);
        writer.write_i8(b);
        writer.write_u16(c);
        writer.write_i16(d);
        writer.write_u32(e);
        writer.write_i32(f);
        writer.write_u64(g);
        writer.write_i64(h);
        writer.write_bool(flag);
        let bytes = writer.into_bytes();
        prop_assert_eq!(bytes.len(), 1 + 1 + 2 + 2 + 4 + 4 + 8 + 8 + 1);

        let mut reader = MemoryReader::new(&bytes);
        prop_assert_eq!(reader.read_u8().unwrap(), a);
        prop_assert_eq!(reader.read_i8().unwrap(), b);
        prop_assert_eq!(reader.read_u16().unwrap(), c);
        prop_assert_eq!(reader.read_i16().unwrap(), d);
        prop_assert_eq!(reader.read_u32().unwrap(), e);
        prop_assert_eq!(reader.read_i32().unwrap(), f);
        prop_assert_eq!(reader.read_u64().unwrap(), g);
        prop_assert_eq!(reader.read_i64().unwrap(), h);
        prop_assert_eq!(reader.read_bool().unwrap(), flag);
        prop_assert!(reader.is_at_end());
    }

    /// Integers are little-endian on the wire.
    #[test]
    fn test_integers_are_little_endian(value in any::<i32>()) {
        let mut writer = BinaryWriter::new();
        writer.write_i32(value);
        prop_assert_eq!(writer.into_bytes(), value.to_le_bytes().to_vec());
    }

    /// Any UTF-8 text survives a var-string round trip.
    #[test]
    fn test_var_string_round_trip(value in any::<String>()) {
        let mut writer = BinaryWriter::new();
        writer.write_var_string(&value);
        let bytes = writer.into_bytes();
        prop_assert_eq!(bytes.len(), get_var_size(value.len() as u64) + value.len());

        let mut reader = MemoryReader::new(&bytes);
        prop_assert_eq!(reader.read_var_string(value.len()).unwrap(), value);
        prop_assert!(reader.is_at_end());
    }

    /// Strings written into fixed fields come back unchanged.
    #[test]
    fn test_fixed_string_round_trip(value in "[a-zA-Z0-9 .-]{0,64}") {
        let mut writer = BinaryWriter::new();
        writer.write_fixed_string(&value, 64).unwrap();
        let bytes = writer.into_bytes();
        prop_assert_eq!(bytes.len(), 64);

        let mut reader = MemoryReader::new(&bytes);
        prop_assert_eq!(reader.read_fixed_string(64).unwrap(), value);
    }
}

#[test]
fn test_mixed_record_decoding() {
    let mut writer = BinaryWriter::new();
    writer.write_u8(0);
    writer.write_u32(0xdead_beef);
    writer.write_var_string("Neo");
    writer.write_u64(u64::MAX);
    let bytes = writer.into_bytes();

    let mut reader = MemoryReader::new(&bytes);
    assert_eq!(reader.read_u8().unwrap(), 0);
    assert_eq!(reader.read_u32().unwrap(), 0xdead_beef);
    assert_eq!(reader.read_var_string(3).unwrap(), "Neo");
    assert_eq!(reader.read_u64().unwrap(), u64::MAX);
    assert!(reader.read_u8().is_err());
}
