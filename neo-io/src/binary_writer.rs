use crate::{ec_point_encoded_len, IoError, IoResult, Serializable};

/// Append-only little-endian writer backed by an owned buffer.
///
/// Writes into memory cannot fail; only methods that validate their input
/// (fixed-width strings, EC points) return a `Result`.
#[derive(Debug, Default, Clone)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    #[inline]
    pub fn write_i8(&mut self, value: i8) {
        self.buffer.push(value as u8);
    }

    #[inline]
    pub fn write_bool(&mut self, value: bool) {
        self.buffer.push(u8::from(value));
    }

    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_i16(&mut self, value: i16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_u64(&mut self, value: u64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_i64(&mut self, value: i64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes raw bytes without a length prefix.
    #[inline]
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Writes a variable-length integer using the shortest encoding.
    pub fn write_var_int(&mut self, value: u64) {
        if value < 0xfd {
            self.write_u8(value as u8);
        } else if value <= 0xffff {
            self.write_u8(0xfd);
            self.write_u16(value as u16);
        } else if value <= 0xffff_ffff {
            self.write_u8(0xfe);
            self.write_u32(value as u32);
        } else {
            self.write_u8(0xff);
            self.write_u64(value);
        }
    }

    /// Writes a var-int length followed by the bytes.
    pub fn write_var_bytes(&mut self, data: &[u8]) {
        self.write_var_int(data.len() as u64);
        self.write_bytes(data);
    }

    /// Writes a var-int length followed by the UTF-8 bytes of `value`.
    pub fn write_var_string(&mut self, value: &str) {
        self.write_var_bytes(value.as_bytes());
    }

    /// Writes `value` into a field of exactly `length` bytes, zero padded.
    pub fn write_fixed_string(&mut self, value: &str, length: usize) -> IoResult<()> {
        let bytes = value.as_bytes();
        if bytes.len() > length {
            return Err(IoError::ValueOutOfRange {
                entity: "fixed-string",
                value: bytes.len() as u64,
                max: length as u64,
            });
        }
        self.write_bytes(bytes);
        self.buffer.resize(self.buffer.len() + length - bytes.len(), 0);
        Ok(())
    }

    /// Writes an encoded EC point after checking its prefix and length.
    pub fn write_ec_point(&mut self, encoded: &[u8]) -> IoResult<()> {
        let prefix = *encoded
            .first()
            .ok_or_else(|| IoError::invalid_data("empty EC point"))?;
        let expected = ec_point_encoded_len(prefix).ok_or(IoError::InvalidEcPointPrefix(prefix))?;
        if encoded.len() != expected {
            return Err(IoError::invalid_data(format!(
                "EC point with prefix 0x{prefix:02x} must be {expected} bytes, got {}",
                encoded.len()
            )));
        }
        self.write_bytes(encoded);
        Ok(())
    }

    pub fn write_serializable<T: Serializable>(&mut self, value: &T) -> IoResult<()> {
        value.serialize(self)
    }

    /// Writes a var-int count followed by each item.
    pub fn write_serializable_array<T: Serializable>(&mut self, values: &[T]) -> IoResult<()> {
        crate::serialize_array(values, self)
    }
}
