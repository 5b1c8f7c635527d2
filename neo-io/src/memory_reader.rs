use std::mem::size_of;

use byteorder::{ByteOrder, LittleEndian};

use crate::{ec_point_encoded_len, IoError, IoResult, Serializable};

/// A bounds-checked little-endian cursor over a borrowed byte buffer.
///
/// The position always stays within `[0, len]`. A failed read leaves the
/// position where it was.
///
/// # Examples
///
/// ```rust
/// use neo_io::MemoryReader;
///
/// let data = [0xfd, 0x00, 0x01, 0x2a];
/// let mut reader = MemoryReader::new(&data);
/// assert_eq!(reader.read_var_int(u64::MAX).unwrap(), 0x100);
/// assert_eq!(reader.read_u8().unwrap(), 42);
/// assert!(reader.read_u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MemoryReader<'a> {
    memory: &'a [u8],
    pos: usize,
    mark: Option<usize>,
}

impl<'a> MemoryReader<'a> {
    pub fn new(memory: &'a [u8]) -> Self {
        Self {
            memory,
            pos: 0,
            mark: None,
        }
    }

    #[inline(always)]
    fn ensure_position(&self, move_by: usize, entity: &'static str) -> IoResult<()> {
        let remaining = self.remaining();
        if move_by > remaining {
            Err(IoError::eof(entity, move_by, remaining))
        } else {
            Ok(())
        }
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.memory.len() - self.pos
    }

    /// Returns `true` once every byte has been consumed.
    #[inline(always)]
    pub fn is_at_end(&self) -> bool {
        self.pos == self.memory.len()
    }

    /// Remembers the current position for a later [`reset`](Self::reset).
    pub fn mark(&mut self) {
        self.mark = Some(self.pos);
    }

    /// Returns to the most recent mark. The mark stays set, so a caller can
    /// probe several formats from the same starting point.
    pub fn reset(&mut self) -> IoResult<()> {
        let mark = self.mark.ok_or(IoError::NoMark)?;
        self.pos = mark;
        Ok(())
    }

    /// Advances the position by `count` bytes.
    pub fn skip(&mut self, count: usize) -> IoResult<()> {
        self.ensure_position(count, "skip")?;
        self.pos += count;
        Ok(())
    }

    #[inline(always)]
    pub fn peek(&self) -> IoResult<u8> {
        self.ensure_position(1, "byte")?;
        Ok(self.memory[self.pos])
    }

    /// Reads one byte: zero is `false`, anything else is `true`.
    pub fn read_bool(&mut self) -> IoResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    #[inline(always)]
    pub fn read_u8(&mut self) -> IoResult<u8> {
        self.ensure_position(1, "u8")?;
        let value = self.memory[self.pos];
        self.pos += 1;
        Ok(value)
    }

    #[inline(always)]
    pub fn read_i8(&mut self) -> IoResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    #[inline(always)]
    pub fn read_u16(&mut self) -> IoResult<u16> {
        self.ensure_position(size_of::<u16>(), "u16")?;
        let value = LittleEndian::read_u16(&self.memory[self.pos..]);
        self.pos += size_of::<u16>();
        Ok(value)
    }

    #[inline(always)]
    pub fn read_i16(&mut self) -> IoResult<i16> {
        self.ensure_position(size_of::<i16>(), "i16")?;
        let value = LittleEndian::read_i16(&self.memory[self.pos..]);
        self.pos += size_of::<i16>();
        Ok(value)
    }

    #[inline(always)]
    pub fn read_u32(&mut self) -> IoResult<u32> {
        self.ensure_position(size_of::<u32>(), "u32")?;
        let value = LittleEndian::read_u32(&self.memory[self.pos..]);
        self.pos += size_of::<u32>();
        Ok(value)
    }

    #[inline(always)]
    pub fn read_i32(&mut self) -> IoResult<i32> {
        self.ensure_position(size_of::<i32>(), "i32")?;
        let value = LittleEndian::read_i32(&self.memory[self.pos..]);
        self.pos += size_of::<i32>();
        Ok(value)
    }

    #[inline(always)]
    pub fn read_u64(&mut self) -> IoResult<u64> {
        self.ensure_position(size_of::<u64>(), "u64")?;
        let value = LittleEndian::read_u64(&self.memory[self.pos..]);
        self.pos += size_of::<u64>();
        Ok(value)
    }

    #[inline(always)]
    pub fn read_i64(&mut self) -> IoResult<i64> {
        self.ensure_position(size_of::<i64>(), "i64")?;
        let value = LittleEndian::read_i64(&self.memory[self.pos..]);
        self.pos += size_of::<i64>();
        Ok(value)
    }

    /// Reads a variable-length integer no greater than `max`.
    ///
    /// Encodings that use a wider tag than necessary are rejected.
    pub fn read_var_int(&mut self, max: u64) -> IoResult<u64> {
        let start = self.pos;
        let result = self.read_var_int_unchecked().and_then(|value| {
            if value > max {
                Err(IoError::ValueOutOfRange {
                    entity: "var-int",
                    value,
                    max,
                })
            } else {
                Ok(value)
            }
        });
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    fn read_var_int_unchecked(&mut self) -> IoResult<u64> {
        let prefix = self.read_u8()?;
        let (value, min) = match prefix {
            0xfd => (self.read_u16()? as u64, 0xfd),
            0xfe => (self.read_u32()? as u64, 0x1_0000),
            0xff => (self.read_u64()?, 0x1_0000_0000),
            _ => return Ok(prefix as u64),
        };
        if value < min {
            return Err(IoError::NonCanonicalVarInt { prefix, value });
        }
        Ok(value)
    }

    /// Reads exactly `count` bytes.
    #[inline(always)]
    pub fn read_bytes(&mut self, count: usize) -> IoResult<&'a [u8]> {
        self.ensure_position(count, "bytes")?;
        let result = &self.memory[self.pos..self.pos + count];
        self.pos += count;
        Ok(result)
    }

    /// Reads a var-int length prefix (at most `max`) followed by that many bytes.
    pub fn read_var_bytes(&mut self, max: usize) -> IoResult<&'a [u8]> {
        let start = self.pos;
        let length = self.read_var_int(max as u64)? as usize;
        self.read_bytes(length).map_err(|err| {
            self.pos = start;
            err
        })
    }

    /// Reads a var-int prefixed UTF-8 string of at most `max` bytes.
    pub fn read_var_string(&mut self, max: usize) -> IoResult<String> {
        let start = self.pos;
        let data = self.read_var_bytes(max)?;
        std::str::from_utf8(data).map(str::to_owned).map_err(|_| {
            self.pos = start;
            IoError::InvalidUtf8 {
                entity: "var-string",
            }
        })
    }

    /// Reads a zero-padded UTF-8 string occupying exactly `length` bytes.
    pub fn read_fixed_string(&mut self, length: usize) -> IoResult<String> {
        self.ensure_position(length, "fixed-string")?;
        let field = &self.memory[self.pos..self.pos + length];
        let end = field.iter().position(|&b| b == 0).unwrap_or(length);
        if field[end..].iter().any(|&b| b != 0) {
            return Err(IoError::invalid_data("fixed string has data after padding"));
        }
        let value = std::str::from_utf8(&field[..end])
            .map_err(|_| IoError::InvalidUtf8 {
                entity: "fixed-string",
            })?
            .to_owned();
        self.pos += length;
        Ok(value)
    }

    /// Reads an encoded EC point and returns its raw bytes.
    ///
    /// The prefix decides the length: `0x00` (infinity, 1 byte),
    /// `0x02`/`0x03` (33 bytes) or `0x04` (65 bytes).
    pub fn read_ec_point(&mut self) -> IoResult<&'a [u8]> {
        let prefix = self.peek()?;
        let length = ec_point_encoded_len(prefix).ok_or(IoError::InvalidEcPointPrefix(prefix))?;
        self.read_bytes(length)
    }

    /// Reads a single serializable value.
    pub fn read_serializable<T: Serializable>(&mut self) -> IoResult<T> {
        T::deserialize(self)
    }

    /// Reads a var-int counted array of at most `max` serializable values.
    pub fn read_serializable_array<T: Serializable>(&mut self, max: usize) -> IoResult<Vec<T>> {
        crate::deserialize_array(self, max)
    }

    #[inline(always)]
    pub fn read_to_end(&mut self) -> &'a [u8] {
        let result = &self.memory[self.pos..];
        self.pos = self.memory.len();
        result
    }
}
