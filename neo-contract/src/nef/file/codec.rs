use super::NefFile;
use crate::error::{ContractError, ContractResult};
use crate::nef::{
    COMPILER_FIELD_SIZE, MAX_SCRIPT_SIZE, NEF_MAGIC, SOURCE_URL_MAX, TOKENS_MAX,
};
use neo_io::{
    get_var_size_bytes, get_var_size_serializable_slice, get_var_size_str, BinaryWriter,
    IoError, IoResult, MemoryReader, Serializable,
};

/// Reads the raw fields without checking the checksum.
fn decode_fields(reader: &mut MemoryReader) -> IoResult<NefFile> {
    let magic = reader.read_u32()?;
    if magic != NEF_MAGIC {
        return Err(IoError::invalid_data(format!(
            "NEF magic 0x{magic:08x}, expected 0x{NEF_MAGIC:08x}"
        )));
    }
    let compiler = reader.read_fixed_string(COMPILER_FIELD_SIZE)?;
    let source = reader.read_var_string(SOURCE_URL_MAX)?;
    if reader.read_u8()? != 0 {
        return Err(IoError::invalid_data("NEF reserved byte must be zero"));
    }
    let tokens = reader.read_serializable_array(TOKENS_MAX)?;
    if reader.read_u16()? != 0 {
        return Err(IoError::invalid_data("NEF reserved word must be zero"));
    }
    let script = reader.read_var_bytes(MAX_SCRIPT_SIZE)?.to_vec();
    let checksum = reader.read_u32()?;
    Ok(NefFile {
        magic,
        compiler,
        source,
        tokens,
        script,
        checksum,
    })
}

/// Decodes a whole buffer, rejecting trailing bytes.
pub(super) fn decode_exact(bytes: &[u8]) -> ContractResult<NefFile> {
    let mut reader = MemoryReader::new(bytes);
    let nef = decode_fields(&mut reader)?;
    if !reader.is_at_end() {
        return Err(ContractError::invalid_nef(
            "record",
            format!("{} trailing bytes", reader.remaining()),
        ));
    }
    Ok(nef)
}

impl Serializable for NefFile {
    fn size(&self) -> usize {
        4 + COMPILER_FIELD_SIZE
            + get_var_size_str(&self.source)
            + 1
            + get_var_size_serializable_slice(&self.tokens)
            + 2
            + get_var_size_bytes(&self.script)
            + 4
    }

    fn serialize(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        self.encode_without_checksum(writer)?;
        writer.write_u32(self.checksum);
        Ok(())
    }

    /// Full decode with validation; a checksum mismatch is reported as
    /// invalid data here. Use [`NefFile::from_bytes`] to tell it apart.
    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        let nef = decode_fields(reader)?;
        nef.validate()
            .map_err(|e| IoError::invalid_data(e.to_string()))?;
        if !nef.verify_checksum() {
            return Err(IoError::invalid_data("NEF checksum mismatch"));
        }
        Ok(nef)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_vm::OpCode;

    fn sample() -> NefFile {
        NefFile::new(
            "test-compiler-1.0",
            "",
            vec![],
            vec![OpCode::PUSH1 as u8, OpCode::RET as u8],
        )
        .unwrap()
    }

    #[test]
    fn test_layout() {
        let nef = sample();
        let bytes = nef.to_array().unwrap();
        assert_eq!(bytes.len(), nef.size());
        assert_eq!(&bytes[..4], b"NEF3");
        assert_eq!(&bytes[4..21], b"test-compiler-1.0");
        assert!(bytes[21..68].iter().all(|&b| b == 0));
        // source, reserved, token count, reserved word
        assert_eq!(&bytes[68..73], &[0, 0, 0, 0, 0]);
        assert_eq!(&bytes[73..76], &[2, OpCode::PUSH1 as u8, OpCode::RET as u8]);
        assert_eq!(
            u32::from_le_bytes([bytes[76], bytes[77], bytes[78], bytes[79]]),
            nef.checksum()
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let nef = sample();
        let bytes = nef.to_array().unwrap();
        assert_eq!(NefFile::from_bytes(&bytes).unwrap(), nef);
        assert_eq!(NefFile::from_array(&bytes).unwrap(), nef);
    }

    #[test]
    fn test_checksum_mismatch_is_distinct() {
        let nef = sample();
        let mut bytes = nef.to_array().unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        assert!(matches!(
            NefFile::from_bytes(&bytes),
            Err(ContractError::ChecksumMismatch { .. })
        ));
        assert!(NefFile::from_array(&bytes).is_err());
    }

    #[test]
    fn test_rejects_bad_records() {
        let bytes = sample().to_array().unwrap();

        let mut bad_magic = bytes.clone();
        bad_magic[0] = b'X';
        assert!(matches!(
            NefFile::from_bytes(&bad_magic),
            Err(ContractError::Io(_))
        ));

        let mut trailing = bytes.clone();
        trailing.push(0);
        assert!(matches!(
            NefFile::from_bytes(&trailing),
            Err(ContractError::InvalidNef { field: "record", .. })
        ));

        assert!(NefFile::from_bytes(&bytes[..bytes.len() - 1]).is_err());

        let oversized = vec![0u8; crate::nef::MAX_NEF_SIZE + 1];
        assert!(matches!(
            NefFile::from_bytes(&oversized),
            Err(ContractError::RecordTooLarge { .. })
        ));
    }
}
