mod codec;
mod json;

use crate::error::{ContractError, ContractResult};
use crate::nef::{
    MethodToken, COMPILER_FIELD_SIZE, MAX_NEF_SIZE, MAX_SCRIPT_SIZE, NEF_MAGIC, SOURCE_URL_MAX,
    TOKENS_MAX,
};
use neo_crypto::Crypto;
use neo_io::{BinaryWriter, IoResult};
use std::path::Path;
use tracing::debug;

/// A compiled contract: script plus the static calls it makes.
///
/// Every constructor validates the content, and [`NefFile::new`] stamps the
/// checksum. The setters re-validate but leave the checksum alone, so the
/// container reports [`verify_checksum`](Self::verify_checksum) `false`
/// until [`update_checksum`](Self::update_checksum) runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NefFile {
    magic: u32,
    compiler: String,
    source: String,
    tokens: Vec<MethodToken>,
    script: Vec<u8>,
    checksum: u32,
}

impl NefFile {
    pub fn new(
        compiler: impl Into<String>,
        source: impl Into<String>,
        tokens: Vec<MethodToken>,
        script: Vec<u8>,
    ) -> ContractResult<Self> {
        let mut nef = Self {
            magic: NEF_MAGIC,
            compiler: compiler.into(),
            source: source.into(),
            tokens,
            script,
            checksum: 0,
        };
        nef.validate()?;
        nef.update_checksum()?;
        Ok(nef)
    }

    /// Assembles a container with an externally supplied magic and checksum.
    ///
    /// The content is validated; the checksum is taken as given and can be
    /// checked with [`verify_checksum`](Self::verify_checksum).
    pub fn from_parts(
        magic: u32,
        compiler: impl Into<String>,
        source: impl Into<String>,
        tokens: Vec<MethodToken>,
        script: Vec<u8>,
        checksum: u32,
    ) -> ContractResult<Self> {
        let nef = Self {
            magic,
            compiler: compiler.into(),
            source: source.into(),
            tokens,
            script,
            checksum,
        };
        nef.validate()?;
        Ok(nef)
    }

    pub fn magic(&self) -> u32 {
        self.magic
    }

    pub fn has_valid_magic(&self) -> bool {
        self.magic == NEF_MAGIC
    }

    pub fn compiler(&self) -> &str {
        &self.compiler
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[MethodToken] {
        &self.tokens
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }

    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Replaces the script. The checksum is not recomputed.
    pub fn set_script(&mut self, script: Vec<u8>) -> ContractResult<()> {
        validate_script(&script)?;
        self.script = script;
        Ok(())
    }

    /// Replaces the source URL. The checksum is not recomputed.
    pub fn set_source(&mut self, source: impl Into<String>) -> ContractResult<()> {
        let source = source.into();
        validate_source(&source)?;
        self.source = source;
        Ok(())
    }

    /// Checks every field rule.
    pub fn validate(&self) -> ContractResult<()> {
        if !self.has_valid_magic() {
            return Err(ContractError::invalid_nef(
                "magic",
                format!("expected 0x{NEF_MAGIC:08x}, got 0x{:08x}", self.magic),
            ));
        }
        if self.compiler.is_empty() {
            return Err(ContractError::invalid_nef("compiler", "must not be empty"));
        }
        if self.compiler.len() > COMPILER_FIELD_SIZE {
            return Err(ContractError::invalid_nef(
                "compiler",
                format!(
                    "{} bytes exceeds {COMPILER_FIELD_SIZE}",
                    self.compiler.len()
                ),
            ));
        }
        validate_source(&self.source)?;
        if self.tokens.len() > TOKENS_MAX {
            return Err(ContractError::invalid_nef(
                "tokens",
                format!("{} tokens exceeds {TOKENS_MAX}", self.tokens.len()),
            ));
        }
        for token in &self.tokens {
            token.validate()?;
        }
        validate_script(&self.script)
    }

    /// First four bytes of Hash256 over the record without its checksum.
    pub fn compute_checksum(&self) -> ContractResult<u32> {
        let mut writer = BinaryWriter::new();
        self.encode_without_checksum(&mut writer)?;
        Ok(Crypto::checksum_u32(writer.as_bytes()))
    }

    pub fn verify_checksum(&self) -> bool {
        matches!(self.compute_checksum(), Ok(computed) if computed == self.checksum)
    }

    pub fn update_checksum(&mut self) -> ContractResult<()> {
        self.checksum = self.compute_checksum()?;
        Ok(())
    }

    /// Parses a serialized container.
    ///
    /// Oversized input and malformed fields fail first; a well-formed record
    /// whose checksum is wrong fails with [`ContractError::ChecksumMismatch`].
    pub fn from_bytes(bytes: &[u8]) -> ContractResult<Self> {
        if bytes.len() > MAX_NEF_SIZE {
            return Err(ContractError::RecordTooLarge {
                size: bytes.len(),
                max: MAX_NEF_SIZE,
            });
        }
        let nef = codec::decode_exact(bytes)?;
        nef.validate()?;
        let computed = nef.compute_checksum()?;
        if computed != nef.checksum {
            return Err(ContractError::ChecksumMismatch {
                stored: nef.checksum,
                computed,
            });
        }
        debug!(
            compiler = %nef.compiler,
            tokens = nef.tokens.len(),
            script_len = nef.script.len(),
            "parsed NEF"
        );
        Ok(nef)
    }

    /// Reads and parses a `.nef` file.
    pub fn from_file(path: impl AsRef<Path>) -> ContractResult<Self> {
        let path = path.as_ref();
        let file_error = |source| ContractError::File {
            path: path.to_path_buf(),
            source,
        };
        let len = std::fs::metadata(path).map_err(file_error)?.len();
        if len > MAX_NEF_SIZE as u64 {
            return Err(ContractError::RecordTooLarge {
                size: usize::try_from(len).unwrap_or(usize::MAX),
                max: MAX_NEF_SIZE,
            });
        }
        let bytes = std::fs::read(path).map_err(file_error)?;
        debug!(path = %path.display(), len = bytes.len(), "loading NEF file");
        Self::from_bytes(&bytes)
    }

    fn encode_without_checksum(&self, writer: &mut BinaryWriter) -> IoResult<()> {
        writer.write_u32(self.magic);
        writer.write_fixed_string(&self.compiler, COMPILER_FIELD_SIZE)?;
        writer.write_var_string(&self.source);
        writer.write_u8(0);
        writer.write_serializable_array(&self.tokens)?;
        writer.write_u16(0);
        writer.write_var_bytes(&self.script);
        Ok(())
    }
}

fn validate_source(source: &str) -> ContractResult<()> {
    if source.len() > SOURCE_URL_MAX {
        return Err(ContractError::invalid_nef(
            "source",
            format!("{} bytes exceeds {SOURCE_URL_MAX}", source.len()),
        ));
    }
    Ok(())
}

fn validate_script(script: &[u8]) -> ContractResult<()> {
    if script.is_empty() {
        return Err(ContractError::invalid_nef("script", "must not be empty"));
    }
    if script.len() > MAX_SCRIPT_SIZE {
        return Err(ContractError::invalid_nef(
            "script",
            format!("{} bytes exceeds {MAX_SCRIPT_SIZE}", script.len()),
        ));
    }
    neo_vm::script::validate_shape(script)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_primitives::UInt160;
    use neo_vm::{CallFlags, OpCode};

    fn sample() -> NefFile {
        let token =
            MethodToken::new(UInt160::from([0x11u8; 20]), "symbol", 0, true, CallFlags::ALL)
                .unwrap();
        NefFile::new(
            "test-compiler-1.0",
            "https://example.org/contract",
            vec![token],
            vec![OpCode::PUSH1 as u8, OpCode::RET as u8],
        )
        .unwrap()
    }

    #[test]
    fn test_new_stamps_checksum() {
        let nef = sample();
        assert!(nef.has_valid_magic());
        assert!(nef.verify_checksum());
        assert_ne!(nef.checksum(), 0);
    }

    #[test]
    fn test_mutation_breaks_checksum() {
        let mut nef = sample();
        nef.set_script(vec![OpCode::PUSH2 as u8, OpCode::RET as u8])
            .unwrap();
        assert!(!nef.verify_checksum());
        nef.update_checksum().unwrap();
        assert!(nef.verify_checksum());
    }

    #[test]
    fn test_field_rules() {
        let script = vec![OpCode::RET as u8];
        assert!(NefFile::new("", "", vec![], script.clone()).is_err());
        assert!(NefFile::new("c".repeat(65), "", vec![], script.clone()).is_err());
        assert!(NefFile::new("c", "s".repeat(257), vec![], script.clone()).is_err());
        assert!(NefFile::new("c", "", vec![], vec![]).is_err());
        assert!(NefFile::new("c", "", vec![], vec![0xFF]).is_err());
        assert!(NefFile::new("c", "", vec![], vec![OpCode::PUSHDATA1 as u8, 4]).is_err());
        assert!(NefFile::from_parts(0x1234, "c", "", vec![], script.clone(), 0).is_err());

        let token =
            MethodToken::new(UInt160::from([1u8; 20]), "m", 0, false, CallFlags::NONE).unwrap();
        assert!(NefFile::new("c", "", vec![token.clone(); 128], script.clone()).is_ok());
        assert!(NefFile::new("c", "", vec![token; 129], script).is_err());
    }

    #[test]
    fn test_from_parts_keeps_checksum() {
        let nef = sample();
        let copy = NefFile::from_parts(
            nef.magic(),
            nef.compiler(),
            nef.source(),
            nef.tokens().to_vec(),
            nef.script().to_vec(),
            nef.checksum() ^ 1,
        )
        .unwrap();
        assert!(!copy.verify_checksum());
    }
}
