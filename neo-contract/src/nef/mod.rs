//! The NEF executable container: compiled script, method tokens and checksum.

mod file;
mod token;

pub use file::NefFile;
pub use token::MethodToken;

/// `"NEF3"` read as a little-endian u32.
pub const NEF_MAGIC: u32 = 0x3346_454E;
/// Width of the zero-padded compiler field.
pub const COMPILER_FIELD_SIZE: usize = 64;
pub const SOURCE_URL_MAX: usize = 256;
pub const METHOD_NAME_MAX: usize = 32;
pub const TOKENS_MAX: usize = 128;
pub const MAX_SCRIPT_SIZE: usize = 512 * 1024;
/// Upper bound for a whole serialized container.
pub const MAX_NEF_SIZE: usize = 1024 * 1024;
