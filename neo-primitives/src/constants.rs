//! Protocol constants shared by the primitive types.

/// Size of a script hash in bytes.
pub const ADDRESS_SIZE: usize = 20;

/// Size of a transaction or block hash in bytes.
pub const HASH_SIZE: usize = 32;

/// Version byte prepended to a script hash before Base58Check encoding (N3 addresses start with `N`).
pub const ADDRESS_VERSION: u8 = 0x35;

/// Length of a decoded address: version byte, script hash and 4-byte checksum.
pub const ADDRESS_PAYLOAD_SIZE: usize = 1 + ADDRESS_SIZE + 4;
