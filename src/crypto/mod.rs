//! Cryptographic core of the container format.
//!
//! Provides the memory-hard KDF (salsa block transform, block mix, the
//! scratch-buffer mix and the scrypt derive built on them), the keystream
//! used for payload encryption, MAC helpers and the container header.

pub mod header;
pub mod kdf;
pub mod mac;
pub mod romix;
pub mod salsa;
pub mod stream;

pub use header::Header;
pub use kdf::{CostParams, derive_key};

use anyhow::{Result, anyhow};
use getrandom::fill;

/// Length of one salsa block (64 bytes).
pub const BLOCK_LEN: usize = 64;
/// Length of the salt stored in the header (32 bytes).
pub const SALT_LEN: usize = 32;
/// Length of the derived key (64 bytes: encryption subkey + auth subkey).
pub const DERIVED_KEY_LEN: usize = 64;
/// Length of each subkey (32 bytes / 256 bits).
pub const SUBKEY_LEN: usize = 32;
/// Length of an HMAC-SHA256 tag (32 bytes).
pub const MAC_LEN: usize = 32;
/// Length of the truncated header checksum (16 bytes).
pub const CHECKSUM_LEN: usize = 16;
/// Length of the magic bytes (6 bytes "sealbx").
pub const MAGIC_LEN: usize = 6;
/// Length of the version field (1 byte).
pub const VER_LEN: usize = 1;

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<()> {
    fill(buf).map_err(|_| anyhow!("OS random generator unavailable"))
}

/// Generate a fresh random salt
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    secure_random(&mut salt)?;
    Ok(salt)
}
