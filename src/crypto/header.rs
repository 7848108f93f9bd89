//! The fixed 96-byte container header.
//!
//! Layout:
//! ```text
//! MAGIC (6) | VERSION (1) | LOG2_N (1) | R (4, BE) | P (4, BE) |
//! SALT (32) | SHA-256[..16] of bytes 0..48 | HMAC-SHA256 of bytes 0..64
//! ```
//!
//! The truncated checksum catches accidental corruption without a key;
//! the HMAC binds the header to the derived authentication subkey. Both
//! must validate before any payload work.

use anyhow::Result;
use sha2::{Digest, Sha256};

use super::kdf::CostParams;
use super::{CHECKSUM_LEN, MAC_LEN, MAGIC_LEN, SALT_LEN, VER_LEN, mac};
use crate::error::SealError;

pub const VERSION_V1: u8 = 1;
pub const MAGIC: &[u8; MAGIC_LEN] = b"sealbx";

const VER_OFF: usize = MAGIC_LEN;
const LOGN_OFF: usize = VER_OFF + VER_LEN;
const R_OFF: usize = LOGN_OFF + 1;
const P_OFF: usize = R_OFF + 4;
const SALT_OFF: usize = P_OFF + 4;
const CHECKSUM_OFF: usize = SALT_OFF + SALT_LEN;
const MAC_OFF: usize = CHECKSUM_OFF + CHECKSUM_LEN;

#[derive(Debug)]
pub struct Header {
    version: u8,
    params: CostParams,
    salt: [u8; SALT_LEN],
}

impl Header {
    pub const LEN: usize = MAC_OFF + MAC_LEN;

    pub fn new(params: CostParams, salt: [u8; SALT_LEN]) -> Self {
        Self {
            version: VERSION_V1,
            params,
            salt,
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn params(&self) -> &CostParams {
        &self.params
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// Serializes the header, computing the checksum and the header MAC
    /// keyed by the authentication subkey.
    pub fn to_bytes(&self, mac_key: &[u8]) -> Result<[u8; Self::LEN]> {
        let mut buf = [0u8; Self::LEN];

        buf[..MAGIC_LEN].copy_from_slice(MAGIC);
        buf[VER_OFF] = self.version;
        buf[LOGN_OFF] = self.params.log2_n();
        buf[R_OFF..R_OFF + 4].copy_from_slice(&self.params.r().to_be_bytes());
        buf[P_OFF..P_OFF + 4].copy_from_slice(&self.params.p().to_be_bytes());
        buf[SALT_OFF..SALT_OFF + SALT_LEN].copy_from_slice(&self.salt);

        let digest = Sha256::digest(&buf[..CHECKSUM_OFF]);
        buf[CHECKSUM_OFF..MAC_OFF].copy_from_slice(&digest[..CHECKSUM_LEN]);

        let tag = mac::compute(mac_key, &buf[..MAC_OFF])?;
        buf[MAC_OFF..].copy_from_slice(&tag);

        Ok(buf)
    }

    /// Parses and checksums a header. The header MAC is not checked here;
    /// it needs the derived key, see [`Header::authenticate`].
    ///
    /// # Errors
    ///
    /// [`SealError::UnsupportedFormat`] on bad magic or version,
    /// [`SealError::CorruptHeader`] on truncation or checksum mismatch.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < MAGIC_LEN + VER_LEN || &data[..MAGIC_LEN] != MAGIC {
            return Err(SealError::UnsupportedFormat.into());
        }
        if data[VER_OFF] != VERSION_V1 {
            return Err(SealError::UnsupportedFormat.into());
        }
        if data.len() < Self::LEN {
            return Err(SealError::CorruptHeader.into());
        }

        let digest = Sha256::digest(&data[..CHECKSUM_OFF]);
        if digest[..CHECKSUM_LEN] != data[CHECKSUM_OFF..MAC_OFF] {
            return Err(SealError::CorruptHeader.into());
        }

        let log2_n = data[LOGN_OFF];
        let r = u32::from_be_bytes([
            data[R_OFF],
            data[R_OFF + 1],
            data[R_OFF + 2],
            data[R_OFF + 3],
        ]);
        let p = u32::from_be_bytes([
            data[P_OFF],
            data[P_OFF + 1],
            data[P_OFF + 2],
            data[P_OFF + 3],
        ]);

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&data[SALT_OFF..SALT_OFF + SALT_LEN]);

        Ok(Self {
            version: data[VER_OFF],
            params: CostParams::from_parts(log2_n, r, p)?,
            salt,
        })
    }

    /// Verifies the header MAC over the raw header bytes with the derived
    /// authentication subkey.
    ///
    /// # Errors
    ///
    /// [`SealError::WrongPassphraseOrCorrupt`] on mismatch; the error does
    /// not reveal which of the two causes applies.
    pub fn authenticate(raw: &[u8], mac_key: &[u8]) -> Result<()> {
        if raw.len() < Self::LEN {
            return Err(SealError::CorruptHeader.into());
        }
        if !mac::verify(mac_key, &raw[..MAC_OFF], &raw[MAC_OFF..Self::LEN])? {
            return Err(SealError::WrongPassphraseOrCorrupt.into());
        }
        Ok(())
    }
}
