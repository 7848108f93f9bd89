//! HMAC-SHA256 helpers for header and payload authentication.

use anyhow::{Result, anyhow};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::MAC_LEN;

type HmacSha256 = Hmac<Sha256>;

pub fn compute(key: &[u8], data: &[u8]) -> Result<[u8; MAC_LEN]> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| anyhow!("invalid MAC key"))?;
    mac.update(data);
    let mut tag = [0u8; MAC_LEN];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    Ok(tag)
}

/// Constant-time tag verification. Returns `Ok(false)` on mismatch rather
/// than an error so callers choose their own failure classification.
pub fn verify(key: &[u8], data: &[u8], tag: &[u8]) -> Result<bool> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| anyhow!("invalid MAC key"))?;
    mac.update(data);
    Ok(mac.verify_slice(tag).is_ok())
}
