//! Sealing and opening of authenticated containers.
//!
//! A container is the 96-byte header, the keystream-encrypted payload and
//! a trailing HMAC over everything before it. The 64-byte derived key
//! splits into an encryption subkey (first half) and an authentication
//! subkey (second half); the two MACs are both keyed by the latter.

use anyhow::Result;
use zeroize::Zeroizing;

use crate::crypto::kdf::derive_with_params;
use crate::crypto::{
    CostParams, DERIVED_KEY_LEN, Header, MAC_LEN, SUBKEY_LEN, generate_salt, mac, stream,
};
use crate::error::SealError;
use crate::tuning;

/// Seals `plaintext` under a passphrase, picking cost parameters from the
/// given memory (bytes) and time (seconds) budget.
pub fn seal(plaintext: &[u8], passphrase: &[u8], max_mem: usize, max_time: f64) -> Result<Vec<u8>> {
    let params = tuning::choose_params(max_mem, max_time, tuning::MIN_SALSA_RATE)?;
    seal_with_params(plaintext, passphrase, &params)
}

/// Seals `plaintext` with explicit cost parameters.
pub fn seal_with_params(
    plaintext: &[u8],
    passphrase: &[u8],
    params: &CostParams,
) -> Result<Vec<u8>> {
    let salt = generate_salt()?;
    let key = derive_with_params(passphrase, &salt, params, DERIVED_KEY_LEN)?;
    let (enc_key, auth_key) = key.split_at(SUBKEY_LEN);

    let header = Header::new(*params, salt);
    let mut out = Vec::with_capacity(Header::LEN + plaintext.len() + MAC_LEN);
    out.extend_from_slice(&header.to_bytes(auth_key)?);

    out.extend_from_slice(plaintext);
    stream::keystream_xor(enc_key, &mut out[Header::LEN..])?;

    let tag = mac::compute(auth_key, &out)?;
    out.extend_from_slice(&tag);
    Ok(out)
}

/// Opens a sealed container, returning the plaintext.
///
/// Validation order: magic and version, header checksum, key derivation
/// from the stored parameters, header HMAC (so a wrong passphrase is
/// caught before touching the payload), then the trailing HMAC over
/// header plus ciphertext. Header and payload authenticity are separate
/// guarantees; both MACs must hold before plaintext is released.
pub fn open(container: &[u8], passphrase: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let header = Header::from_bytes(container)?;
    if container.len() < Header::LEN + MAC_LEN {
        return Err(SealError::WrongPassphraseOrCorrupt.into());
    }

    let key = derive_with_params(passphrase, header.salt(), header.params(), DERIVED_KEY_LEN)?;
    let (enc_key, auth_key) = key.split_at(SUBKEY_LEN);

    Header::authenticate(&container[..Header::LEN], auth_key)?;

    let body_end = container.len() - MAC_LEN;
    if !mac::verify(auth_key, &container[..body_end], &container[body_end..])? {
        return Err(SealError::WrongPassphraseOrCorrupt.into());
    }

    let mut plaintext = Zeroizing::new(container[Header::LEN..body_end].to_vec());
    stream::keystream_xor(enc_key, &mut plaintext)?;
    Ok(plaintext)
}
