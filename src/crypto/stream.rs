//! Counter-mode keystream built from the keyed-hash primitive.
//!
//! Keystream block `i` is HMAC-SHA256(key, `i` as big-endian u64), XORed
//! into the payload 32 bytes at a time. Using the MAC as the stream core
//! keeps the container format free of a separate cipher dependency;
//! encryption and decryption are the same operation.

use anyhow::{Result, anyhow};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const KEYSTREAM_BLOCK: usize = 32;

/// XORs the keystream for `key` into `data` in place.
pub fn keystream_xor(key: &[u8], data: &mut [u8]) -> Result<()> {
    let mac0 = HmacSha256::new_from_slice(key).map_err(|_| anyhow!("invalid stream key"))?;

    for (counter, chunk) in data.chunks_mut(KEYSTREAM_BLOCK).enumerate() {
        let mut mac = mac0.clone();
        mac.update(&(counter as u64).to_be_bytes());
        let block = mac.finalize().into_bytes();
        for (b, k) in chunk.iter_mut().zip(block.iter()) {
            *b ^= k;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_twice_is_identity() {
        let mut data = b"the quick brown fox jumps over the lazy dog".to_vec();
        let original = data.clone();

        keystream_xor(b"key", &mut data).unwrap();
        assert_ne!(data, original);
        keystream_xor(b"key", &mut data).unwrap();
        assert_eq!(data, original);
    }

    #[test]
    fn different_keys_give_different_ciphertext() {
        let mut a = vec![0u8; 64];
        let mut b = vec![0u8; 64];
        keystream_xor(b"key-a", &mut a).unwrap();
        keystream_xor(b"key-b", &mut b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn counter_blocks_differ() {
        // a zeroed payload exposes the raw keystream
        let mut data = vec![0u8; 2 * KEYSTREAM_BLOCK];
        keystream_xor(b"key", &mut data).unwrap();
        assert_ne!(data[..KEYSTREAM_BLOCK], data[KEYSTREAM_BLOCK..]);
    }

    #[test]
    fn partial_trailing_block() {
        let mut data = vec![7u8; KEYSTREAM_BLOCK + 5];
        let original = data.clone();
        keystream_xor(b"key", &mut data).unwrap();
        keystream_xor(b"key", &mut data).unwrap();
        assert_eq!(data, original);
    }
}
