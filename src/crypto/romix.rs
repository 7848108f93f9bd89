//! The memory-hard mixing routine at the heart of the KDF.
//!
//! A scratch buffer of `N` slots (each `128 * r` bytes) is filled
//! sequentially, then read back `N` times at data-dependent indices. An
//! attacker must either hold the whole buffer or recompute it; that
//! time-memory tradeoff is the hardness this module provides. The
//! data-dependent reads in the second phase are a designed-in property of
//! the algorithm and must not be replaced with constant-time indexing.

use anyhow::Result;
use zeroize::Zeroizing;

use super::BLOCK_LEN;
use super::salsa::block_mix;
use crate::error::SealError;

/// Reads the first 32-bit little-endian word of the last block.
fn integerize(b: &[u8], r: u32) -> u64 {
    let off = (2 * r as usize - 1) * BLOCK_LEN;
    u64::from(u32::from_le_bytes([
        b[off],
        b[off + 1],
        b[off + 2],
        b[off + 3],
    ]))
}

/// Mixes a `128 * r` byte seed in place through an `N`-slot scratch buffer.
///
/// The scratch buffer is owned by this call alone and zeroed when the call
/// returns, on success and on error alike. Fails with
/// [`SealError::ResourceExceeded`] if the buffer cannot be allocated.
pub fn memory_hard_mix(b: &mut [u8], n: u64, r: u32) -> Result<()> {
    let lane = 128 * r as usize;
    debug_assert_eq!(b.len(), lane);

    if n > usize::MAX as u64 {
        return Err(SealError::ResourceExceeded.into());
    }
    let len = (n as usize)
        .checked_mul(lane)
        .ok_or(SealError::ResourceExceeded)?;

    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| SealError::ResourceExceeded)?;
    v.resize(len, 0u8);
    let mut v = Zeroizing::new(v);
    let mut y = Zeroizing::new(vec![0u8; lane]);

    // fill phase: V[i] = B, B = BlockMix(B); sequential, no data-dependent
    // access
    for slot in v.chunks_exact_mut(lane) {
        slot.copy_from_slice(b);
        block_mix(slot, b, r as usize);
    }

    // mix phase: j = Integerify(B) mod N, B = BlockMix(B ^ V[j])
    for _ in 0..n {
        let j = (integerize(b, r) % n) as usize;
        for (x, w) in b.iter_mut().zip(&v[j * lane..(j + 1) * lane]) {
            *x ^= w;
        }
        y.copy_from_slice(b);
        block_mix(&y, b, r as usize);
    }

    Ok(())
}
