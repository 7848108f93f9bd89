//! scrypt key derivation: cost parameters and the two-pass derive.

use anyhow::Result;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::romix::memory_hard_mix;
use crate::error::SealError;

/// scrypt cost parameters.
///
/// `N` controls the scratch buffer size (and with it memory hardness),
/// `r` the per-block work, `p` the number of independent lanes. The
/// scratch buffer for one lane is `128 * r * N` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostParams {
    log2_n: u8,
    r: u32,
    p: u32,
}

impl CostParams {
    pub fn new(n: u64, r: u32, p: u32) -> Result<Self> {
        if n < 2 || !n.is_power_of_two() {
            return Err(
                SealError::InvalidParameters("N must be a power of two >= 2".into()).into(),
            );
        }
        Self::from_parts(n.trailing_zeros() as u8, r, p)
    }

    /// Builds parameters from the header encoding (`log2(N)`, `r`, `p`).
    pub fn from_parts(log2_n: u8, r: u32, p: u32) -> Result<Self> {
        let params = Self { log2_n, r, p };
        params.validate()?;
        Ok(params)
    }

    pub fn log2_n(&self) -> u8 {
        self.log2_n
    }

    pub fn n(&self) -> u64 {
        1u64 << self.log2_n
    }

    pub fn r(&self) -> u32 {
        self.r
    }

    pub fn p(&self) -> u32 {
        self.p
    }

    /// Peak scratch memory for one derivation, in bytes.
    pub fn scratch_bytes(&self) -> u128 {
        128 * u128::from(self.r) * u128::from(self.n())
    }

    pub fn validate(&self) -> Result<()> {
        if self.log2_n == 0 || self.log2_n > 63 {
            return Err(
                SealError::InvalidParameters("N must be a power of two >= 2".into()).into(),
            );
        }
        if self.r == 0 {
            return Err(SealError::InvalidParameters("r must be >= 1".into()).into());
        }
        if self.p == 0 {
            return Err(SealError::InvalidParameters("p must be >= 1".into()).into());
        }
        if u64::from(self.r) * u64::from(self.p) >= 1 << 30 {
            return Err(SealError::InvalidParameters("r * p must be < 2^30".into()).into());
        }
        // both the scratch buffer and the p-lane seed must be addressable
        if self.scratch_bytes() > usize::MAX as u128 {
            return Err(SealError::ResourceExceeded.into());
        }
        if 128 * u128::from(self.r) * u128::from(self.p) > usize::MAX as u128 {
            return Err(SealError::ResourceExceeded.into());
        }
        Ok(())
    }
}

/// Derives `out_len` bytes of key material from a passphrase and salt.
///
/// Fails with [`SealError::InvalidParameters`] if `n` is not a power of
/// two >= 2, `r` or `p` is zero, or `out_len` is zero, and with
/// [`SealError::ResourceExceeded`] if the implied buffers exceed
/// addressable memory.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8],
    n: u64,
    r: u32,
    p: u32,
    out_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    let params = CostParams::new(n, r, p)?;
    derive_with_params(passphrase, salt, &params, out_len)
}

/// The two-pass scrypt construction: a one-round keyed-hash stretch seeds
/// `p` lanes, each lane runs the memory-hard mix over its own scratch
/// buffer, and a second one-round stretch over the mixed lanes extracts
/// the output. The cheap outer passes make the output uniform for any
/// `N, r, p`; the hardness lives entirely in the middle.
pub(crate) fn derive_with_params(
    passphrase: &[u8],
    salt: &[u8],
    params: &CostParams,
    out_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    params.validate()?;
    if out_len == 0 {
        return Err(SealError::InvalidParameters("output length must be positive".into()).into());
    }

    let lane = 128 * params.r() as usize;
    let seed_len = lane
        .checked_mul(params.p() as usize)
        .ok_or(SealError::ResourceExceeded)?;

    let mut seed = Vec::new();
    seed.try_reserve_exact(seed_len)
        .map_err(|_| SealError::ResourceExceeded)?;
    seed.resize(seed_len, 0u8);
    let mut seed = Zeroizing::new(seed);

    pbkdf2_hmac::<Sha256>(passphrase, salt, 1, &mut seed);

    // lanes are independent; each mix call owns (and zeroes) its own
    // scratch buffer, concatenation order is lane index order
    for lane_seed in seed.chunks_exact_mut(lane) {
        memory_hard_mix(lane_seed, params.n(), params.r())?;
    }

    let mut out = Zeroizing::new(vec![0u8; out_len]);
    pbkdf2_hmac::<Sha256>(passphrase, &seed, 1, &mut out);
    Ok(out)
}
