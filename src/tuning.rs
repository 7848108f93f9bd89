//! Cost parameter selection from a memory and time budget.
//!
//! A short calibration run measures how many salsa block transforms this
//! machine sustains per second; [`pick_params`] then turns (memory budget,
//! time budget, measured rate) into concrete `N, r, p`. The split keeps
//! parameter selection deterministic for a fixed rate sample, while the
//! calibration itself is timing-dependent and varies across machines.
//!
//! Preference order: maximize `N` (memory hardness) first, then spend any
//! remaining compute budget on extra lanes `p`. `p` adds time but not
//! peak memory.

use std::time::{Duration, Instant};

use anyhow::Result;

use crate::crypto::kdf::{CostParams, derive_with_params};
use crate::error::SealError;

/// Floor applied to calibration samples so one bad timing measurement
/// cannot collapse the parameters.
pub const MIN_SALSA_RATE: f64 = 65_536.0;

/// Minimum number of salsa operations to budget regardless of the time
/// limit, matching the smallest interactive-use cost worth running.
const MIN_OPS: f64 = 32_768.0;

/// Block size factor used when the memory budget allows it.
const PREFERRED_R: u32 = 8;

/// One calibration derive: N = 128, r = 1, p = 1 costs 512 salsa calls.
const CALIBRATION_OPS: u64 = 512;

const CALIBRATION_WINDOW: Duration = Duration::from_millis(50);

/// Measures achievable salsa block transforms per second.
pub fn calibrate() -> Result<f64> {
    let params = CostParams::new(128, 1, 1)?;
    let start = Instant::now();
    let mut ops = 0u64;

    loop {
        derive_with_params(b"", b"", &params, 64)?;
        ops += CALIBRATION_OPS;
        if start.elapsed() >= CALIBRATION_WINDOW {
            break;
        }
    }

    Ok(ops as f64 / start.elapsed().as_secs_f64())
}

/// Calibrates, then picks parameters for the given budget.
pub fn choose_params(max_mem: usize, max_time: f64, min_salsa_rate: f64) -> Result<CostParams> {
    let rate = calibrate()?.max(min_salsa_rate);
    pick_params(max_mem, max_time, rate)
}

/// Deterministically picks `N, r, p` from a memory budget (bytes), a time
/// budget (seconds) and a measured salsa rate (ops per second).
///
/// The returned parameters never imply more than `max_mem` bytes of
/// scratch memory. Fails with [`SealError::InfeasibleBudget`] when even
/// `N = 2, r = 1, p = 1` (256 bytes) does not fit.
pub fn pick_params(max_mem: usize, max_time: f64, salsa_rate: f64) -> Result<CostParams> {
    if max_mem < 256 {
        return Err(SealError::InfeasibleBudget.into());
    }

    // largest r up to the preferred value whose minimal buffer still fits
    let r = (max_mem / 256).min(PREFERRED_R as usize).max(1) as u32;

    let ops_budget = (salsa_rate * max_time).max(MIN_OPS) as u64;
    // filling and mixing a scratch buffer costs one salsa call per 32
    // bytes, so this is the op count at which memory becomes the limit
    let mem_ops = (max_mem / 32) as u64;

    if ops_budget < mem_ops {
        // CPU-bound: a single lane, N sized from the op budget
        let max_n = ops_budget / (4 * u64::from(r));
        let ceiling = (max_mem / (128 * r as usize)) as u64;
        let n = largest_pow2_at_most(max_n.min(ceiling)).max(2);
        CostParams::new(n, r, 1)
    } else {
        // memory-bound: max out N, spend leftover ops on extra lanes
        let max_n = (max_mem / (128 * r as usize)) as u64;
        let n = largest_pow2_at_most(max_n).max(2);
        let p = ((ops_budget / 4) / (n * u64::from(r)))
            .max(1)
            .min(((1u64 << 30) - 1) / u64::from(r));
        CostParams::new(n, r, p as u32)
    }
}

fn largest_pow2_at_most(x: u64) -> u64 {
    if x < 2 {
        2
    } else {
        1u64 << (63 - x.leading_zeros())
    }
}
