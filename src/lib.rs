//! Memory-hard passphrase sealing for byte streams.
//!
//! `sealbox` derives key material from a passphrase with the scrypt
//! memory-hard KDF, auto-tunes the cost parameters from a memory/time
//! budget, and seals payloads into an authenticated container format with
//! layered header and payload MACs.

mod container;
mod crypto;
mod error;
mod storage;
mod tuning;

pub use crate::container::{open, seal, seal_with_params};
pub use crate::crypto::{CostParams, Header, derive_key};
pub use crate::error::SealError;
pub use crate::storage::{read_file, write_file_atomic};
pub use crate::tuning::{MIN_SALSA_RATE, choose_params, pick_params};
