use std::fmt;

/// Failure taxonomy for key derivation and container operations.
///
/// `WrongPassphraseOrCorrupt` deliberately does not distinguish a bad
/// passphrase from a tampered file; either HMAC mismatch maps here so the
/// error is not an oracle for which check failed.
#[derive(Debug, PartialEq, Eq)]
pub enum SealError {
    InvalidParameters(String),
    ResourceExceeded,
    InfeasibleBudget,
    UnsupportedFormat,
    CorruptHeader,
    WrongPassphraseOrCorrupt,
}

impl fmt::Display for SealError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SealError::InvalidParameters(msg) => write!(f, "invalid cost parameters: {msg}"),
            SealError::ResourceExceeded => {
                write!(f, "requested memory exceeds what this platform can address")
            }
            SealError::InfeasibleBudget => {
                write!(f, "memory budget is below the minimal cost parameters")
            }
            SealError::UnsupportedFormat => write!(f, "not a sealbox container"),
            SealError::CorruptHeader => write!(f, "container header is corrupted"),
            SealError::WrongPassphraseOrCorrupt => {
                write!(f, "wrong passphrase or corrupted container")
            }
        }
    }
}

impl std::error::Error for SealError {}
