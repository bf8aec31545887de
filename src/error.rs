//! Two distinct error families: contract violations (programmer error, never
//! expected on a successful path) and proof-verification outcomes (expected,
//! reported with the numeric codes from the external interface).

/// An internal contract violation: malformed input, an RNG that failed to
/// seed, or any other condition that should never occur given the caller's
/// obligations. Never returned from a successful verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TofnFatal;

pub type TofnResult<T> = Result<T, TofnFatal>;

/// A byte buffer returned from a variable-length encoding (e.g. DER).
pub type BytesVec = Vec<u8>;

/// The outcome of a failed proof or commitment verification.
///
/// `OK` (code `0`) is represented by `Ok(())` and never materialized as a
/// value of this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// A verification equation failed, or a response value exceeded its
    /// claimed range (e.g. `s1 > q^3`).
    #[error("proof verification failed")]
    Fail,
    /// Octets that were expected to decode to a well-formed curve point did
    /// not (ZKWC deserialization only).
    #[error("malformed curve point")]
    InvalidEcPoint,
}

impl VerifyError {
    pub const OK: u8 = 0;
    pub const FAIL: u8 = 61;
    pub const INVALID_ECP: u8 = 62;

    /// The numeric error code from the external interface (section 6).
    pub const fn code(self) -> u8 {
        match self {
            VerifyError::Fail => Self::FAIL,
            VerifyError::InvalidEcPoint => Self::INVALID_ECP,
        }
    }
}
