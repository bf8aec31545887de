//! A fixed-size wrapper around a hash digest, independent of the hash
//! function that produced it. This is the type signed by ECDSA and hashed
//! into the Fiat-Shamir transcripts.

use sha2::{Digest, Sha256};
use std::convert::TryFrom;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageDigest(pub(crate) [u8; 32]);

impl MessageDigest {
    /// `H_sha(msg)`: the SHA-256 digest of an arbitrary-length message, as
    /// consumed by the single-shot `ECDSA_SIGN` entry point.
    pub fn hash(msg: &[u8]) -> Self {
        Self(Sha256::digest(msg).into())
    }
}

impl TryFrom<&[u8]> for MessageDigest {
    type Error = std::array::TryFromSliceError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(bytes.try_into()?))
    }
}

impl AsRef<[u8]> for MessageDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
