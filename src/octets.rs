//! Canonical fixed-width big-endian octet encodings.
//!
//! Every proof and commitment in this crate serializes its big-integer
//! fields to a fixed width rather than a variable-length encoding, so that
//! two implementations hashing the same transcript agree byte-for-byte.

use libpaillier::unknown_order::BigNumber;

/// Left-pad (or truncate) `v` to exactly `width` bytes, big-endian.
///
/// Truncation only occurs when `v` already encodes fewer significant bytes
/// than its two's-complement-free `BigNumber::to_bytes()` representation can
/// produce; callers choose `width` large enough that this never drops
/// significant bytes for well-formed inputs.
pub fn to_fixed_be(v: &[u8], width: usize) -> Vec<u8> {
    if v.len() == width {
        return v.to_vec();
    }
    if v.len() > width {
        return v[v.len() - width..].to_vec();
    }
    let mut padded = vec![0u8; width];
    padded[(width - v.len())..].copy_from_slice(v);
    padded
}

/// Encode a non-negative [`BigNumber`] as `width` big-endian bytes.
pub fn bignum_to_fixed_be(n: &BigNumber, width: usize) -> Vec<u8> {
    to_fixed_be(&n.to_bytes(), width)
}

/// Left-pad `v` to exactly 32 bytes, big-endian. Used for curve scalars.
pub fn pad32(v: Vec<u8>) -> [u8; 32] {
    let padded = to_fixed_be(&v, 32);
    let mut out = [0u8; 32];
    out.copy_from_slice(&padded);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_input() {
        let padded = to_fixed_be(&[1, 2, 3], 8);
        assert_eq!(padded, vec![0, 0, 0, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn leaves_exact_width_input_unchanged() {
        let v = vec![9; 16];
        assert_eq!(to_fixed_be(&v, 16), v);
    }

    #[test]
    fn truncates_overlong_input_to_low_order_bytes() {
        let v = vec![0xff; 40];
        let truncated = to_fixed_be(&v, 32);
        assert_eq!(truncated.len(), 32);
    }
}
