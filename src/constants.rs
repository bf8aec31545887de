// Domain separation constants for Fiat-Shamir hash function calls.
pub const MTA_PROOF_TAG: u8 = 0x01;
pub const MTA_PROOF_WC_TAG: u8 = 0x02;
pub const RANGE_PROOF_TAG: u8 = 0x03;
pub const RANGE_PROOF_WC_TAG: u8 = 0x04;
pub const COMPOSITE_DLOG_PROOF_TAG: u8 = 0x0A;
pub const PAILLIER_KEY_PROOF_TAG: u8 = 0x0B;

/// The max size of each prime is 1024 bits.
pub const MODULUS_MAX_SIZE: usize = 2048;

/// The min size of each prime is 1023 bits.
/// So, the product can be 2045 bits at a minimum.
pub const MODULUS_MIN_SIZE: usize = 2045;

// Domain separation for the two mutual composite dlog proofs bundled in a
// `ZkSetupProof`.
pub const COMPOSITE_DLOG_PROOF1: u8 = 0x00;
pub const COMPOSITE_DLOG_PROOF2: u8 = 0x01;

// Domain separation for ECDSA RNG seeding (section "AMBIENT: Configuration").
pub const ECDSA_KEYGEN_TAG: u8 = 0x00;
pub const ECDSA_SIGN_TAG: u8 = 0x01;
pub const MTA_RANDOMIZER_TAG: u8 = 0x02;

// Canonical octet widths (section 6).
pub const FS_2048: usize = 256;
pub const FS_4096: usize = 512;
pub const HFS_2048: usize = 128;
pub const S2_WIDTH: usize = FS_2048 + HFS_2048;
pub const SCALAR_WIDTH: usize = 32;

/// Width of the receiver ZK proof's `t1 = e*y + gamma` response (section
/// 4.3). `y` and `gamma` are each sampled up to `N` (`FS_2048` bytes) and `e`
/// is a `q`-sized (`SCALAR_WIDTH`-byte) challenge, so `t1` needs the same
/// kind of headroom as `s2`/`t2` above `FS_2048` alone.
pub const T1_WIDTH: usize = FS_2048 + SCALAR_WIDTH;
pub const POINT_COMPRESSED_WIDTH: usize = 33;
