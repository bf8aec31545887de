//! Single-shot ECDSA key generation, signing and verification (C8), plus the
//! threshold per-party `s`-share helpers that consume the additive shares
//! produced by two MtA exchanges (`k·gamma` and `k·sk`).

use ecdsa::{
    elliptic_curve::{bigint::ArrayEncoding, ops::Reduce, sec1::ToEncodedPoint, Field},
    hazmat::{SignPrimitive, VerifyPrimitive},
};
use k256::U256;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    constants::{ECDSA_KEYGEN_TAG, ECDSA_SIGN_TAG},
    error::{BytesVec, TofnFatal, TofnResult},
    k256_serde,
    message_digest::MessageDigest,
    rng,
};

/// Domain separation for RNG seeding: distinguishes this module's calls to
/// `rng::rng_seed_*` from the MtA randomizer (`constants::MTA_RANDOMIZER_TAG`).
const PROTOCOL_TAG: u8 = 0x00;

/// Resample attempts for the ephemeral nonce before giving up. `r = 0` or
/// `s = 0` each occur with probability ~2^-256 for an honest sample, so this
/// bound is never exercised in practice; it exists only so the reject-and-
/// resample policy terminates instead of looping forever.
const MAX_SIGN_ATTEMPTS: u8 = 4;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct KeyPair {
    signing_key: k256_serde::SecretScalar,
    verifying_key: k256_serde::ProjectivePoint,
}

impl KeyPair {
    pub fn signing_key(&self) -> &k256_serde::SecretScalar {
        &self.signing_key
    }

    pub fn verifying_key(&self) -> &k256_serde::ProjectivePoint {
        &self.verifying_key
    }

    /// SEC1-encoded compressed curve point.
    pub fn encoded_verifying_key(&self) -> [u8; 33] {
        k256_serde::point_to_bytes(self.verifying_key.as_ref())
    }
}

pub fn keygen(
    secret_recovery_key: &rng::SecretRecoveryKey,
    session_nonce: &[u8],
) -> TofnResult<KeyPair> {
    let rng = rng::rng_seed_signing_key(
        PROTOCOL_TAG,
        ECDSA_KEYGEN_TAG,
        secret_recovery_key,
        session_nonce,
    )?;

    let signing_key = k256_serde::SecretScalar::random(rng);
    let verifying_key = k256_serde::ProjectivePoint::from(&signing_key);

    Ok(KeyPair {
        signing_key,
        verifying_key,
    })
}

/// `ECDSA_SIGN`: hash `msg`, then sign the digest. Returns an ASN.1
/// DER-encoded signature; DER encodings have variable byte length so we
/// return a [`BytesVec`] instead of a fixed-size array.
pub fn sign(signing_key: &k256_serde::SecretScalar, msg: &[u8]) -> TofnResult<BytesVec> {
    sign_prehashed(signing_key, &MessageDigest::hash(msg))
}

/// As [`sign`], but the caller has already computed `z = H_sha(M)`.
pub fn sign_prehashed(
    signing_key: &k256_serde::SecretScalar,
    message_digest: &MessageDigest,
) -> TofnResult<BytesVec> {
    let signing_key_scalar = signing_key.as_ref();
    let digest_scalar = k256::Scalar::from(message_digest);
    let digest_bytes = k256::FieldBytes::from(message_digest);

    for attempt in 0..MAX_SIGN_ATTEMPTS {
        let rng = rng::rng_seed_ecdsa_ephemeral_scalar(
            PROTOCOL_TAG,
            ECDSA_SIGN_TAG.wrapping_add(attempt),
            signing_key_scalar,
            &digest_scalar,
        )?;
        let ephemeral_scalar = k256::Scalar::random(rng);

        // `try_sign_prehashed` itself rejects `r = 0` or `s = 0` (returning
        // an error) rather than silently emitting an invalid signature; we
        // resample the ephemeral scalar and retry on that outcome.
        if let Ok((signature, _recid)) =
            signing_key_scalar.try_sign_prehashed(ephemeral_scalar, &digest_bytes)
        {
            return Ok(k256_serde::Signature::from(signature).to_bytes());
        }
    }

    error!(
        "failed to produce a valid ECDSA signature in {} attempts",
        MAX_SIGN_ATTEMPTS
    );
    Err(TofnFatal)
}

/// `ECDSA_VERIFY`: hash `msg`, then verify `signature` (ASN.1 DER-encoded)
/// against it.
pub fn verify(verifying_key: &k256_serde::ProjectivePoint, msg: &[u8], signature: &[u8]) -> bool {
    verify_prehashed(verifying_key, &MessageDigest::hash(msg), signature)
}

/// As [`verify`], but against an already-computed digest.
pub fn verify_prehashed(
    verifying_key: &k256_serde::ProjectivePoint,
    message_digest: &MessageDigest,
    signature: &[u8],
) -> bool {
    let signature = match k256_serde::Signature::from_bytes(signature) {
        Some(signature) => signature,
        None => return false,
    };
    let digest_bytes = k256::FieldBytes::from(message_digest);

    verifying_key
        .as_ref()
        .to_affine()
        .verify_prehashed(&digest_bytes, signature.as_ref())
        .is_ok()
}

/// Reduce a jointly-reconstructed `R = k^{-1}·G` to `r = R.x mod q`.
/// Reference: <https://docs.rs/k256/latest/src/k256/ecdsa/sign.rs.html>.
pub fn ecdsa_r(point_r: &k256::ProjectivePoint) -> TofnResult<k256::Scalar> {
    let x = point_r
        .to_affine()
        .to_encoded_point(true)
        .x()
        .copied()
        .ok_or_else(|| {
            error!("R has no affine x-coordinate (identity point)");
            TofnFatal
        })?;

    Ok(k256::Scalar::reduce(U256::from_be_byte_array(x)))
}

/// The local per-party contribution to the joint `s` value:
/// `s_i = z·k_i + r·sigma_i`, where `k_i` and `sigma_i` are this party's
/// additive shares of `k` and `k·sk` (the `sum_mta` output of the two MtA
/// exchanges feeding this round).
pub fn signature_share(
    message_digest: &MessageDigest,
    r: &k256::Scalar,
    k_i: &k256::Scalar,
    sigma_i: &k256::Scalar,
) -> k256::Scalar {
    let z = k256::Scalar::from(message_digest);
    z * k_i + r * sigma_i
}

/// Sum per-party `s`-shares into the final signature, normalize `s` to its
/// low-s form, and DER-encode it.
pub fn sum_signature_shares(
    r: k256::Scalar,
    shares: impl IntoIterator<Item = k256::Scalar>,
) -> TofnResult<BytesVec> {
    let s = shares
        .into_iter()
        .fold(k256::Scalar::ZERO, |acc, s_i| acc + s_i);

    let mut sig = k256::ecdsa::Signature::from_scalars(r, s).map_err(|_| {
        error!("scalars to signature conversion failed");
        TofnFatal
    })?;

    sig.normalize_s().map_err(|_| {
        error!("signature normalization failed");
        TofnFatal
    })?;

    Ok(k256_serde::Signature::from(sig).to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_verify_round_trip() {
        let secret_recovery_key = rng::dummy_secret_recovery_key(1);
        let key_pair = keygen(&secret_recovery_key, b"sign_verify_round_trip").unwrap();

        let msg = b"attack at dawn";
        let signature = sign(key_pair.signing_key(), msg).unwrap();

        assert!(verify(key_pair.verifying_key(), msg, &signature));
        assert!(!verify(key_pair.verifying_key(), b"attack at dusk", &signature));
    }

    #[test]
    fn sign_is_deterministic_given_equal_inputs() {
        let secret_recovery_key = rng::dummy_secret_recovery_key(2);
        let key_pair = keygen(&secret_recovery_key, b"sign_is_deterministic").unwrap();

        let msg = b"the ships sail at midnight";
        let sig1 = sign(key_pair.signing_key(), msg).unwrap();
        let sig2 = sign(key_pair.signing_key(), msg).unwrap();

        assert_eq!(sig1, sig2);
    }

    #[test]
    fn threshold_share_assembly_matches_single_shot() {
        use ecdsa::elliptic_curve::Field;

        let sk = k256::Scalar::random(rand::thread_rng());
        let verifying_key = k256::ProjectivePoint::generator() * sk;

        let msg_digest = MessageDigest::hash(b"split the signing key in two");
        let z = k256::Scalar::from(&msg_digest);

        // k = k_1 + k_2, sk = sk_1 + sk_2 (an additive sharing of a 2-party
        // key, standing in for the output of two MtA exchanges).
        let k_1 = k256::Scalar::random(rand::thread_rng());
        let k_2 = k256::Scalar::random(rand::thread_rng());
        let k = k_1 + k_2;

        let sk_1 = k256::Scalar::random(rand::thread_rng());
        let sk_2 = sk - sk_1;

        let r_point = k256::ProjectivePoint::generator() * k.invert().unwrap();
        let r = ecdsa_r(&r_point).unwrap();

        // k_i * sk additive shares, i.e. sigma_i, summing to k * sk.
        let sigma_1 = k_1 * sk_1 + k_1 * sk_2;
        let sigma_2 = k_2 * sk_1 + k_2 * sk_2;

        let s_1 = signature_share(&msg_digest, &r, &k_1, &sigma_1);
        let s_2 = signature_share(&msg_digest, &r, &k_2, &sigma_2);

        let expected_s = k * (z + r * sk);

        let sig_bytes = sum_signature_shares(r, [s_1, s_2]).unwrap();
        let sig = k256_serde::Signature::from_bytes(&sig_bytes).unwrap();

        let mut expected_sig = k256::ecdsa::Signature::from_scalars(r, expected_s).unwrap();
        expected_sig.normalize_s().unwrap();

        assert_eq!(sig.as_ref(), &expected_sig);

        let verifying_key = k256_serde::ProjectivePoint::from(verifying_key);
        assert!(verify_prehashed(&verifying_key, &msg_digest, &sig_bytes));
    }
}
