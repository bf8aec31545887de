use std::ops::Neg;

use ecdsa::elliptic_curve::{bigint::ArrayEncoding, ops::Reduce};
use k256::U256;
use libpaillier::unknown_order::BigNumber;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::constants;
use crate::constants::{FS_2048, FS_4096, HFS_2048, POINT_COMPRESSED_WIDTH, S2_WIDTH};
use crate::error::{BytesVec, TofnFatal, TofnResult, VerifyError};
use crate::k256_serde;
use crate::octets;
use crate::paillier::{
    secp256k1_modulus,
    utils::{member_of_mod, member_of_mul_group},
    zk::ZkSetup,
    Ciphertext, EncryptionKey, Plaintext, Randomness,
};

use super::secp256k1_modulus_cubed;

#[derive(Clone, Debug)]
pub struct Statement<'a> {
    pub ciphertext: &'a Ciphertext,
    pub ek: &'a EncryptionKey,
}

#[derive(Clone, Debug)]
pub struct Witness<'a> {
    pub msg: &'a k256::Scalar,
    pub randomness: &'a Randomness,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proof {
    z: BigNumber,
    u: Ciphertext,
    w: BigNumber,
    s: Randomness,
    s1: Plaintext,
    s2: Randomness,
}

#[derive(Clone, Debug)]
pub struct StatementWc<'a> {
    pub stmt: Statement<'a>,
    pub msg_g: &'a k256::ProjectivePoint,
    pub g: &'a k256::ProjectivePoint,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProofWc {
    proof: Proof,
    u1: k256_serde::ProjectivePoint,
}

/// Field widths of [`Proof::to_bytes`], in transcript order: `Z ‖ U ‖ W ‖ S ‖
/// S1 ‖ S2` (section 6).
const PROOF_FIELD_WIDTHS: [usize; 6] = [FS_2048, FS_4096, FS_2048, FS_2048, HFS_2048, S2_WIDTH];

impl Proof {
    /// Canonical fixed-width encoding: `Z(256) ‖ U(512) ‖ W(256) ‖ S(256) ‖
    /// S1(128) ‖ S2(384)` (section 6, "RP commitment" and "RP proof"
    /// concatenated into the single non-interactive proof object).
    pub fn to_bytes(&self) -> BytesVec {
        let mut out = Vec::with_capacity(PROOF_FIELD_WIDTHS.iter().sum());
        out.extend(octets::bignum_to_fixed_be(&self.z, FS_2048));
        out.extend(octets::bignum_to_fixed_be(self.u.to_bigint(), FS_4096));
        out.extend(octets::bignum_to_fixed_be(&self.w, FS_2048));
        out.extend(octets::bignum_to_fixed_be(&self.s.0, FS_2048));
        out.extend(octets::bignum_to_fixed_be(&self.s1.0, HFS_2048));
        out.extend(octets::bignum_to_fixed_be(&self.s2.0, S2_WIDTH));
        out
    }

    /// Inverse of [`Proof::to_bytes`]. A length mismatch is a contract
    /// violation per section 7, but this parses untrusted bytes, so it
    /// reports the mismatch as [`VerifyError::Fail`] rather than panicking.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VerifyError> {
        let total: usize = PROOF_FIELD_WIDTHS.iter().sum();
        if bytes.len() != total {
            warn!("range proof: wrong octet length");
            return Err(VerifyError::Fail);
        }

        let mut offset = 0;
        let mut take = |width: usize| {
            let field = BigNumber::from_slice(&bytes[offset..offset + width]);
            offset += width;
            field
        };

        let z = take(PROOF_FIELD_WIDTHS[0]);
        let u = take(PROOF_FIELD_WIDTHS[1]);
        let w = take(PROOF_FIELD_WIDTHS[2]);
        let s = take(PROOF_FIELD_WIDTHS[3]);
        let s1 = take(PROOF_FIELD_WIDTHS[4]);
        let s2 = take(PROOF_FIELD_WIDTHS[5]);

        Ok(Proof {
            z,
            u: Ciphertext::from_bigint(u),
            w,
            s: Randomness(s),
            s1: Plaintext(s1),
            s2: Randomness(s2),
        })
    }
}

impl ProofWc {
    /// As the `ZKWC` layout (section 6): the underlying [`Proof::to_bytes`]
    /// followed by the compressed curve point `U1`.
    pub fn to_bytes(&self) -> BytesVec {
        let mut out = self.proof.to_bytes();
        out.extend(self.u1.to_bytes());
        out
    }

    /// Inverse of [`ProofWc::to_bytes`]. Returns
    /// [`VerifyError::InvalidEcPoint`] specifically when the trailing point
    /// octets do not decode to a point on the curve (section 6).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VerifyError> {
        if bytes.len() < POINT_COMPRESSED_WIDTH {
            warn!("range proof wc: wrong octet length");
            return Err(VerifyError::Fail);
        }
        let split = bytes.len() - POINT_COMPRESSED_WIDTH;
        let proof = Proof::from_bytes(&bytes[..split])?;
        let u1 = k256_serde::ProjectivePoint::from_bytes(&bytes[split..]).ok_or_else(|| {
            warn!("range proof wc: u1 is not a well-formed curve point");
            VerifyError::InvalidEcPoint
        })?;

        Ok(ProofWc { proof, u1 })
    }
}

impl ZkSetup {
    /// statement (ciphertext, ek), witness (msg, randomness) such that
    /// ciphertext = Enc(ek, msg, randomness) and -q^3 < msg < q^3.
    /// Full specification: appendix A.1 of <https://eprint.iacr.org/2019/114.pdf>.
    pub fn range_proof(&self, stmt: &Statement, wit: &Witness) -> Proof {
        self.range_proof_inner(constants::RANGE_PROOF_TAG, stmt, None, wit).0
    }

    pub fn verify_range_proof(&self, stmt: &Statement, proof: &Proof) -> Result<(), VerifyError> {
        self.verify_range_proof_inner(constants::RANGE_PROOF_TAG, stmt, proof, None)
    }

    /// statement (msg_g, g, ciphertext, ek), witness (msg, randomness) such
    /// that ciphertext = Enc(ek, msg, randomness), -q^3 < msg < q^3, and
    /// msg_g = msg * g (the additional "check"). Adapted from appendix A.1
    /// of <https://eprint.iacr.org/2019/114.pdf>; full specification:
    /// section 4.4, proof Pi_i of <https://eprint.iacr.org/2016/013.pdf>.
    pub fn range_proof_wc(&self, stmt: &StatementWc, wit: &Witness) -> TofnResult<ProofWc> {
        let (proof, u1) = self.range_proof_inner(
            constants::RANGE_PROOF_WC_TAG,
            &stmt.stmt,
            Some((stmt.msg_g, stmt.g)),
            wit,
        );

        let u1 = u1.ok_or(TofnFatal)?.into();

        Ok(ProofWc { proof, u1 })
    }

    pub fn verify_range_proof_wc(
        &self,
        stmt: &StatementWc,
        proof: &ProofWc,
    ) -> Result<(), VerifyError> {
        self.verify_range_proof_inner(
            constants::RANGE_PROOF_WC_TAG,
            &stmt.stmt,
            &proof.proof,
            Some((stmt.msg_g, stmt.g, proof.u1.as_ref())),
        )
    }

    /// Compute the challenge `e` in `Z_q` for the range proof.
    ///
    /// Transcript order follows section 4.2's `H(g ‖ Ñ ‖ h₁ ‖ h₂ ‖ q ‖ CT ‖ z
    /// ‖ u ‖ w)` with `tag` prepended for this crate's own domain separation
    /// and `N` (from which `g = N+1` and `CT`'s modulus are both derived)
    /// kept alongside it, as in the teacher's own transcript.
    fn compute_range_proof_challenge(
        &self,
        tag: u8,
        stmt: &Statement,
        msg_g_g: Option<(&k256::ProjectivePoint, &k256::ProjectivePoint)>,
        z: &BigNumber,
        u: &Ciphertext,
        u1: Option<&k256::ProjectivePoint>,
        w: &BigNumber,
    ) -> k256::Scalar {
        let paillier_g = stmt.ek.n() + BigNumber::one();

        let digest = Sha256::new()
            .chain(tag.to_be_bytes())
            .chain(paillier_g.to_bytes())
            .chain(self.n_tilde().to_bytes())
            .chain(self.h1().to_bytes())
            .chain(self.h2().to_bytes())
            .chain(secp256k1_modulus().to_bytes())
            .chain(stmt.ek.n().to_bytes())
            .chain(stmt.ciphertext.to_bigint().to_bytes())
            .chain(msg_g_g.map_or([0; 33], |(msg_g, _)| k256_serde::point_to_bytes(msg_g)))
            .chain(msg_g_g.map_or([0; 33], |(_, g)| k256_serde::point_to_bytes(g)))
            .chain(z.to_bytes())
            .chain(u.to_bigint().to_bytes())
            .chain(u1.map_or([0; 33], k256_serde::point_to_bytes))
            .chain(w.to_bytes())
            .finalize();

        k256::Scalar::reduce(U256::from_be_byte_array(digest))
    }

    #[allow(clippy::many_single_char_names)]
    fn range_proof_inner(
        &self,
        tag: u8,
        stmt: &Statement,
        msg_g_g: Option<(&k256::ProjectivePoint, &k256::ProjectivePoint)>,
        wit: &Witness,
    ) -> (Proof, Option<k256::ProjectivePoint>) {
        debug_assert!(member_of_mod(
            &Plaintext::from_scalar(wit.msg).0,
            &secp256k1_modulus()
        ));
        debug_assert!(member_of_mul_group(&wit.randomness.0, stmt.ek.n()));
        debug_assert!(member_of_mul_group(
            stmt.ciphertext.to_bigint(),
            &(stmt.ek.n() * stmt.ek.n())
        ));

        // Sample alpha from Z_q^3
        let alpha = Plaintext::generate(&secp256k1_modulus_cubed());

        let q_n_tilde = secp256k1_modulus() * self.n_tilde();
        let q3_n_tilde = secp256k1_modulus_cubed() * self.n_tilde();

        // Sample rho from Z_(q N~)
        let rho = Randomness::generate(&q_n_tilde);
        // Sample gamma from Z_(q^3 N~)
        let gamma = Randomness::generate(&q3_n_tilde);

        let msg_bigint = Plaintext::from_scalar(wit.msg);

        // z = h1^m h2^rho mod N~
        let z = self.commit(&msg_bigint, &rho);

        // Sample beta from Z*_N; u = Paillier-Enc(alpha, beta)
        let (u, beta) = stmt.ek.encrypt(&alpha);

        // w = h1^alpha h2^gamma mod N~
        let w = self.commit(&alpha, &gamma);

        // u1 = g^alpha
        let u1 = msg_g_g.map::<k256::ProjectivePoint, _>(|(_, g)| g * &alpha.to_scalar());

        let e = self.compute_range_proof_challenge(tag, stmt, msg_g_g, &z, &u, u1.as_ref(), &w);
        let e_bigint = Plaintext::from_scalar(&e).0;

        // s = r^e beta mod N
        let s = Randomness(
            wit.randomness
                .0
                .modpow(&e_bigint, stmt.ek.n())
                .modmul(&beta.0, stmt.ek.n()),
        );

        // s1 = e * m + alpha
        let s1 = Plaintext(&e_bigint * &msg_bigint.0 + &alpha.0);

        // s2 = e * rho + gamma
        let s2 = Randomness(&e_bigint * &rho.0 + &gamma.0);

        (Proof { z, u, w, s, s1, s2 }, u1)
    }

    fn verify_range_proof_inner(
        &self,
        tag: u8,
        stmt: &Statement,
        proof: &Proof,
        msg_g_g_u1: Option<(
            &k256::ProjectivePoint,
            &k256::ProjectivePoint,
            &k256::ProjectivePoint,
        )>,
    ) -> Result<(), VerifyError> {
        let nn = stmt.ek.n() * stmt.ek.n();

        if !member_of_mul_group(stmt.ciphertext.to_bigint(), &nn) {
            warn!("range proof: ciphertext not in Z*_N^2");
            return Err(VerifyError::Fail);
        }

        if !member_of_mul_group(&proof.z, self.n_tilde()) {
            warn!("range proof: z not in Z*_N~");
            return Err(VerifyError::Fail);
        }

        if !member_of_mul_group(proof.u.to_bigint(), &nn) {
            warn!("range proof: u not in Z*_N^2");
            return Err(VerifyError::Fail);
        }

        if !member_of_mul_group(&proof.w, self.n_tilde()) {
            warn!("range proof: w not in Z*_N~");
            return Err(VerifyError::Fail);
        }

        if !member_of_mul_group(&proof.s.0, stmt.ek.n()) {
            warn!("range proof: s not in Z*_N");
            return Err(VerifyError::Fail);
        }

        // The appendix says to check s1 <= q^3; it will be equal with
        // negligible probability from an honest prover, and the soundness
        // proof states s1 < q^3.
        if !member_of_mod(&proof.s1.0, &secp256k1_modulus_cubed()) {
            warn!("range proof: s1 not in Z_q^3");
            return Err(VerifyError::Fail);
        }

        // There's a 1/q probability this exceeds the bound for an honest
        // prover.
        let q3_n_tilde = secp256k1_modulus_cubed() * self.n_tilde();
        if !member_of_mod(&proof.s2.0, &q3_n_tilde) {
            warn!("range proof: s2 not in Z_(q^3 N~)");
            return Err(VerifyError::Fail);
        }

        let e = self.compute_range_proof_challenge(
            tag,
            stmt,
            msg_g_g_u1.map(|(msg_g, g, _)| (msg_g, g)),
            &proof.z,
            &proof.u,
            msg_g_g_u1.map(|(_, _, u1)| u1),
            &proof.w,
        );

        let e_bigint = Plaintext::from_scalar(&e).0;
        let e_neg_bigint = (&e_bigint).neg();
        let e_neg = e.negate();

        if let Some((msg_g, g, u1)) = msg_g_g_u1 {
            let s1 = proof.s1.to_scalar();
            let s1_g = g * &s1;

            // u1 ?= g^s1 y^(-e)
            let u1_check = msg_g * &e_neg + s1_g;
            if u1_check != *u1 {
                warn!("range proof: 'wc' check failed, invalid u1");
                return Err(VerifyError::Fail);
            }
        }

        // u ?= Paillier-Enc(s1, s) * c^(-e) mod N^2
        let u_check = stmt
            .ek
            .encrypt_with_randomness(&proof.s1, &proof.s)
            .to_bigint()
            .modmul(&stmt.ciphertext.to_bigint().modpow(&e_neg_bigint, &nn), &nn);
        if &u_check != proof.u.to_bigint() {
            warn!("range proof: u check failed");
            return Err(VerifyError::Fail);
        }

        // w ?= h1^s1 h2^s2 z^(-e) mod N~
        let w_check = self
            .commit(&proof.s1, &proof.s2)
            .modmul(&proof.z.modpow(&e_neg_bigint, self.n_tilde()), self.n_tilde());
        if w_check != proof.w {
            warn!("range proof: w check failed");
            return Err(VerifyError::Fail);
        }

        Ok(())
    }
}

// In contrast with the rest of the malicious modules in this crate, the
// malicious helpers for mta/range are included in non-malicious test builds
// to avoid code duplication for tamper tests.
#[cfg(test)]
pub mod malicious {
    use crate::k256_serde::ProjectivePoint;

    use super::*;

    pub fn corrupt_proof(proof: &Proof) -> Proof {
        let proof = proof.clone();
        Proof {
            u: Ciphertext::from_bigint(proof.u.to_bigint() + BigNumber::one()),
            ..proof
        }
    }

    pub fn corrupt_proof_wc(proof_wc: &ProofWc) -> ProofWc {
        let proof_wc = proof_wc.clone();
        ProofWc {
            u1: ProjectivePoint::from(k256::ProjectivePoint::GENERATOR + proof_wc.u1.as_ref()),
            ..proof_wc
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::paillier::keygen_unsafe;

    use super::{
        malicious::{corrupt_proof, corrupt_proof_wc},
        Statement, StatementWc, Witness, ZkSetup, POINT_COMPRESSED_WIDTH,
    };
    use crate::error::VerifyError;
    use ecdsa::elliptic_curve::Field;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn basic_correctness() {
        let (ek, _dk) = &keygen_unsafe(&mut rand::thread_rng()).unwrap();
        let msg = &k256::Scalar::random(rand::thread_rng());
        let g = &k256::ProjectivePoint::GENERATOR;
        let msg_g = &(g * msg);
        let (ciphertext, randomness) = &ek.encrypt(&msg.into());

        let stmt_wc = &StatementWc {
            stmt: Statement { ciphertext, ek },
            msg_g,
            g,
        };
        let stmt = &stmt_wc.stmt;
        let wit = &Witness { msg, randomness };
        let (zkp, _) = ZkSetup::new_unsafe(&mut rand::thread_rng(), &0_u32.to_be_bytes()).unwrap();

        let proof = zkp.range_proof(stmt, wit);
        assert!(zkp.verify_range_proof(stmt, &proof).is_ok());

        let proof_wc = zkp.range_proof_wc(stmt_wc, wit).unwrap();
        assert!(zkp.verify_range_proof_wc(stmt_wc, &proof_wc).is_ok());

        let bad_proof = corrupt_proof(&proof);
        assert!(zkp.verify_range_proof(stmt, &bad_proof).is_err());

        let bad_proof_wc = corrupt_proof_wc(&proof_wc);
        assert!(zkp.verify_range_proof_wc(stmt_wc, &bad_proof_wc).is_err());

        let bad_wit = &Witness {
            msg: &(*wit.msg + k256::Scalar::ONE),
            ..*wit
        };
        let bad_proof = zkp.range_proof(stmt, bad_wit);
        assert!(zkp.verify_range_proof(stmt, &bad_proof).is_err());

        let bad_wit_proof_wc = zkp.range_proof_wc(stmt_wc, bad_wit).unwrap();
        assert!(zkp.verify_range_proof_wc(stmt_wc, &bad_wit_proof_wc).is_err());
    }

    #[test]
    fn octet_round_trip_and_tamper() {
        let (ek, _dk) = &keygen_unsafe(&mut rand::thread_rng()).unwrap();
        let msg = &k256::Scalar::random(rand::thread_rng());
        let g = &k256::ProjectivePoint::GENERATOR;
        let msg_g = &(g * msg);
        let (ciphertext, randomness) = &ek.encrypt(&msg.into());

        let stmt_wc = &StatementWc {
            stmt: Statement { ciphertext, ek },
            msg_g,
            g,
        };
        let stmt = &stmt_wc.stmt;
        let wit = &Witness { msg, randomness };
        let (zkp, _) = ZkSetup::new_unsafe(&mut rand::thread_rng(), &0_u32.to_be_bytes()).unwrap();

        let proof = zkp.range_proof(stmt, wit);
        let bytes = proof.to_bytes();
        let decoded = super::Proof::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.to_bytes(), bytes);
        assert!(zkp.verify_range_proof(stmt, &decoded).is_ok());

        let mut tampered = bytes.clone();
        let last = tampered.len() - 1;
        tampered[last] ^= 0x01;
        let tampered_proof = super::Proof::from_bytes(&tampered).unwrap();
        assert!(zkp.verify_range_proof(stmt, &tampered_proof).is_err());

        assert!(super::Proof::from_bytes(&bytes[..bytes.len() - 1]).is_err());

        let proof_wc = zkp.range_proof_wc(stmt_wc, wit).unwrap();
        let wc_bytes = proof_wc.to_bytes();
        let decoded_wc = super::ProofWc::from_bytes(&wc_bytes).unwrap();
        assert_eq!(decoded_wc.to_bytes(), wc_bytes);
        assert!(zkp.verify_range_proof_wc(stmt_wc, &decoded_wc).is_ok());

        let mut off_curve = wc_bytes.clone();
        // Flip the parity tag byte of the compressed point to an invalid
        // SEC1 prefix (neither 0x02 nor 0x03).
        let point_start = off_curve.len() - POINT_COMPRESSED_WIDTH;
        off_curve[point_start] = 0xff;
        assert_eq!(
            super::ProofWc::from_bytes(&off_curve).unwrap_err(),
            VerifyError::InvalidEcPoint
        );
    }
}
