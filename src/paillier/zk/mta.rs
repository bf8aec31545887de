use ecdsa::elliptic_curve::{bigint::ArrayEncoding, ops::Reduce};
use k256::U256;
use libpaillier::unknown_order::BigNumber;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::constants;
use crate::constants::{FS_2048, FS_4096, HFS_2048, POINT_COMPRESSED_WIDTH, S2_WIDTH, T1_WIDTH};
use crate::error::{BytesVec, TofnFatal, TofnResult, VerifyError};
use crate::k256_serde;
use crate::octets;
use crate::paillier::{
    secp256k1_modulus,
    utils::{member_of_mod, member_of_mul_group},
    zk::ZkSetup,
    Ciphertext, EncryptionKey, Plaintext, Randomness,
};

use super::{secp256k1_modulus_cubed, secp256k1_modulus_squared};

/// Statement (ciphertext1, ciphertext2, ek), witness (x, msg, randomness)
/// such that `ciphertext2 = x *' ciphertext1 +' Enc(ek, msg, randomness)` and
/// `0 <= x <= q^3`, where `*'` and `+'` denote homomorphic operations on
/// ciphertexts. Used by the server side of MtA ("Bob", the respondent) to
/// prove its homomorphic response was well-formed.
/// Full specification: appendix A.3 of <https://eprint.iacr.org/2019/114.pdf>.
#[derive(Clone, Debug)]
pub struct Statement<'a> {
    pub ciphertext1: &'a Ciphertext,
    pub ciphertext2: &'a Ciphertext,
    pub ek: &'a EncryptionKey,
}

#[derive(Clone, Debug)]
pub struct Witness<'a> {
    pub x: &'a k256::Scalar,
    pub msg: &'a Plaintext,
    pub randomness: &'a Randomness,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proof {
    z: BigNumber,
    z_prime: BigNumber,
    t: BigNumber,
    v: BigNumber,
    w: BigNumber,
    s: Randomness,
    s1: Plaintext,
    s2: Randomness,
    t1: Plaintext,
    t2: Randomness,
}

/// As [`Statement`], additionally binding `x` to a published curve point
/// `x_g = x * G` (the "check"). Adapted from appendix A.2 of
/// <https://eprint.iacr.org/2019/114.pdf>.
#[derive(Clone, Debug)]
pub struct StatementWc<'a> {
    pub stmt: Statement<'a>,
    pub x_g: &'a k256::ProjectivePoint,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProofWc {
    proof: Proof,
    u: k256_serde::ProjectivePoint,
}

/// Field widths of [`Proof::to_bytes`], in transcript order: `Z ‖ Z1 ‖ T ‖ V
/// ‖ W ‖ S ‖ S1 ‖ S2 ‖ T1 ‖ T2` (section 6, "ZK commitment" and "ZK proof"
/// concatenated into the single non-interactive proof object).
///
/// `T1` is widened to [`T1_WIDTH`] rather than the bare `FS_2048` section 6
/// lists for it: `t1 = e*y + gamma` where `y` and `gamma` are each sampled up
/// to `N` and `e` is a `q`-sized challenge, so `t1` overflows a plain
/// `FS_2048` field for virtually every honest proof, the same overflow `s2`/
/// `t2` avoid with their own above-`FS_2048` widths.
const PROOF_FIELD_WIDTHS: [usize; 10] = [
    FS_2048, FS_2048, FS_2048, FS_4096, FS_2048, FS_2048, HFS_2048, S2_WIDTH, T1_WIDTH, S2_WIDTH,
];

impl Proof {
    /// Canonical fixed-width encoding: `Z(256) ‖ Z1(256) ‖ T(256) ‖ V(512) ‖
    /// W(256) ‖ S(256) ‖ S1(128) ‖ S2(384) ‖ T1(288) ‖ T2(384)` (section 6,
    /// widened for `T1` per [`PROOF_FIELD_WIDTHS`]'s doc comment).
    pub fn to_bytes(&self) -> BytesVec {
        let mut out = Vec::with_capacity(PROOF_FIELD_WIDTHS.iter().sum());
        out.extend(octets::bignum_to_fixed_be(&self.z, FS_2048));
        out.extend(octets::bignum_to_fixed_be(&self.z_prime, FS_2048));
        out.extend(octets::bignum_to_fixed_be(&self.t, FS_2048));
        out.extend(octets::bignum_to_fixed_be(&self.v, FS_4096));
        out.extend(octets::bignum_to_fixed_be(&self.w, FS_2048));
        out.extend(octets::bignum_to_fixed_be(&self.s.0, FS_2048));
        out.extend(octets::bignum_to_fixed_be(&self.s1.0, HFS_2048));
        out.extend(octets::bignum_to_fixed_be(&self.s2.0, S2_WIDTH));
        out.extend(octets::bignum_to_fixed_be(&self.t1.0, T1_WIDTH));
        out.extend(octets::bignum_to_fixed_be(&self.t2.0, S2_WIDTH));
        out
    }

    /// Inverse of [`Proof::to_bytes`]. A length mismatch is a contract
    /// violation per section 7, but this parses untrusted bytes, so it
    /// reports the mismatch as [`VerifyError::Fail`] rather than panicking.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VerifyError> {
        let total: usize = PROOF_FIELD_WIDTHS.iter().sum();
        if bytes.len() != total {
            warn!("mta proof: wrong octet length");
            return Err(VerifyError::Fail);
        }

        let mut offset = 0;
        let mut take = |width: usize| {
            let field = BigNumber::from_slice(&bytes[offset..offset + width]);
            offset += width;
            field
        };

        let z = take(PROOF_FIELD_WIDTHS[0]);
        let z_prime = take(PROOF_FIELD_WIDTHS[1]);
        let t = take(PROOF_FIELD_WIDTHS[2]);
        let v = take(PROOF_FIELD_WIDTHS[3]);
        let w = take(PROOF_FIELD_WIDTHS[4]);
        let s = take(PROOF_FIELD_WIDTHS[5]);
        let s1 = take(PROOF_FIELD_WIDTHS[6]);
        let s2 = take(PROOF_FIELD_WIDTHS[7]);
        let t1 = take(PROOF_FIELD_WIDTHS[8]);
        let t2 = take(PROOF_FIELD_WIDTHS[9]);

        Ok(Proof {
            z,
            z_prime,
            t,
            v,
            w,
            s: Randomness(s),
            s1: Plaintext(s1),
            s2: Randomness(s2),
            t1: Plaintext(t1),
            t2: Randomness(t2),
        })
    }
}

impl ProofWc {
    /// As the `ZKWC` layout (section 6): the underlying [`Proof::to_bytes`]
    /// followed by the compressed curve point `U`.
    pub fn to_bytes(&self) -> BytesVec {
        let mut out = self.proof.to_bytes();
        out.extend(self.u.to_bytes());
        out
    }

    /// Inverse of [`ProofWc::to_bytes`]. Returns
    /// [`VerifyError::InvalidEcPoint`] specifically when the trailing point
    /// octets do not decode to a point on the curve (section 6).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VerifyError> {
        if bytes.len() < POINT_COMPRESSED_WIDTH {
            warn!("mta proof wc: wrong octet length");
            return Err(VerifyError::Fail);
        }
        let split = bytes.len() - POINT_COMPRESSED_WIDTH;
        let proof = Proof::from_bytes(&bytes[..split])?;
        let u = k256_serde::ProjectivePoint::from_bytes(&bytes[split..]).ok_or_else(|| {
            warn!("mta proof wc: u is not a well-formed curve point");
            VerifyError::InvalidEcPoint
        })?;

        Ok(ProofWc { proof, u })
    }
}

impl ZkSetup {
    pub fn mta_proof(&self, stmt: &Statement, wit: &Witness) -> Proof {
        self.mta_proof_inner(constants::MTA_PROOF_TAG, stmt, None, wit)
            .0
    }

    pub fn verify_mta_proof(&self, stmt: &Statement, proof: &Proof) -> Result<(), VerifyError> {
        self.verify_mta_proof_inner(constants::MTA_PROOF_TAG, stmt, proof, None)
    }

    pub fn mta_proof_wc(&self, stmt: &StatementWc, wit: &Witness) -> TofnResult<ProofWc> {
        let (proof, u) =
            self.mta_proof_inner(constants::MTA_PROOF_WC_TAG, &stmt.stmt, Some(stmt.x_g), wit);

        let u = u.ok_or(TofnFatal)?.into();

        Ok(ProofWc { proof, u })
    }

    pub fn verify_mta_proof_wc(
        &self,
        stmt: &StatementWc,
        proof: &ProofWc,
    ) -> Result<(), VerifyError> {
        self.verify_mta_proof_inner(
            constants::MTA_PROOF_WC_TAG,
            &stmt.stmt,
            &proof.proof,
            Some((stmt.x_g, proof.u.as_ref())),
        )
    }

    /// Compute the challenge `e` in `Z_q` for the receiver ZK proof.
    ///
    /// Transcript order follows section 4.3/4.4's `H(g ‖ Ñ ‖ h₁ ‖ h₂ ‖ q ‖ c₁
    /// ‖ c₂ ‖ (x_g) ‖ z ‖ z₁ ‖ t ‖ (u) ‖ v ‖ w)` with `tag` prepended for this
    /// crate's own domain separation and `N` (from which `g = N+1` and the
    /// ciphertexts' modulus are both derived) kept alongside it, as in the
    /// teacher's own transcript.
    #[allow(clippy::too_many_arguments)]
    fn compute_mta_proof_challenge(
        &self,
        tag: u8,
        stmt: &Statement,
        x_g: Option<&k256::ProjectivePoint>,
        z: &BigNumber,
        z_prime: &BigNumber,
        t: &BigNumber,
        u: Option<&k256::ProjectivePoint>,
        v: &BigNumber,
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
            .chain(stmt.ciphertext1.to_bigint().to_bytes())
            .chain(stmt.ciphertext2.to_bigint().to_bytes())
            .chain(x_g.map_or([0; 33], k256_serde::point_to_bytes))
            .chain(z.to_bytes())
            .chain(z_prime.to_bytes())
            .chain(t.to_bytes())
            .chain(u.map_or([0; 33], k256_serde::point_to_bytes))
            .chain(v.to_bytes())
            .chain(w.to_bytes())
            .finalize();

        k256::Scalar::reduce(U256::from_be_byte_array(digest))
    }

    #[allow(clippy::many_single_char_names)]
    fn mta_proof_inner(
        &self,
        tag: u8,
        stmt: &Statement,
        x_g: Option<&k256::ProjectivePoint>,
        wit: &Witness,
    ) -> (Proof, Option<k256::ProjectivePoint>) {
        debug_assert!(member_of_mod(
            &Plaintext::from_scalar(wit.x).0,
            &secp256k1_modulus()
        ));
        debug_assert!(member_of_mod(&wit.msg.0, stmt.ek.n()));
        debug_assert!(member_of_mul_group(&wit.randomness.0, stmt.ek.n()));
        if let Some(x_g) = x_g {
            debug_assert!(*x_g == k256::ProjectivePoint::generator() * wit.x);
        }

        // alpha in Z_q^3
        let alpha = Plaintext::generate(&secp256k1_modulus_cubed());

        let q_n_tilde = secp256k1_modulus() * self.n_tilde();
        let q3_n_tilde = secp256k1_modulus_cubed() * self.n_tilde();

        // sigma, tau, rho in Z_(q N~); rho' in Z_(q^3 N~)
        let sigma = Randomness::generate(&q_n_tilde);
        let tau = Randomness::generate(&q_n_tilde);
        let rho = Randomness::generate(&q_n_tilde);
        let rho_prime = Randomness::generate(&q3_n_tilde);

        let nn = stmt.ek.n() * stmt.ek.n();

        // beta in Z*_N
        let beta = stmt.ek.sample_randomness();
        // gamma in Z_N
        let gamma = Plaintext(stmt.ek.sample_randomness().0);

        let x = Plaintext::from_scalar(wit.x);

        // z = h1^x h2^rho mod N~
        let z = self.commit(&x, &rho);

        // z' = h1^alpha h2^rho' mod N~
        let z_prime = self.commit(&alpha, &rho_prime);

        // t = h1^y h2^sigma mod N~
        let t = self.commit(wit.msg, &sigma);

        // u = g^alpha (only when proving the "wc" variant)
        let u = x_g.map::<k256::ProjectivePoint, _>(|_| {
            k256::ProjectivePoint::generator() * alpha.to_scalar()
        });

        // v = c1^alpha * Paillier-Enc(gamma, beta) mod N^2
        let v = stmt
            .ek
            .encrypt_with_randomness(&gamma, &beta)
            .to_bigint()
            .modmul(&stmt.ciphertext1.to_bigint().modpow(&alpha.0, &nn), &nn);

        // w = h1^gamma h2^tau mod N~
        let w = self.commit(&gamma, &tau);

        let e = self.compute_mta_proof_challenge(
            tag, stmt, x_g, &z, &z_prime, &t, u.as_ref(), &v, &w,
        );
        let e_bigint = Plaintext::from_scalar(&e).0;

        // s = r^e beta mod N
        let s = Randomness(
            wit.randomness
                .0
                .modpow(&e_bigint, stmt.ek.n())
                .modmul(&beta.0, stmt.ek.n()),
        );

        // The remaining responses are computed over the integers.
        let s1 = Plaintext(&e_bigint * &x.0 + &alpha.0);
        let s2 = Randomness(&e_bigint * &rho.0 + &rho_prime.0);
        let t1 = Plaintext(&e_bigint * &wit.msg.0 + &gamma.0);
        let t2 = Randomness(&e_bigint * &sigma.0 + &tau.0);

        (
            Proof {
                z,
                z_prime,
                t,
                v,
                w,
                s,
                s1,
                s2,
                t1,
                t2,
            },
            u,
        )
    }

    #[allow(clippy::too_many_lines)]
    fn verify_mta_proof_inner(
        &self,
        tag: u8,
        stmt: &Statement,
        proof: &Proof,
        x_g_u: Option<(&k256::ProjectivePoint, &k256::ProjectivePoint)>,
    ) -> Result<(), VerifyError> {
        let nn = stmt.ek.n() * stmt.ek.n();

        if !member_of_mul_group(stmt.ciphertext1.to_bigint(), &nn) {
            warn!("mta proof: c1 not in Z*_N^2");
            return Err(VerifyError::Fail);
        }
        if !member_of_mul_group(stmt.ciphertext2.to_bigint(), &nn) {
            warn!("mta proof: c2 not in Z*_N^2");
            return Err(VerifyError::Fail);
        }
        if !member_of_mul_group(&proof.z, self.n_tilde()) {
            warn!("mta proof: z not in Z*_N~");
            return Err(VerifyError::Fail);
        }
        if !member_of_mul_group(&proof.z_prime, self.n_tilde()) {
            warn!("mta proof: z' not in Z*_N~");
            return Err(VerifyError::Fail);
        }
        if !member_of_mul_group(&proof.t, self.n_tilde()) {
            warn!("mta proof: t not in Z*_N~");
            return Err(VerifyError::Fail);
        }
        if !member_of_mul_group(&proof.v, &nn) {
            warn!("mta proof: v not in Z*_N^2");
            return Err(VerifyError::Fail);
        }
        if !member_of_mul_group(&proof.w, self.n_tilde()) {
            warn!("mta proof: w not in Z*_N~");
            return Err(VerifyError::Fail);
        }
        if !member_of_mul_group(&proof.s.0, stmt.ek.n()) {
            warn!("mta proof: s not in Z*_N");
            return Err(VerifyError::Fail);
        }

        // s1 <= q^3: the appendix requires equality-or-less; equality occurs
        // with negligible probability from an honest prover.
        if !member_of_mod(&proof.s1.0, &secp256k1_modulus_cubed()) {
            warn!("mta proof: s1 not in Z_q^3");
            return Err(VerifyError::Fail);
        }

        let q3_n_tilde = secp256k1_modulus_cubed() * self.n_tilde();
        if !member_of_mod(&proof.s2.0, &q3_n_tilde) {
            warn!("mta proof: s2 not in Z_(q^3 N~)");
            return Err(VerifyError::Fail);
        }

        let q_n = secp256k1_modulus() * stmt.ek.n();
        if proof.t1.0 == BigNumber::zero() || !member_of_mod(&proof.t1.0, &q_n) {
            warn!("mta proof: t1 not in Z_(q N)");
            return Err(VerifyError::Fail);
        }

        let q2_n_tilde = &secp256k1_modulus_squared() * self.n_tilde();
        if !member_of_mod(&proof.t2.0, &q2_n_tilde) {
            warn!("mta proof: t2 not in Z_(q^2 N~)");
            return Err(VerifyError::Fail);
        }

        let e = self.compute_mta_proof_challenge(
            tag,
            stmt,
            x_g_u.map(|(x_g, _)| x_g),
            &proof.z,
            &proof.z_prime,
            &proof.t,
            x_g_u.map(|(_, u)| u),
            &proof.v,
            &proof.w,
        );
        let e_bigint = Plaintext::from_scalar(&e).0;

        if let Some((x_g, u)) = x_g_u {
            let s1 = proof.s1.to_scalar();
            let s1_g = k256::ProjectivePoint::generator() * s1;
            let s1_g_check = x_g * &e + u;
            if s1_g_check != s1_g {
                warn!("mta proof: 'wc' check failed, invalid (x_g, u, s1)");
                return Err(VerifyError::Fail);
            }
        }

        // h1^s1 h2^s2 ?= z^e z' mod N~
        let z_e_z_prime = proof
            .z
            .modpow(&e_bigint, self.n_tilde())
            .modmul(&proof.z_prime, self.n_tilde());
        let z_e_z_prime_check = self.commit(&proof.s1, &proof.s2);
        if z_e_z_prime_check != z_e_z_prime {
            warn!("mta proof: z^e z' check failed");
            return Err(VerifyError::Fail);
        }

        // h1^t1 h2^t2 ?= t^e w mod N~
        let t_e_w = proof
            .t
            .modpow(&e_bigint, self.n_tilde())
            .modmul(&proof.w, self.n_tilde());
        let t_e_w_check = self.commit(&proof.t1, &proof.t2);
        if t_e_w_check != t_e_w {
            warn!("mta proof: t^e w check failed");
            return Err(VerifyError::Fail);
        }

        // c1^s1 s^N Gamma^t1 ?= c2^e v mod N^2
        let cipher_check_lhs = stmt
            .ek
            .encrypt_with_randomness(&proof.t1, &proof.s)
            .to_bigint()
            .modmul(
                &stmt.ciphertext1.to_bigint().modpow(&proof.s1.0, &nn),
                &nn,
            );
        let cipher_check_rhs = proof
            .v
            .modmul(&stmt.ciphertext2.to_bigint().modpow(&e_bigint, &nn), &nn);
        if cipher_check_lhs != cipher_check_rhs {
            warn!("mta proof: cipher check failed");
            return Err(VerifyError::Fail);
        }

        Ok(())
    }
}

// Included in non-malicious test builds to avoid duplicating the tamper
// logic for both the honest-path and soundness tests.
#[cfg(test)]
pub mod malicious {
    use super::*;

    pub fn corrupt_proof(proof: &Proof) -> Proof {
        let proof = proof.clone();
        Proof {
            v: proof.v + BigNumber::one(),
            ..proof
        }
    }

    pub fn corrupt_proof_wc(proof_wc: &ProofWc) -> ProofWc {
        let proof_wc = proof_wc.clone();
        ProofWc {
            u: k256_serde::ProjectivePoint::from(
                k256::ProjectivePoint::generator() + proof_wc.u.as_ref(),
            ),
            ..proof_wc
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        malicious::{corrupt_proof, corrupt_proof_wc},
        Statement, StatementWc, Witness, ZkSetup, POINT_COMPRESSED_WIDTH,
    };
    use crate::error::VerifyError;
    use crate::paillier::{keygen_unsafe, Ciphertext, Plaintext};
    use ecdsa::elliptic_curve::Field;
    use libpaillier::unknown_order::BigNumber;

    #[test]
    fn basic_correctness() {
        let (ek, _dk) = &keygen_unsafe(&mut rand::thread_rng()).unwrap();
        let msg = &Plaintext(ek.sample_randomness().0);
        let x = &k256::Scalar::random(rand::thread_rng());
        let x_g = &(k256::ProjectivePoint::generator() * x);
        let randomness = &ek.sample_randomness();
        let ciphertext1 = &Ciphertext::from_bigint(BigNumber::random(ek.n()));
        let ciphertext2 = &ek.add(
            &ek.mul(ciphertext1, &Plaintext::from_scalar(x)),
            &ek.encrypt_with_randomness(msg, randomness),
        );

        let stmt_wc = &StatementWc {
            stmt: Statement {
                ciphertext1,
                ciphertext2,
                ek,
            },
            x_g,
        };
        let stmt = &stmt_wc.stmt;
        let wit = &Witness { x, msg, randomness };
        let (zkp, _) = ZkSetup::new_unsafe(&mut rand::thread_rng(), &0_u32.to_be_bytes()).unwrap();

        let proof = zkp.mta_proof(stmt, wit);
        zkp.verify_mta_proof(stmt, &proof).unwrap();

        let proof_wc = zkp.mta_proof_wc(stmt_wc, wit).unwrap();
        zkp.verify_mta_proof_wc(stmt_wc, &proof_wc).unwrap();

        let bad_proof = corrupt_proof(&proof);
        zkp.verify_mta_proof(stmt, &bad_proof).unwrap_err();

        let bad_proof_wc = corrupt_proof_wc(&proof_wc);
        zkp.verify_mta_proof_wc(stmt_wc, &bad_proof_wc).unwrap_err();

        let bad_wit = &Witness {
            msg: &Plaintext(&wit.msg.0 + BigNumber::one()),
            ..*wit
        };
        let bad_wit_proof = zkp.mta_proof(stmt, bad_wit);
        zkp.verify_mta_proof(stmt, &bad_wit_proof).unwrap_err();

        let bad_wit_proof_wc = zkp.mta_proof_wc(stmt_wc, bad_wit).unwrap();
        zkp.verify_mta_proof_wc(stmt_wc, &bad_wit_proof_wc)
            .unwrap_err();
    }

    #[test]
    fn octet_round_trip_and_tamper() {
        let (ek, _dk) = &keygen_unsafe(&mut rand::thread_rng()).unwrap();
        let msg = &Plaintext(ek.sample_randomness().0);
        let x = &k256::Scalar::random(rand::thread_rng());
        let x_g = &(k256::ProjectivePoint::generator() * x);
        let randomness = &ek.sample_randomness();
        let ciphertext1 = &Ciphertext::from_bigint(BigNumber::random(ek.n()));
        let ciphertext2 = &ek.add(
            &ek.mul(ciphertext1, &Plaintext::from_scalar(x)),
            &ek.encrypt_with_randomness(msg, randomness),
        );

        let stmt_wc = &StatementWc {
            stmt: Statement {
                ciphertext1,
                ciphertext2,
                ek,
            },
            x_g,
        };
        let stmt = &stmt_wc.stmt;
        let wit = &Witness { x, msg, randomness };
        let (zkp, _) = ZkSetup::new_unsafe(&mut rand::thread_rng(), &0_u32.to_be_bytes()).unwrap();

        let proof = zkp.mta_proof(stmt, wit);
        let bytes = proof.to_bytes();
        let decoded = super::Proof::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.to_bytes(), bytes);
        zkp.verify_mta_proof(stmt, &decoded).unwrap();

        let mut tampered = bytes.clone();
        let last = tampered.len() - 1;
        tampered[last] ^= 0x01;
        let tampered_proof = super::Proof::from_bytes(&tampered).unwrap();
        zkp.verify_mta_proof(stmt, &tampered_proof).unwrap_err();

        assert!(super::Proof::from_bytes(&bytes[..bytes.len() - 1]).is_err());

        let proof_wc = zkp.mta_proof_wc(stmt_wc, wit).unwrap();
        let wc_bytes = proof_wc.to_bytes();
        let decoded_wc = super::ProofWc::from_bytes(&wc_bytes).unwrap();
        assert_eq!(decoded_wc.to_bytes(), wc_bytes);
        zkp.verify_mta_proof_wc(stmt_wc, &decoded_wc).unwrap();

        let mut off_curve = wc_bytes.clone();
        let point_start = off_curve.len() - POINT_COMPRESSED_WIDTH;
        off_curve[point_start] = 0xff;
        assert_eq!(
            super::ProofWc::from_bytes(&off_curve).unwrap_err(),
            VerifyError::InvalidEcPoint
        );
    }
}
