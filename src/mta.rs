//! Multiplicative-to-additive share conversion (C4): the two-pass exchange
//! between a client (holding `a`) and a server (holding `b`) that turns the
//! product `a*b` into an additive sharing `alpha + beta`, and the final sum
//! assembly that folds such a conversion's output into a party's local
//! contribution to a joint value.

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::{
    error::TofnResult,
    k256_serde,
    paillier::{
        zk::{mta, ZkSetup},
        Ciphertext, DecryptionKey, EncryptionKey, Plaintext, Randomness,
    },
};

/// Client pass 1 (`MTA_CLIENT1`): encrypt the multiplicative share `a` and
/// retain the Paillier randomness `r_a` for the accompanying Range Proof.
pub fn mta_client_1(a_ek: &EncryptionKey, a: &k256::Scalar) -> (Ciphertext, Randomness) {
    a_ek.encrypt(&Plaintext::from_scalar(a))
}

/// As [`mta_client_1`], but with caller-supplied randomness `r_a` (test
/// vector mode). Used verbatim, without rejection sampling.
pub fn mta_client_1_from_randomness(
    a_ek: &EncryptionKey,
    a: &k256::Scalar,
    r_a: &Randomness,
) -> Ciphertext {
    a_ek.encrypt_with_randomness(&Plaintext::from_scalar(a), r_a)
}

/// Client pass 2 (`MTA_CLIENT2`): decrypt the server's homomorphic response
/// `c_b` with the client's own Paillier private key to recover
/// `alpha = m mod q`.
pub fn mta_client_2(a_dk: &DecryptionKey, c_b: &Ciphertext) -> k256::Scalar {
    a_dk.decrypt(c_b).to_scalar()
}

/// Sum assembly (`SUM_MTA`): given local multiplicative shares `a1`, `b1`
/// and the outputs `alpha`, `beta` of two complementary MtA conversions,
/// compute this party's additive contribution `a1*b1 + alpha + beta mod q`
/// to a joint `k*gamma` or `k*sk`.
pub fn sum_mta(
    a1: &k256::Scalar,
    b1: &k256::Scalar,
    alpha: &k256::Scalar,
    beta: &k256::Scalar,
) -> k256::Scalar {
    a1 * b1 + alpha + beta
}

/// The server's retained secrets from one `mta_response*` call.
#[derive(Debug, Clone, Serialize, Deserialize, Zeroize)]
#[zeroize(drop)]
pub struct Secret {
    pub beta: k256_serde::Scalar,
    pub beta_prime: Plaintext,
    pub beta_prime_randomness: Randomness,
}

/// Server (`MTA_SERVER`): given the client's ciphertext `cₐ` and this
/// party's share `b`, sample fresh randomness and compute the homomorphic
/// response `c_b = cₐ^b · Enc(beta_prime) mod N²`, retaining
/// `beta = -beta_prime mod q` as this party's additive share.
pub fn mta_response(
    a_ek: &EncryptionKey,
    a_ciphertext: &Ciphertext,
    b: &k256::Scalar,
) -> (Ciphertext, Secret) {
    let beta_prime = a_ek.random_plaintext();
    let beta_prime_randomness = a_ek.sample_randomness();
    let (c_b, beta) =
        mta_response_from_randomness(a_ek, a_ciphertext, b, &beta_prime, &beta_prime_randomness);
    (
        c_b,
        Secret {
            beta,
            beta_prime,
            beta_prime_randomness,
        },
    )
}

/// As [`mta_response`], but with caller-supplied `beta_prime` and
/// `beta_prime_randomness` (test vector mode, or replaying a prior
/// response to verify it).
pub fn mta_response_from_randomness(
    a_ek: &EncryptionKey,
    a_ciphertext: &Ciphertext,
    b: &k256::Scalar,
    beta_prime: &Plaintext,
    beta_prime_randomness: &Randomness,
) -> (Ciphertext, k256_serde::Scalar) {
    let beta_prime_ciphertext = a_ek.encrypt_with_randomness(beta_prime, beta_prime_randomness);
    let c_b = a_ek.add(
        &a_ek.mul(a_ciphertext, &Plaintext::from_scalar(b)),
        &beta_prime_ciphertext,
    );
    let beta = k256_serde::Scalar::from(beta_prime.to_scalar().negate());
    (c_b, beta)
}

/// `true` iff `mta_response_from_randomness(a_ek, a_ciphertext, b,
/// s.beta_prime, s.beta_prime_randomness) == (c_b, s.beta)`.
pub fn verify_mta_response(
    a_ek: &EncryptionKey,
    a_ciphertext: &Ciphertext,
    b: &k256::Scalar,
    c_b: &Ciphertext,
    s: &Secret,
) -> bool {
    let (check_c_b, check_beta) = mta_response_from_randomness(
        a_ek,
        a_ciphertext,
        b,
        &s.beta_prime,
        &s.beta_prime_randomness,
    );
    check_c_b == *c_b && check_beta == s.beta
}

/// As [`mta_response`], additionally attaching a Receiver ZK Proof (C6) that
/// the response was computed correctly.
pub fn mta_response_with_proof(
    a_zkp: &ZkSetup,
    a_ek: &EncryptionKey,
    a_ciphertext: &Ciphertext,
    b: &k256::Scalar,
) -> (Ciphertext, mta::Proof, Secret) {
    let (c_b, s) = mta_response(a_ek, a_ciphertext, b);
    let proof = a_zkp.mta_proof(
        &mta::Statement {
            ciphertext1: a_ciphertext,
            ciphertext2: &c_b,
            ek: a_ek,
        },
        &mta::Witness {
            x: b,
            msg: &s.beta_prime,
            randomness: &s.beta_prime_randomness,
        },
    );
    (c_b, proof, s)
}

/// As [`mta_response`], additionally attaching a Receiver ZK Proof with
/// Check (C7) that binds `b` to the published point `b*G`.
pub fn mta_response_with_proof_wc(
    a_zkp: &ZkSetup,
    a_ek: &EncryptionKey,
    a_ciphertext: &Ciphertext,
    b: &k256::Scalar,
) -> TofnResult<(Ciphertext, mta::ProofWc, Secret)> {
    let (c_b, s) = mta_response(a_ek, a_ciphertext, b);
    let proof_wc = a_zkp.mta_proof_wc(
        &mta::StatementWc {
            stmt: mta::Statement {
                ciphertext1: a_ciphertext,
                ciphertext2: &c_b,
                ek: a_ek,
            },
            x_g: &(k256::ProjectivePoint::generator() * b),
        },
        &mta::Witness {
            x: b,
            msg: &s.beta_prime,
            randomness: &s.beta_prime_randomness,
        },
    )?;
    Ok((c_b, proof_wc, s))
}

#[cfg(test)]
mod tests {
    use ecdsa::elliptic_curve::Field;

    use super::*;
    use crate::paillier::{
        keygen_unsafe,
        zk::{range, ZkSetup},
    };

    #[test]
    fn basic_correctness() {
        let a = k256::Scalar::random(rand::thread_rng());
        let b = k256::Scalar::random(rand::thread_rng());
        let b_g = k256::ProjectivePoint::generator() * b;
        let (a_ek, a_dk) = keygen_unsafe(&mut rand::thread_rng()).unwrap();
        let (a_zkp, _) =
            ZkSetup::new_unsafe(&mut rand::thread_rng(), &0_u32.to_be_bytes()).unwrap();
        let (b_zkp, _) =
            ZkSetup::new_unsafe(&mut rand::thread_rng(), &1_u32.to_be_bytes()).unwrap();

        // MtA step 1: party a (client)
        let (a_ciphertext, a_randomness) = mta_client_1(&a_ek, &a);
        let a_range_proof = b_zkp.range_proof(
            &range::Statement {
                ciphertext: &a_ciphertext,
                ek: &a_ek,
            },
            &range::Witness {
                msg: &a,
                randomness: &a_randomness,
            },
        );

        // MtA step 2: party b (server, this module)
        b_zkp
            .verify_range_proof(
                &range::Statement {
                    ciphertext: &a_ciphertext,
                    ek: &a_ek,
                },
                &a_range_proof,
            )
            .unwrap();
        let (c_b, b_mta_proof_wc, b_secret) =
            mta_response_with_proof_wc(&a_zkp, &a_ek, &a_ciphertext, &b).unwrap();
        assert!(verify_mta_response(
            &a_ek,
            &a_ciphertext,
            &b,
            &c_b,
            &b_secret
        ));

        // MtA step 3: party a (client pass 2)
        a_zkp
            .verify_mta_proof_wc(
                &mta::StatementWc {
                    stmt: mta::Statement {
                        ciphertext1: &a_ciphertext,
                        ciphertext2: &c_b,
                        ek: &a_ek,
                    },
                    x_g: &b_g,
                },
                &b_mta_proof_wc,
            )
            .unwrap();
        let alpha = mta_client_2(&a_dk, &c_b);

        // a * b = alpha + beta
        let beta = *b_secret.beta.as_ref();
        assert_eq!(a * b, alpha + beta);

        // sum_mta folds this exchange's output into a party's additive
        // contribution to a joint value alongside its own local product.
        let sum = sum_mta(&a, &b, &alpha, &beta);
        assert_eq!(sum, a * b + a * b);
    }
}
