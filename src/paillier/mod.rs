//! A centralized wrapper for the paillier dependency. Exists to provide an
//! ergonomic API and to facilitate swapping the underlying big-integer
//! back-end without touching callers.

use libpaillier::unknown_order::BigNumber;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::{TofnFatal, TofnResult};

use self::utils::{member_of_mod, member_of_mul_group};

pub mod utils;
pub mod zk;

/// unsafe because the key pair does not use safe primes
pub fn keygen_unsafe(
    rng: &mut (impl CryptoRng + RngCore),
) -> TofnResult<(EncryptionKey, DecryptionKey)> {
    let p = BigNumber::prime_with_rng(rng, 1024);
    let q = BigNumber::prime_with_rng(rng, 1024);

    let dk = libpaillier::DecryptionKey::with_safe_primes_unchecked(&p, &q).ok_or(TofnFatal)?;
    let ek = (&dk).into();

    Ok((EncryptionKey(ek), DecryptionKey(dk)))
}

/// Generate a Paillier keypair using safe primes.
pub fn keygen(rng: &mut (impl CryptoRng + RngCore)) -> TofnResult<(EncryptionKey, DecryptionKey)> {
    let dk = libpaillier::DecryptionKey::with_rng(rng).ok_or(TofnFatal)?;
    let ek = (&dk).into();

    Ok((EncryptionKey(ek), DecryptionKey(dk)))
}

/// Wrapper for a `BigNumber` that is zeroized on drop.
#[derive(Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretNumber(BigNumber);

/// Wrapper for a Paillier encryption key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Zeroize)]
pub struct EncryptionKey(pub(crate) libpaillier::EncryptionKey);

impl EncryptionKey {
    pub fn n(&self) -> &BigNumber {
        self.0.n()
    }

    pub fn sample_randomness(&self) -> Randomness {
        Randomness(BigNumber::random(self.0.n()))
    }

    pub fn random_plaintext(&self) -> Plaintext {
        Plaintext(BigNumber::random(self.0.n()))
    }

    /// Validate that `p` is a valid input to the Paillier encryption key.
    pub fn validate_plaintext(&self, p: &Plaintext) -> bool {
        member_of_mod(&p.0, self.0.n())
    }

    /// Validate that `c` is a valid output of the Paillier encryption key.
    pub fn validate_ciphertext(&self, c: &Ciphertext) -> bool {
        member_of_mul_group(&c.0, self.0.nn())
    }

    /// Validate that `r` is a valid input to the Paillier encryption key.
    pub fn validate_randomness(&self, r: &Randomness) -> bool {
        member_of_mul_group(&r.0, self.0.n())
    }

    /// Encrypt a plaintext `p` with the Paillier encryption key.
    pub fn encrypt(&self, p: &Plaintext) -> (Ciphertext, Randomness) {
        // Paillier encryption requires r to be co-prime to N. Sampling a
        // random integer mod N has negligible probability of not being
        // co-prime.
        let r = self.sample_randomness();

        (self.encrypt_with_randomness(p, &r), r)
    }

    pub fn encrypt_with_randomness(&self, p: &Plaintext, r: &Randomness) -> Ciphertext {
        Ciphertext(self.0.encrypt_with_randomness(&p.0, &r.0))
    }

    /// Homomorphically add `c1` to `c2`.
    pub fn add(&self, c1: &Ciphertext, c2: &Ciphertext) -> Ciphertext {
        Ciphertext(self.0.add_unchecked(&c1.0, &c2.0))
    }

    /// Homomorphically multiply `c` by `p`.
    pub fn mul(&self, c: &Ciphertext, p: &Plaintext) -> Ciphertext {
        Ciphertext(self.0.mul_unchecked(&c.0, &p.0))
    }
}

/// Wrapper for a Paillier decryption key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Zeroize)]
#[zeroize(drop)]
pub struct DecryptionKey(libpaillier::DecryptionKey);

impl DecryptionKey {
    pub fn encryption_key(&self) -> EncryptionKey {
        EncryptionKey((&self.0).into())
    }

    pub fn p(&self) -> &BigNumber {
        self.0.p()
    }

    pub fn q(&self) -> &BigNumber {
        self.0.q()
    }

    pub fn totient(&self) -> &BigNumber {
        self.0.totient()
    }

    pub fn n_inv(&self) -> &BigNumber {
        self.0.n_inv()
    }

    pub fn decrypt(&self, c: &Ciphertext) -> Plaintext {
        Plaintext(self.0.decrypt_unchecked(&c.0))
    }

    pub fn decrypt_with_randomness(&self, c: &Ciphertext) -> (Plaintext, Randomness) {
        let (m, r) = self.0.decrypt_with_randomness(&c.0);
        (Plaintext(m), Randomness(r))
    }
}

/// Wrapper for a Paillier plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Zeroize)]
#[zeroize(drop)]
pub struct Plaintext(pub(crate) BigNumber);

impl Plaintext {
    /// Generate a random plaintext in the range `[0, n)`.
    pub fn generate(n: &BigNumber) -> Self {
        Self(BigNumber::random(n))
    }

    pub fn to_scalar(&self) -> k256::Scalar {
        to_scalar(&self.0)
    }

    pub fn from_scalar(s: &k256::Scalar) -> Self {
        Self(to_bigint(s))
    }

    pub fn to_bigint(&self) -> &BigNumber {
        &self.0
    }

    pub fn from_bigint(n: BigNumber) -> Self {
        Self(n)
    }
}

/// prefer `Plaintext` associated functions over `From` impls because an IDE
/// can follow the links
impl From<&Plaintext> for k256::Scalar {
    fn from(p: &Plaintext) -> Self {
        p.to_scalar()
    }
}

impl From<&k256::Scalar> for Plaintext {
    fn from(s: &k256::Scalar) -> Self {
        Plaintext::from_scalar(s)
    }
}

/// Wrapper for a Paillier ciphertext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ciphertext(pub(crate) libpaillier::Ciphertext);

impl Ciphertext {
    pub fn to_bigint(&self) -> &BigNumber {
        &self.0
    }

    pub fn from_bigint(n: BigNumber) -> Self {
        Self(n)
    }
}

/// Wrapper for randomness used in Paillier encryption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Zeroize)]
#[zeroize(drop)]
pub struct Randomness(pub(crate) BigNumber);

impl Randomness {
    /// Generate a random number in the range `[0, n)`.
    pub fn generate(n: &BigNumber) -> Self {
        Self(BigNumber::random(n))
    }

    /// Generate a random number in the range `[0, n)` with the provided RNG.
    pub fn generate_with_rng(rng: &mut (impl CryptoRng + RngCore), n: &BigNumber) -> Self {
        Self(BigNumber::random_with_rng(rng, n))
    }
}

fn to_bigint(s: &k256::Scalar) -> BigNumber {
    BigNumber::from_slice(s.to_bytes().as_slice())
}

fn to_scalar(bigint: &BigNumber) -> k256::Scalar {
    use ecdsa::elliptic_curve::{bigint::ArrayEncoding, ops::Reduce};
    use k256::U256;

    let reduced = mod_secp256k1(bigint);
    let bytes = crate::octets::pad32(reduced.to_bytes());
    k256::Scalar::reduce(U256::from_be_byte_array(bytes.into()))
}

/// The order of the secp256k1 curve.
const SECP256K1_CURVE_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// secp256k1 curve order as a `BigNumber`.
pub(crate) fn secp256k1_modulus() -> BigNumber {
    BigNumber::from_slice(SECP256K1_CURVE_ORDER.as_ref())
}

/// reduce `n` modulo the order of the secp256k1 curve
fn mod_secp256k1(n: &BigNumber) -> BigNumber {
    n % &secp256k1_modulus()
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::elliptic_curve::Field;

    #[test]
    fn basic_round_trip() {
        let s = k256::Scalar::random(rand::thread_rng());
        let pt = Plaintext::from_scalar(&s);
        let (ek, dk) = keygen_unsafe(&mut rand::thread_rng()).unwrap();
        let (ct, r) = ek.encrypt(&pt);
        let (pt2, r2) = dk.decrypt_with_randomness(&ct);
        let s2 = pt2.to_scalar();

        assert_eq!(pt, pt2);
        assert_eq!(r, r2);
        assert_eq!(s, s2);
    }

    #[test]
    fn homomorphic_add_and_mul() {
        let (ek, dk) = keygen_unsafe(&mut rand::thread_rng()).unwrap();

        let a = Plaintext::from_scalar(&k256::Scalar::from(7u64));
        let b = Plaintext::from_scalar(&k256::Scalar::from(5u64));
        let (ct_a, _) = ek.encrypt(&a);
        let (ct_b, _) = ek.encrypt(&b);

        let sum_ct = ek.add(&ct_a, &ct_b);
        assert_eq!(dk.decrypt(&sum_ct).to_scalar(), k256::Scalar::from(12u64));

        let scaled_ct = ek.mul(&ct_a, &Plaintext::from_scalar(&k256::Scalar::from(3u64)));
        assert_eq!(dk.decrypt(&scaled_ct).to_scalar(), k256::Scalar::from(21u64));
    }

    #[test]
    fn secp256k1_order() {
        let g = k256::ProjectivePoint::generator();

        assert_eq!(
            g * to_scalar(&secp256k1_modulus()),
            k256::ProjectivePoint::identity()
        );
    }
}
