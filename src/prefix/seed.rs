use super::{decode_derivative, Prefix};
use crate::error::Error;
use crate::keys::{PrivateKey, PublicKey};
use core::str::FromStr;
use ed25519_dalek::SecretKey;
use zeroize::Zeroize;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SeedPrefix {
    RandomSeed256Ed25519(Vec<u8>),
}

impl SeedPrefix {
    /// Expands the seed into its Ed25519 keypair.
    pub fn derive_key_pair(&self) -> Result<(PublicKey, PrivateKey), Error> {
        match self {
            Self::RandomSeed256Ed25519(seed) => {
                let sk = SecretKey::from_bytes(seed)?;
                let pk = ed25519_dalek::PublicKey::from(&sk);
                Ok((
                    PublicKey::new(pk.to_bytes().to_vec()),
                    PrivateKey::new(seed.clone()),
                ))
            }
        }
    }
}

impl FromStr for SeedPrefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.get(..1).ok_or(Error::DeserializationError)? {
            "A" => {
                let derivative = decode_derivative(&SeedCode, &s[1..])?;
                if derivative.len() != 32 {
                    return Err(Error::IncorrectLengthError {
                        code: "A".to_string(),
                        expected: 32,
                        got: derivative.len(),
                    });
                }
                Ok(Self::RandomSeed256Ed25519(derivative))
            }
            _ => Err(Error::UnknownCodeError(s.to_string())),
        }
    }
}

impl Prefix for SeedPrefix {
    fn derivative(&self) -> &[u8] {
        match self {
            Self::RandomSeed256Ed25519(seed) => seed,
        }
    }

    fn derivation_code(&self) -> String {
        match self {
            Self::RandomSeed256Ed25519(_) => "A".to_string(),
        }
    }
}

impl Drop for SeedPrefix {
    fn drop(&mut self) {
        match self {
            Self::RandomSeed256Ed25519(seed) => seed.zeroize(),
        }
    }
}

/// Size table entry for the seed code.
struct SeedCode;

impl crate::derivation::DerivationCode for SeedCode {
    fn code_len(&self) -> usize {
        1
    }

    fn derivative_b64_len(&self) -> usize {
        43
    }

    fn to_str(&self) -> String {
        "A".to_string()
    }
}
