use crate::derivation::DerivationCode;
use crate::error::Error;
use core::fmt::{Display, Formatter};
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod attached_signature;
pub mod basic;
pub mod seed;
pub mod self_addressing;
pub mod self_signing;

pub use attached_signature::AttachedSignaturePrefix;
pub use basic::BasicPrefix;
pub use seed::SeedPrefix;
pub use self_addressing::SelfAddressingPrefix;
pub use self_signing::SelfSigningPrefix;

pub trait Prefix: FromStr<Err = Error> {
    fn derivative(&self) -> &[u8];
    fn derivation_code(&self) -> String;
    fn to_str(&self) -> String {
        match self.derivative().len() {
            // empty data cannot be prefixed
            0 => "".to_string(),
            _ => [
                self.derivation_code(),
                base64::encode_config(self.derivative(), base64::URL_SAFE_NO_PAD),
            ]
            .join(""),
        }
    }
}

/// Decodes the base64url tail of a qb64 string, validating the exact
/// lengths the code's size table prescribes.
pub(crate) fn decode_derivative<C: DerivationCode>(code: &C, tail: &str) -> Result<Vec<u8>, Error> {
    if tail.len() != code.derivative_b64_len() {
        return Err(Error::IncorrectLengthError {
            code: code.to_str(),
            expected: code.derivative_b64_len(),
            got: tail.len(),
        });
    }
    Ok(base64::decode_config(tail, base64::URL_SAFE_NO_PAD)?)
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub enum IdentifierPrefix {
    Basic(BasicPrefix),
    SelfAddressing(SelfAddressingPrefix),
}

impl FromStr for IdentifierPrefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match BasicPrefix::from_str(s) {
            Ok(bp) => Ok(Self::Basic(bp)),
            Err(_) => Ok(Self::SelfAddressing(SelfAddressingPrefix::from_str(s)?)),
        }
    }
}

impl Prefix for IdentifierPrefix {
    fn derivative(&self) -> &[u8] {
        match self {
            Self::Basic(bp) => bp.derivative(),
            Self::SelfAddressing(sap) => sap.derivative(),
        }
    }

    fn derivation_code(&self) -> String {
        match self {
            Self::Basic(bp) => bp.derivation_code(),
            Self::SelfAddressing(sap) => sap.derivation_code(),
        }
    }
}

impl Display for IdentifierPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl Default for IdentifierPrefix {
    fn default() -> Self {
        IdentifierPrefix::SelfAddressing(SelfAddressingPrefix::default())
    }
}

/// Serde compatible Serialize
impl Serialize for IdentifierPrefix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_str())
    }
}

/// Serde compatible Deserialize
impl<'de> Deserialize<'de> for IdentifierPrefix {
    fn deserialize<D>(deserializer: D) -> Result<IdentifierPrefix, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        IdentifierPrefix::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Verify
///
/// Uses a public key to verify a signature against some data, with the key
/// and signature represented by basic and self-signing prefixes. A
/// cryptographically bad signature is `Ok(false)`; malformed inputs error.
pub fn verify(
    data: &[u8],
    key: &BasicPrefix,
    signature: &SelfSigningPrefix,
) -> Result<bool, Error> {
    match key {
        BasicPrefix::Ed25519(pk) | BasicPrefix::Ed25519NT(pk) => match signature {
            SelfSigningPrefix::Ed25519Sha512(sig) => {
                if sig.len() != 64 {
                    return Err(Error::IncorrectLengthError {
                        code: "0B".to_string(),
                        expected: 64,
                        got: sig.len(),
                    });
                }
                if pk.key().len() != 32 {
                    return Err(Error::IncorrectLengthError {
                        code: key.derivation_code(),
                        expected: 32,
                        got: pk.key().len(),
                    });
                }
                Ok(pk.verify_ed(data, sig))
            }
        },
    }
}

/// Derive
///
/// Derives the basic prefix corresponding to the given seed prefix.
pub fn derive(seed: &SeedPrefix, transferable: bool) -> Result<BasicPrefix, Error> {
    let (pk, _) = seed.derive_key_pair()?;
    Ok(match seed {
        SeedPrefix::RandomSeed256Ed25519(_) if transferable => BasicPrefix::Ed25519(pk),
        SeedPrefix::RandomSeed256Ed25519(_) => BasicPrefix::Ed25519NT(pk),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{PrivateKey, PublicKey};
    use ed25519_dalek::Keypair;
    use rand::rngs::OsRng;

    #[test]
    fn simple_deserialize() -> Result<(), Error> {
        let pref: IdentifierPrefix = "BAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".parse()?;

        assert_eq!(pref.derivation_code(), "B");
        assert_eq!(pref.derivative().len(), 32);
        assert_eq!(pref.derivative().to_vec(), vec![0u8; 32]);
        Ok(())
    }

    #[test]
    fn length() {
        // correct
        assert!(IdentifierPrefix::from_str("BAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").is_ok());
        assert!(IdentifierPrefix::from_str("EAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").is_ok());

        // too short
        assert!(IdentifierPrefix::from_str("BAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").is_err());

        // too long
        assert!(
            IdentifierPrefix::from_str("BAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").is_err()
        );

        // not a known code
        assert!(IdentifierPrefix::from_str("ZAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").is_err());

        // not base64url
        assert!(
            IdentifierPrefix::from_str("BAAAAAAAAAAAAAAAAAAA/AAAAAAAAAAAAAAAAAAAAAAA").is_err()
        );
    }

    #[test]
    fn simple_serialize() -> Result<(), Error> {
        let pref = BasicPrefix::Ed25519NT(PublicKey::new(
            ed25519_dalek::PublicKey::from_bytes(&[0; 32])?
                .to_bytes()
                .to_vec(),
        ));

        assert_eq!(
            pref.to_str(),
            "BAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"
        );
        Ok(())
    }

    #[test]
    fn round_trip() -> Result<(), Error> {
        let kp = Keypair::generate(&mut OsRng);
        let pref = BasicPrefix::Ed25519(PublicKey::new(kp.public.to_bytes().to_vec()));
        let qb64 = pref.to_str();
        assert_eq!(qb64.len(), 44);
        assert!(qb64.starts_with('D'));
        assert_eq!(BasicPrefix::from_str(&qb64)?, pref);
        Ok(())
    }

    #[test]
    fn verify_signature() -> Result<(), Error> {
        let kp = Keypair::generate(&mut OsRng);
        let pub_key = PublicKey::new(kp.public.to_bytes().to_vec());
        let priv_key = PrivateKey::new(kp.secret.to_bytes().to_vec());

        let data = "hello there".as_bytes();
        let key_prefix = BasicPrefix::Ed25519NT(pub_key);
        let sig_prefix = SelfSigningPrefix::Ed25519Sha512(priv_key.sign_ed(data)?);

        assert!(verify(data, &key_prefix, &sig_prefix)?);
        assert!(!verify(b"tampered", &key_prefix, &sig_prefix)?);

        // malformed signature errors instead of verifying false
        let bad = SelfSigningPrefix::Ed25519Sha512(vec![0u8; 63]);
        assert!(verify(data, &key_prefix, &bad).is_err());
        Ok(())
    }
}
