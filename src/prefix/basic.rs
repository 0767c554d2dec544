use super::{decode_derivative, verify, Prefix, SelfSigningPrefix};
use crate::derivation::{basic::Basic, DerivationCode};
use crate::error::Error;
use crate::keys::PublicKey;
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub enum BasicPrefix {
    Ed25519NT(PublicKey),
    Ed25519(PublicKey),
}

impl BasicPrefix {
    pub fn new(code: Basic, public_key: PublicKey) -> Self {
        match code {
            Basic::Ed25519NT => Self::Ed25519NT(public_key),
            Basic::Ed25519 => Self::Ed25519(public_key),
        }
    }

    pub fn derivation(&self) -> Basic {
        match self {
            Self::Ed25519NT(_) => Basic::Ed25519NT,
            Self::Ed25519(_) => Basic::Ed25519,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::Ed25519NT(pk) | Self::Ed25519(pk) => pk.clone(),
        }
    }

    pub fn is_transferable(&self) -> bool {
        self.derivation().is_transferable()
    }

    pub fn verify(&self, data: &[u8], signature: &SelfSigningPrefix) -> Result<bool, Error> {
        verify(data, self, signature)
    }
}

impl FromStr for BasicPrefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = Basic::from_str(s.get(..1).ok_or(Error::DeserializationError)?)?;
        let derivative = decode_derivative(&code, &s[1..])?;
        if derivative.len() != 32 {
            return Err(Error::IncorrectLengthError {
                code: code.to_str(),
                expected: 32,
                got: derivative.len(),
            });
        }
        Ok(code.derive(PublicKey::new(derivative)))
    }
}

impl Prefix for BasicPrefix {
    fn derivative(&self) -> &[u8] {
        match self {
            Self::Ed25519NT(pk) | Self::Ed25519(pk) => pk.key_ref(),
        }
    }

    fn derivation_code(&self) -> String {
        self.derivation().to_str()
    }
}

/// Serde compatible Serialize
impl Serialize for BasicPrefix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_str())
    }
}

/// Serde compatible Deserialize
impl<'de> Deserialize<'de> for BasicPrefix {
    fn deserialize<D>(deserializer: D) -> Result<BasicPrefix, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        BasicPrefix::from_str(&s).map_err(serde::de::Error::custom)
    }
}
