use super::{decode_derivative, Prefix};
use crate::derivation::{self_signing::SelfSigning, DerivationCode};
use crate::error::Error;
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub enum SelfSigningPrefix {
    Ed25519Sha512(Vec<u8>),
}

impl SelfSigningPrefix {
    pub fn derivation(&self) -> SelfSigning {
        match self {
            Self::Ed25519Sha512(_) => SelfSigning::Ed25519Sha512,
        }
    }

    pub fn signature(&self) -> &[u8] {
        match self {
            Self::Ed25519Sha512(sig) => sig,
        }
    }
}

impl FromStr for SelfSigningPrefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = SelfSigning::from_str(s.get(..2).ok_or(Error::DeserializationError)?)?;
        let derivative = decode_derivative(&code, &s[2..])?;
        if derivative.len() != 64 {
            return Err(Error::IncorrectLengthError {
                code: code.to_str(),
                expected: 64,
                got: derivative.len(),
            });
        }
        Ok(code.derive(derivative))
    }
}

impl Prefix for SelfSigningPrefix {
    fn derivative(&self) -> &[u8] {
        self.signature()
    }

    fn derivation_code(&self) -> String {
        self.derivation().to_str()
    }
}

/// Serde compatible Serialize
impl Serialize for SelfSigningPrefix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_str())
    }
}

/// Serde compatible Deserialize
impl<'de> Deserialize<'de> for SelfSigningPrefix {
    fn deserialize<D>(deserializer: D) -> Result<SelfSigningPrefix, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        SelfSigningPrefix::from_str(&s).map_err(serde::de::Error::custom)
    }
}
