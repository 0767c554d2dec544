use super::{decode_derivative, Prefix, SelfSigningPrefix};
use crate::derivation::{
    attached_signature_code::AttachedSignatureCode, self_signing::SelfSigning, DerivationCode,
};
use crate::error::Error;
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A signature together with the index of the key that produced it within
/// the signing key configuration.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct AttachedSignaturePrefix {
    pub index: u16,
    pub signature: SelfSigningPrefix,
}

impl AttachedSignaturePrefix {
    pub fn new(code: SelfSigning, signature: Vec<u8>, index: u16) -> Self {
        Self {
            index,
            signature: code.derive(signature),
        }
    }
}

impl FromStr for AttachedSignaturePrefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code =
            AttachedSignatureCode::from_str(s.get(..2).ok_or(Error::DeserializationError)?)?;
        let derivative = decode_derivative(&code, &s[2..])?;
        Ok(Self {
            index: code.index,
            signature: code.code.derive(derivative),
        })
    }
}

impl Prefix for AttachedSignaturePrefix {
    fn derivative(&self) -> &[u8] {
        self.signature.signature()
    }

    fn derivation_code(&self) -> String {
        AttachedSignatureCode::new(self.signature.derivation(), self.index).to_str()
    }
}

/// Serde compatible Serialize
impl Serialize for AttachedSignaturePrefix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_str())
    }
}

/// Serde compatible Deserialize
impl<'de> Deserialize<'de> for AttachedSignaturePrefix {
    fn deserialize<D>(deserializer: D) -> Result<AttachedSignaturePrefix, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        AttachedSignaturePrefix::from_str(&s).map_err(serde::de::Error::custom)
    }
}
