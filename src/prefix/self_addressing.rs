use super::{decode_derivative, Prefix};
use crate::derivation::{self_addressing::SelfAddressing, DerivationCode};
use crate::error::Error;
use core::fmt::{Display, Formatter};
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct SelfAddressingPrefix {
    pub derivation: SelfAddressing,
    digest: Vec<u8>,
}

impl SelfAddressingPrefix {
    pub fn new(derivation: SelfAddressing, digest: Vec<u8>) -> Self {
        Self { derivation, digest }
    }

    /// True iff this prefix is the digest of `data` under its own
    /// derivation.
    pub fn verify_binding(&self, data: &[u8]) -> bool {
        self.derivation.digest(data) == self.digest
    }
}

impl FromStr for SelfAddressingPrefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code_len = match s.get(..1).ok_or(Error::DeserializationError)? {
            "0" => 2,
            _ => 1,
        };
        let code =
            SelfAddressing::from_str(s.get(..code_len).ok_or(Error::DeserializationError)?)?;
        let derivative = decode_derivative(&code, &s[code_len..])?;
        let expected = code.derivative_b64_len() * 3 / 4;
        if derivative.len() != expected {
            return Err(Error::IncorrectLengthError {
                code: code.to_str(),
                expected,
                got: derivative.len(),
            });
        }
        Ok(Self::new(code, derivative))
    }
}

impl Prefix for SelfAddressingPrefix {
    fn derivative(&self) -> &[u8] {
        &self.digest
    }

    fn derivation_code(&self) -> String {
        self.derivation.to_str()
    }
}

impl Display for SelfAddressingPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl Default for SelfAddressingPrefix {
    fn default() -> Self {
        Self {
            derivation: SelfAddressing::Blake3_256,
            digest: vec![],
        }
    }
}

/// Serde compatible Serialize
impl Serialize for SelfAddressingPrefix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_str())
    }
}

/// Serde compatible Deserialize
impl<'de> Deserialize<'de> for SelfAddressingPrefix {
    fn deserialize<D>(deserializer: D) -> Result<SelfAddressingPrefix, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        SelfAddressingPrefix::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qb64_round_trip() -> Result<(), Error> {
        let dig = SelfAddressing::Blake3_256.derive(b"some data");
        let qb64 = dig.to_str();
        assert_eq!(qb64.len(), 44);
        assert_eq!(SelfAddressingPrefix::from_str(&qb64)?, dig);

        let wide = SelfAddressing::SHA3_512.derive(b"some data");
        let qb64 = wide.to_str();
        assert_eq!(qb64.len(), 88);
        assert_eq!(SelfAddressingPrefix::from_str(&qb64)?, wide);
        Ok(())
    }

    #[test]
    fn rejects_wrong_sizes() {
        assert!(SelfAddressingPrefix::from_str("E").is_err());
        assert!(SelfAddressingPrefix::from_str("EAAA").is_err());
        // 512 bit code with a 256 bit tail
        let mixed = ["0D", &"A".repeat(43)].join("");
        assert!(SelfAddressingPrefix::from_str(&mixed).is_err());
    }
}
