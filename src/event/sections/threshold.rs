use serde::{Deserialize, Serialize};

/// Signature threshold of a key or witness configuration.
///
/// The wire form is asymmetric by design: inception events carry
/// thresholds as decimal strings, rotation events as lowercase hex. Both
/// codecs live here; event structs pick one with `#[serde(with = …)]`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureThreshold(pub u64);

impl SignatureThreshold {
    pub fn new(t: u64) -> Self {
        Self(t)
    }

    pub fn enough_signatures(&self, indexes: &[usize]) -> bool {
        indexes.len() as u64 >= self.0
    }
}

impl Default for SignatureThreshold {
    fn default() -> Self {
        Self(1)
    }
}

pub mod dec {
    use super::SignatureThreshold;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(t: &SignatureThreshold, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&t.0.to_string())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<SignatureThreshold, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        s.parse::<u64>()
            .map(SignatureThreshold)
            .map_err(serde::de::Error::custom)
    }
}

pub mod hex {
    use super::SignatureThreshold;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(t: &SignatureThreshold, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&format!("{:x}", t.0))
    }

    pub fn deserialize<'de, D>(d: D) -> Result<SignatureThreshold, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        u64::from_str_radix(&s, 16)
            .map(SignatureThreshold)
            .map_err(serde::de::Error::custom)
    }
}
