use crate::error::Error;
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub enum SerializationFormats {
    JSON,
    MGPK,
    CBOR,
}

impl SerializationFormats {
    pub fn encode<T: Serialize>(&self, message: &T) -> Result<Vec<u8>, Error> {
        match self {
            Self::JSON => serde_json::to_vec(message).map_err(|e| e.into()),
            Self::CBOR => serde_cbor::to_vec(message).map_err(|e| e.into()),
            Self::MGPK => Err(Error::SerializationError(
                "MessagePack unimplemented".to_string(),
            )),
        }
    }

    pub fn to_str(&self) -> String {
        match self {
            Self::JSON => "JSON",
            Self::CBOR => "CBOR",
            Self::MGPK => "MGPK",
        }
        .to_string()
    }
}

impl FromStr for SerializationFormats {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JSON" => Ok(SerializationFormats::JSON),
            "MGPK" => Ok(SerializationFormats::MGPK),
            "CBOR" => Ok(SerializationFormats::CBOR),
            _ => Err(Error::DeserializationError),
        }
    }
}

/// Serialization Information
///
/// Encodes the protocol version, the serialization kind and the byte size
/// of the event, e.g. "KERI10JSON000159_". The size is six zero-padded
/// decimal digits and always equals the length of the serialized event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializationInfo {
    pub major_version: u8,
    pub minor_version: u8,
    pub size: usize,
    pub kind: SerializationFormats,
}

impl SerializationInfo {
    pub fn new(kind: &SerializationFormats, size: usize) -> Self {
        Self {
            major_version: 1,
            minor_version: 0,
            size,
            kind: *kind,
        }
    }

    pub fn to_str(&self) -> String {
        format!(
            "KERI{:x}{:x}{}{:06}_",
            self.major_version,
            self.minor_version,
            self.kind.to_str(),
            self.size
        )
    }
}

impl FromStr for SerializationInfo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 17 || !s.is_ascii() || !s.ends_with('_') {
            return Err(Error::DeserializationError);
        }
        match &s[..4] {
            "KERI" => Ok(Self {
                major_version: u8::from_str_radix(&s[4..5], 16)?,
                minor_version: u8::from_str_radix(&s[5..6], 16)?,
                kind: SerializationFormats::from_str(&s[6..10])?,
                size: s[10..16].parse()?,
            }),
            _ => Err(Error::DeserializationError),
        }
    }
}

/// Serde compatible Serialize
impl Serialize for SerializationInfo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_str())
    }
}

/// Serde compatible Deserialize
impl<'de> Deserialize<'de> for SerializationInfo {
    fn deserialize<D>(deserializer: D) -> Result<SerializationInfo, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        SerializationInfo::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Default for SerializationInfo {
    fn default() -> Self {
        Self {
            major_version: 1,
            minor_version: 0,
            size: 0,
            kind: SerializationFormats::JSON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_serialize() {
        let info = SerializationInfo::new(&SerializationFormats::JSON, 100);
        assert_eq!("KERI10JSON000100_".to_string(), info.to_str());
    }

    #[test]
    fn basic_deserialize() -> Result<(), Error> {
        let info = SerializationInfo::from_str("KERI10JSON000159_")?;
        assert_eq!(info.kind, SerializationFormats::JSON);
        assert_eq!(info.major_version, 1);
        assert_eq!(info.minor_version, 0);
        assert_eq!(info.size, 159);
        Ok(())
    }

    #[test]
    fn round_trip() -> Result<(), Error> {
        let info = SerializationInfo::new(&SerializationFormats::JSON, 42);
        assert_eq!(SerializationInfo::from_str(&info.to_str())?, info);
        Ok(())
    }

    #[test]
    fn malformed_version_strings() {
        assert!(SerializationInfo::from_str("XERI10JSON000100_").is_err());
        assert!(SerializationInfo::from_str("KERI10JSON000100").is_err());
        assert!(SerializationInfo::from_str("KERI10JSON0001_").is_err());
        assert!(SerializationInfo::from_str("KERI10YAML000100_").is_err());
        assert!(SerializationInfo::from_str("KERI10JSON00a100_").is_err());
    }
}
