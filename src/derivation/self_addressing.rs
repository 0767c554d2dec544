use crate::derivation::DerivationCode;
use crate::error::Error;
use crate::prefix::SelfAddressingPrefix;
use blake2::{
    digest::{Update, VariableOutput},
    Blake2b, Blake2s, Digest, VarBlake2b,
};
use core::str::FromStr;
use sha2::{Sha256, Sha512};
use sha3::{Sha3_256, Sha3_512};

/// Self Addressing Derivations
///
/// A self-addressing derivation is a digest of some serialized data; the
/// event pipeline always derives with Blake3-256.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum SelfAddressing {
    Blake3_256,
    Blake2B256,
    Blake2S256,
    SHA3_256,
    SHA2_256,
    Blake3_512,
    SHA3_512,
    Blake2B512,
    SHA2_512,
}

impl SelfAddressing {
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Blake3_256 => blake3_256_digest(data),
            Self::Blake2B256 => blake2b_256_digest(data),
            Self::Blake2S256 => blake2s_256_digest(data),
            Self::SHA3_256 => sha3_256_digest(data),
            Self::SHA2_256 => sha2_256_digest(data),
            Self::Blake3_512 => blake3_512_digest(data),
            Self::SHA3_512 => sha3_512_digest(data),
            Self::Blake2B512 => blake2b_512_digest(data),
            Self::SHA2_512 => sha2_512_digest(data),
        }
    }

    pub fn derive(&self, data: &[u8]) -> SelfAddressingPrefix {
        SelfAddressingPrefix::new(*self, self.digest(data))
    }
}

impl DerivationCode for SelfAddressing {
    fn code_len(&self) -> usize {
        match self {
            Self::Blake3_256
            | Self::Blake2B256
            | Self::Blake2S256
            | Self::SHA3_256
            | Self::SHA2_256 => 1,
            Self::Blake3_512 | Self::SHA3_512 | Self::Blake2B512 | Self::SHA2_512 => 2,
        }
    }

    fn derivative_b64_len(&self) -> usize {
        match self {
            Self::Blake3_256
            | Self::Blake2B256
            | Self::Blake2S256
            | Self::SHA3_256
            | Self::SHA2_256 => 43,
            Self::Blake3_512 | Self::SHA3_512 | Self::Blake2B512 | Self::SHA2_512 => 86,
        }
    }

    fn to_str(&self) -> String {
        match self {
            Self::Blake3_256 => "E",
            Self::Blake2B256 => "F",
            Self::Blake2S256 => "G",
            Self::SHA3_256 => "H",
            Self::SHA2_256 => "I",
            Self::Blake3_512 => "0D",
            Self::SHA3_512 => "0E",
            Self::Blake2B512 => "0F",
            Self::SHA2_512 => "0G",
        }
        .to_string()
    }
}

impl FromStr for SelfAddressing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "E" => Ok(Self::Blake3_256),
            "F" => Ok(Self::Blake2B256),
            "G" => Ok(Self::Blake2S256),
            "H" => Ok(Self::SHA3_256),
            "I" => Ok(Self::SHA2_256),
            "0D" => Ok(Self::Blake3_512),
            "0E" => Ok(Self::SHA3_512),
            "0F" => Ok(Self::Blake2B512),
            "0G" => Ok(Self::SHA2_512),
            _ => Err(Error::UnknownCodeError(s.to_string())),
        }
    }
}

fn blake3_256_digest(input: &[u8]) -> Vec<u8> {
    blake3::hash(input).as_bytes().to_vec()
}

fn blake2b_256_digest(input: &[u8]) -> Vec<u8> {
    // Blake2b is parameterized to a 32 byte output here, it is not a
    // truncation of the 64 byte form.
    let mut hasher = VarBlake2b::new(32).expect("32 is a valid Blake2b output size");
    hasher.update(input);
    hasher.finalize_boxed().to_vec()
}

fn blake2s_256_digest(input: &[u8]) -> Vec<u8> {
    let mut hasher = Blake2s::new();
    Digest::update(&mut hasher, input);
    hasher.finalize().to_vec()
}

fn blake2b_512_digest(input: &[u8]) -> Vec<u8> {
    let mut hasher = Blake2b::new();
    Digest::update(&mut hasher, input);
    hasher.finalize().to_vec()
}

fn blake3_512_digest(input: &[u8]) -> Vec<u8> {
    let mut out = [0u8; 64];
    let mut hasher = blake3::Hasher::new();
    hasher.update(input);
    hasher.finalize_xof().fill(&mut out);
    out.to_vec()
}

fn sha3_256_digest(input: &[u8]) -> Vec<u8> {
    let mut hasher = Sha3_256::new();
    Digest::update(&mut hasher, input);
    hasher.finalize().to_vec()
}

fn sha2_256_digest(input: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    Digest::update(&mut hasher, input);
    hasher.finalize().to_vec()
}

fn sha3_512_digest(input: &[u8]) -> Vec<u8> {
    let mut hasher = Sha3_512::new();
    Digest::update(&mut hasher, input);
    hasher.finalize().to_vec()
}

fn sha2_512_digest(input: &[u8]) -> Vec<u8> {
    let mut hasher = Sha512::new();
    Digest::update(&mut hasher, input);
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefix::Prefix;

    #[test]
    fn digest_lengths() {
        let data = b"abcdefghijklmnopqrstuvwxyz0123456789";
        for code in &[
            SelfAddressing::Blake3_256,
            SelfAddressing::Blake2B256,
            SelfAddressing::Blake2S256,
            SelfAddressing::SHA3_256,
            SelfAddressing::SHA2_256,
        ] {
            assert_eq!(code.digest(data).len(), 32);
            assert_eq!(code.derive(data).to_str().len(), 44);
        }
        for code in &[
            SelfAddressing::Blake3_512,
            SelfAddressing::SHA3_512,
            SelfAddressing::Blake2B512,
            SelfAddressing::SHA2_512,
        ] {
            assert_eq!(code.digest(data).len(), 64);
            assert_eq!(code.derive(data).to_str().len(), 88);
        }
    }

    #[test]
    fn blake3_binding() {
        let data = b"hello there";
        let dig = SelfAddressing::Blake3_256.derive(data);
        assert!(dig.verify_binding(data));
        assert!(!dig.verify_binding(b"hello their"));
        assert!(dig.to_str().starts_with('E'));
    }

    #[test]
    fn code_round_trip() -> Result<(), Error> {
        for code in &["E", "F", "G", "H", "I", "0D", "0E", "0F", "0G"] {
            assert_eq!(&SelfAddressing::from_str(code)?.to_str(), code);
        }
        assert!(SelfAddressing::from_str("Z").is_err());
        Ok(())
    }
}
