use crate::derivation::DerivationCode;
use crate::error::Error;
use crate::prefix::SelfSigningPrefix;
use core::str::FromStr;

/// Self Signing Derivations
///
/// A self-signing prefix derivation outputs a signature as its derivative.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum SelfSigning {
    Ed25519Sha512,
}

impl SelfSigning {
    pub fn derive(&self, sig: Vec<u8>) -> SelfSigningPrefix {
        match self {
            Self::Ed25519Sha512 => SelfSigningPrefix::Ed25519Sha512(sig),
        }
    }
}

impl DerivationCode for SelfSigning {
    fn code_len(&self) -> usize {
        2
    }

    fn derivative_b64_len(&self) -> usize {
        86
    }

    fn to_str(&self) -> String {
        match self {
            Self::Ed25519Sha512 => "0B",
        }
        .to_string()
    }
}

impl FromStr for SelfSigning {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0B" => Ok(Self::Ed25519Sha512),
            _ => Err(Error::UnknownCodeError(s.to_string())),
        }
    }
}
