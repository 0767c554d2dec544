use crate::derivation::DerivationCode;
use crate::error::Error;
use crate::keys::PublicKey;
use crate::prefix::BasicPrefix;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Basic Derivations
///
/// A basic prefix derivation wraps a public key. Non-transferable keys are
/// bound to the identifier forever, transferable ones may be rotated away.
#[derive(
    Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize,
)]
pub enum Basic {
    Ed25519NT,
    Ed25519,
}

impl Basic {
    pub fn derive(&self, public_key: PublicKey) -> BasicPrefix {
        BasicPrefix::new(*self, public_key)
    }

    pub fn is_transferable(&self) -> bool {
        matches!(self, Self::Ed25519)
    }
}

impl DerivationCode for Basic {
    fn code_len(&self) -> usize {
        1
    }

    fn derivative_b64_len(&self) -> usize {
        43
    }

    fn to_str(&self) -> String {
        match self {
            Self::Ed25519NT => "B",
            Self::Ed25519 => "D",
        }
        .to_string()
    }
}

impl FromStr for Basic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "B" => Ok(Self::Ed25519NT),
            "D" => Ok(Self::Ed25519),
            _ => Err(Error::UnknownCodeError(s.to_string())),
        }
    }
}
