use crate::derivation::{self_signing::SelfSigning, DerivationCode};
use crate::error::Error;
use core::str::FromStr;

/// Attached Signature Derivation Codes
///
/// Binds a signature to the index of its key within the current key
/// configuration when signatures are stored alongside an event.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct AttachedSignatureCode {
    pub index: u16,
    pub code: SelfSigning,
}

impl AttachedSignatureCode {
    pub fn new(code: SelfSigning, index: u16) -> Self {
        Self { index, code }
    }
}

impl DerivationCode for AttachedSignatureCode {
    fn code_len(&self) -> usize {
        match self.code {
            SelfSigning::Ed25519Sha512 => 2,
        }
    }

    fn derivative_b64_len(&self) -> usize {
        match self.code {
            SelfSigning::Ed25519Sha512 => 86,
        }
    }

    fn to_str(&self) -> String {
        match self.code {
            SelfSigning::Ed25519Sha512 => ["A", &num_to_b64(self.index)].join(""),
        }
    }
}

impl FromStr for AttachedSignatureCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.get(..1).ok_or(Error::DeserializationError)? {
            "A" => Ok(Self::new(
                SelfSigning::Ed25519Sha512,
                b64_to_num(s.as_bytes().get(1).ok_or(Error::DeserializationError)?)?,
            )),
            _ => Err(Error::UnknownCodeError(s.to_string())),
        }
    }
}

/// Maps an index in [0,63] to its base64url character.
pub(crate) fn num_to_b64(num: u16) -> String {
    match num {
        n if n < 26 => (b'A' + n as u8) as char,
        n if n < 52 => (b'a' + (n - 26) as u8) as char,
        n if n < 62 => (b'0' + (n - 52) as u8) as char,
        62 => '-',
        _ => '_',
    }
    .to_string()
}

pub(crate) fn b64_to_num(b: &u8) -> Result<u16, Error> {
    match b {
        b'A'..=b'Z' => Ok((b - b'A') as u16),
        b'a'..=b'z' => Ok((b - b'a') as u16 + 26),
        b'0'..=b'9' => Ok((b - b'0') as u16 + 52),
        b'-' => Ok(62),
        b'_' => Ok(63),
        _ => Err(Error::DeserializationError),
    }
}
