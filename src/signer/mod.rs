use crate::derivation::self_signing::SelfSigning;
use crate::error::Error;
use crate::prefix::{derive, BasicPrefix, Prefix, SeedPrefix, SelfSigningPrefix};
use core::str::FromStr;
use rand::{rngs::OsRng, RngCore};

/// An Ed25519 signing identity: a seed plus the transferability of the
/// prefixes derived from it. Transferable signers derive "D" prefixes,
/// non-transferable ones "B".
#[derive(Debug, PartialEq, Clone)]
pub struct Signer {
    seed: SeedPrefix,
    transferable: bool,
}

impl Signer {
    /// Fresh signer with a seed drawn from the OS cryptographic source.
    pub fn new(transferable: bool) -> Self {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        Signer {
            seed: SeedPrefix::RandomSeed256Ed25519(seed.to_vec()),
            transferable,
        }
    }

    pub fn from_seed(seed: SeedPrefix, transferable: bool) -> Result<Self, Error> {
        if seed.derivative().len() != 32 {
            return Err(Error::IncorrectLengthError {
                code: seed.derivation_code(),
                expected: 32,
                got: seed.derivative().len(),
            });
        }
        Ok(Signer { seed, transferable })
    }

    /// Imports a signer from the qb64 form of its seed (code "A").
    pub fn import(qb64: &str, transferable: bool) -> Result<Self, Error> {
        Self::from_seed(SeedPrefix::from_str(qb64)?, transferable)
    }

    pub fn seed(&self) -> &SeedPrefix {
        &self.seed
    }

    pub fn is_transferable(&self) -> bool {
        self.transferable
    }

    /// The basic prefix of the derived verification key.
    pub fn public_key(&self) -> Result<BasicPrefix, Error> {
        derive(&self.seed, self.transferable)
    }

    /// Deterministic Ed25519 signature over `msg`.
    pub fn sign(&self, msg: &[u8]) -> Result<SelfSigningPrefix, Error> {
        let (_, private_key) = self.seed.derive_key_pair()?;
        Ok(SelfSigning::Ed25519Sha512.derive(private_key.sign_ed(msg)?))
    }
}
