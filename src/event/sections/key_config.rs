use super::threshold::SignatureThreshold;
use crate::derivation::self_addressing::SelfAddressing;
use crate::error::Error;
use crate::prefix::{AttachedSignaturePrefix, BasicPrefix, Prefix, SelfAddressingPrefix};
use serde::{Deserialize, Serialize};

/// The key material carried in identifier state: current keys and
/// threshold plus the commitment to their successors.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct KeyConfig {
    #[serde(rename = "kt")]
    pub threshold: SignatureThreshold,

    #[serde(rename = "k")]
    pub public_keys: Vec<BasicPrefix>,

    #[serde(rename = "nt")]
    pub next_threshold: SignatureThreshold,

    #[serde(rename = "n")]
    pub next_key_hashes: Vec<SelfAddressingPrefix>,
}

impl KeyConfig {
    pub fn new(
        public_keys: Vec<BasicPrefix>,
        threshold: Option<SignatureThreshold>,
        next_threshold: SignatureThreshold,
        next_key_hashes: Vec<SelfAddressingPrefix>,
    ) -> Self {
        Self {
            threshold: threshold.unwrap_or_default(),
            public_keys,
            next_threshold,
            next_key_hashes,
        }
    }

    /// Verify
    ///
    /// Verifies the given sigs against the given message using the
    /// configured public keys, addressed by the signature indexes.
    pub fn verify(&self, message: &[u8], sigs: &[AttachedSignaturePrefix]) -> Result<bool, Error> {
        let mut seen = vec![0u64; self.public_keys.len()];
        for sig in sigs {
            match seen.get_mut(sig.index as usize) {
                Some(n) => *n += 1,
                None => {
                    return Err(Error::SemanticError(
                        "Key index not present in set".to_string(),
                    ))
                }
            }
        }
        if seen.iter().any(|n| *n > 1) {
            return Err(Error::DuplicateSignature);
        }
        if sigs.len() > self.public_keys.len() {
            return Err(Error::TooManySignatures);
        }
        if !self
            .threshold
            .enough_signatures(&sigs.iter().map(|sig| sig.index as usize).collect::<Vec<_>>())
        {
            return Err(Error::NotEnoughSigsError);
        }
        for sig in sigs {
            let key = self
                .public_keys
                .get(sig.index as usize)
                .ok_or_else(|| Error::SemanticError("Key index not present in set".to_string()))?;
            if !key.verify(message, &sig.signature)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Verify Next
    ///
    /// Checks that a successor key set and threshold match the commitment
    /// published in this configuration's next-keys digest list.
    pub fn verify_next(&self, threshold: &SignatureThreshold, keys: &[BasicPrefix]) -> bool {
        match self.next_key_hashes.as_slice() {
            [committed] => committed == &nxt_commitment(threshold, keys, &committed.derivation),
            _ => false,
        }
    }

    /// Serialize For Next
    ///
    /// The commitment this configuration would publish for its own keys.
    pub fn commit(&self, derivation: &SelfAddressing) -> SelfAddressingPrefix {
        nxt_commitment(&self.threshold, &self.public_keys, derivation)
    }
}

/// Serialize For Commitment
///
/// Digest commitment over a successor key configuration: the lowercase hex
/// of the threshold concatenated with the sorted qb64 keys.
pub fn nxt_commitment(
    threshold: &SignatureThreshold,
    keys: &[BasicPrefix],
    derivation: &SelfAddressing,
) -> SelfAddressingPrefix {
    let mut sorted: Vec<String> = keys.iter().map(|key| key.to_str()).collect();
    sorted.sort();
    let data = [format!("{:x}", threshold.0), sorted.concat()].concat();
    derivation.derive(data.as_bytes())
}
