use crate::error::Error;
use crate::event::sections::{
    key_config::nxt_commitment,
    seal::Seal,
    threshold::{self, SignatureThreshold},
    KeyConfig, RotationWitnessConfig,
};
use crate::prefix::{BasicPrefix, SelfAddressingPrefix};
use crate::state::{EventSemantics, IdentifierState, WitnessConfig};
use serde::{Deserialize, Serialize};

/// Rotation Event
///
/// Replaces the current keys with the previously committed successors and
/// publishes a new commitment; may also prune and graft witnesses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RotationEvent {
    #[serde(rename = "p")]
    pub previous_event_hash: SelfAddressingPrefix,

    #[serde(rename = "kt", with = "threshold::hex")]
    pub key_threshold: SignatureThreshold,

    #[serde(rename = "k")]
    pub public_keys: Vec<BasicPrefix>,

    #[serde(rename = "nt", with = "threshold::hex")]
    pub next_key_threshold: SignatureThreshold,

    #[serde(rename = "n")]
    pub next_key_hashes: Vec<SelfAddressingPrefix>,

    #[serde(flatten)]
    pub witness_config: RotationWitnessConfig,

    #[serde(rename = "a")]
    pub data: Vec<Seal>,
}

impl RotationEvent {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.key_threshold.0 > self.public_keys.len() as u64 {
            return Err(Error::SemanticError(
                "Key threshold exceeds the key count".to_string(),
            ));
        }
        if self.next_key_threshold.0 > self.next_key_hashes.len() as u64 {
            return Err(Error::SemanticError(
                "Next key threshold exceeds the commitment count".to_string(),
            ));
        }
        Ok(())
    }
}

impl EventSemantics for RotationEvent {
    fn apply_to(&self, state: IdentifierState) -> Result<IdentifierState, Error> {
        if self.previous_event_hash != state.last_event_digest {
            return Err(Error::PriorDigestMismatch);
        }
        // the new keys must hash to the commitment published by the
        // previous establishment event
        match state.current.next_key_hashes.as_slice() {
            [committed] => {
                let computed = nxt_commitment(
                    &self.next_key_threshold,
                    &self.public_keys,
                    &committed.derivation,
                );
                if &computed != committed {
                    return Err(Error::NextKeysMismatch);
                }
            }
            _ => return Err(Error::NextKeysMismatch),
        }

        let mut witnesses: Vec<String> = state
            .witness_config
            .witnesses
            .iter()
            .filter(|witness| !self.witness_config.prune.contains(witness))
            .cloned()
            .collect();
        for witness in &self.witness_config.graft {
            if !witnesses.contains(witness) {
                witnesses.push(witness.clone());
            }
        }

        Ok(IdentifierState {
            current: KeyConfig {
                threshold: self.key_threshold,
                public_keys: self.public_keys.clone(),
                next_threshold: self.next_key_threshold,
                next_key_hashes: self.next_key_hashes.clone(),
            },
            witness_config: WitnessConfig {
                tally: self.witness_config.tally,
                witnesses,
            },
            ..state
        })
    }
}
