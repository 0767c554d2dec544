use super::EventData;
use crate::derivation::self_addressing::SelfAddressing;
use crate::error::Error;
use crate::event::sections::{
    seal::Seal,
    threshold::{self, SignatureThreshold},
    InceptionWitnessConfig, KeyConfig,
};
use crate::event::KeyEvent;
use crate::event_message::{
    dummy_event::DummyInceptionEvent, serialization_info::SerializationFormats,
    serialization_info::SerializationInfo, EventMessage, EventTypeTag,
};
use crate::prefix::{BasicPrefix, IdentifierPrefix, SelfAddressingPrefix};
use crate::state::{EventSemantics, IdentifierState};
use serde::{Deserialize, Serialize};

/// Inception Event
///
/// Establishes an identifier: the initial signing keys, the pre-rotation
/// commitment, the witness set and the configuration traits.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InceptionEvent {
    #[serde(rename = "kt", with = "threshold::dec")]
    pub key_threshold: SignatureThreshold,

    #[serde(rename = "k")]
    pub public_keys: Vec<BasicPrefix>,

    #[serde(rename = "nt", with = "threshold::dec")]
    pub next_key_threshold: SignatureThreshold,

    #[serde(rename = "n")]
    pub next_key_hashes: Vec<SelfAddressingPrefix>,

    #[serde(flatten)]
    pub witness_config: InceptionWitnessConfig,

    #[serde(rename = "c")]
    pub inception_configuration: Vec<String>,

    #[serde(rename = "a")]
    pub data: Vec<Seal>,
}

/// Trait in the `c` list restricting an identifier to establishment
/// events.
pub const ESTABLISHMENT_ONLY_TRAIT: &str = "EO";

impl InceptionEvent {
    /// Incept Self Addressing
    ///
    /// Derives the self-addressing identifier over the dummy form of this
    /// inception data and wraps it in an event message whose prefix equals
    /// that digest.
    pub fn incept_self_addressing(
        self,
        derivation: SelfAddressing,
        format: SerializationFormats,
    ) -> Result<EventMessage, Error> {
        let dummy = DummyInceptionEvent::dummy_inception_data(self.clone(), &derivation, format)?;
        let digest = derivation.derive(&dummy);

        Ok(EventMessage {
            serialization_info: SerializationInfo::new(&format, dummy.len()),
            event_type: EventTypeTag::Icp,
            digest: digest.clone(),
            event: KeyEvent::new(
                IdentifierPrefix::SelfAddressing(digest),
                0,
                EventData::Icp(self),
            ),
        })
    }

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
        if self.witness_config.tally.0 > self.witness_config.initial_witnesses.len() as u64 {
            return Err(Error::SemanticError(
                "Witness threshold exceeds the witness count".to_string(),
            ));
        }
        Ok(())
    }
}

impl EventSemantics for InceptionEvent {
    fn apply_to(&self, state: IdentifierState) -> Result<IdentifierState, Error> {
        Ok(IdentifierState {
            current: KeyConfig {
                threshold: self.key_threshold,
                public_keys: self.public_keys.clone(),
                next_threshold: self.next_key_threshold,
                next_key_hashes: self.next_key_hashes.clone(),
            },
            witness_config: self.witness_config.clone().into(),
            establishment_only: self
                .inception_configuration
                .iter()
                .any(|trait_| trait_ == ESTABLISHMENT_ONLY_TRAIT),
            ..state
        })
    }
}
