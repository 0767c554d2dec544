use super::serialization_info::SerializationFormats;
use super::EventMessage;
use crate::derivation::self_addressing::SelfAddressing;
use crate::error::Error;
use crate::event::event_data::{
    EventData, InceptionEvent, InteractionEvent, RotationEvent,
};
use crate::event::sections::{
    key_config::nxt_commitment, seal::Seal, threshold::SignatureThreshold,
    InceptionWitnessConfig, RotationWitnessConfig,
};
use crate::event::KeyEvent;
use crate::prefix::{BasicPrefix, IdentifierPrefix, SelfAddressingPrefix};

/// Assembles a key event and wraps it into a self-addressed message.
pub struct EventMsgBuilder {
    event_type: EventType,
    prefix: IdentifierPrefix,
    sn: u64,
    key_threshold: SignatureThreshold,
    next_key_threshold: SignatureThreshold,
    keys: Vec<BasicPrefix>,
    next_keys: Vec<BasicPrefix>,
    prev_event: SelfAddressingPrefix,
    witness_threshold: SignatureThreshold,
    witnesses: Vec<String>,
    witness_cuts: Vec<String>,
    witness_adds: Vec<String>,
    inception_configuration: Vec<String>,
    data: Vec<Seal>,
    format: SerializationFormats,
    derivation: SelfAddressing,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EventType {
    Inception,
    Rotation,
    Interaction,
}

impl EventType {
    pub fn is_establishment_event(&self) -> bool {
        matches!(self, EventType::Inception | EventType::Rotation)
    }
}

impl EventMsgBuilder {
    pub fn new(event_type: EventType) -> Self {
        EventMsgBuilder {
            event_type,
            prefix: IdentifierPrefix::default(),
            sn: 1,
            key_threshold: SignatureThreshold::default(),
            next_key_threshold: SignatureThreshold::default(),
            keys: vec![],
            next_keys: vec![],
            prev_event: SelfAddressingPrefix::default(),
            witness_threshold: SignatureThreshold(0),
            witnesses: vec![],
            witness_cuts: vec![],
            witness_adds: vec![],
            inception_configuration: vec![],
            data: vec![],
            format: SerializationFormats::JSON,
            derivation: SelfAddressing::Blake3_256,
        }
    }

    pub fn with_prefix(self, prefix: &IdentifierPrefix) -> Self {
        EventMsgBuilder {
            prefix: prefix.clone(),
            ..self
        }
    }

    pub fn with_sn(self, sn: u64) -> Self {
        EventMsgBuilder { sn, ..self }
    }

    pub fn with_keys(self, keys: Vec<BasicPrefix>) -> Self {
        EventMsgBuilder { keys, ..self }
    }

    pub fn with_next_keys(self, next_keys: Vec<BasicPrefix>) -> Self {
        EventMsgBuilder { next_keys, ..self }
    }

    pub fn with_threshold(self, threshold: &SignatureThreshold) -> Self {
        EventMsgBuilder {
            key_threshold: *threshold,
            ..self
        }
    }

    pub fn with_next_threshold(self, threshold: &SignatureThreshold) -> Self {
        EventMsgBuilder {
            next_key_threshold: *threshold,
            ..self
        }
    }

    pub fn with_previous_event(self, prev_event: &SelfAddressingPrefix) -> Self {
        EventMsgBuilder {
            prev_event: prev_event.clone(),
            ..self
        }
    }

    pub fn with_witnesses(self, witnesses: Vec<String>) -> Self {
        EventMsgBuilder { witnesses, ..self }
    }

    pub fn with_witness_threshold(self, threshold: &SignatureThreshold) -> Self {
        EventMsgBuilder {
            witness_threshold: *threshold,
            ..self
        }
    }

    pub fn with_witness_cuts(self, witness_cuts: Vec<String>) -> Self {
        EventMsgBuilder {
            witness_cuts,
            ..self
        }
    }

    pub fn with_witness_adds(self, witness_adds: Vec<String>) -> Self {
        EventMsgBuilder {
            witness_adds,
            ..self
        }
    }

    pub fn with_configuration(self, inception_configuration: Vec<String>) -> Self {
        EventMsgBuilder {
            inception_configuration,
            ..self
        }
    }

    pub fn with_seal(mut self, seals: Vec<Seal>) -> Self {
        self.data.extend(seals);
        EventMsgBuilder { ..self }
    }

    pub fn build(self) -> Result<EventMessage, Error> {
        match self.event_type {
            EventType::Inception => {
                if self.keys.is_empty() {
                    return Err(Error::SemanticError(
                        "Inception requires at least one key".to_string(),
                    ));
                }
                let next_key_hash =
                    nxt_commitment(&self.next_key_threshold, &self.next_keys, &self.derivation);
                InceptionEvent {
                    key_threshold: self.key_threshold,
                    public_keys: self.keys,
                    next_key_threshold: self.next_key_threshold,
                    next_key_hashes: vec![next_key_hash],
                    witness_config: InceptionWitnessConfig {
                        tally: self.witness_threshold,
                        initial_witnesses: self.witnesses,
                    },
                    inception_configuration: self.inception_configuration,
                    data: self.data,
                }
                .incept_self_addressing(self.derivation, self.format)
            }

            EventType::Rotation => {
                if self.keys.is_empty() {
                    return Err(Error::SemanticError(
                        "Rotation requires at least one key".to_string(),
                    ));
                }
                if self.prefix == IdentifierPrefix::default() {
                    return Err(Error::SemanticError(
                        "Rotation requires an identifier prefix".to_string(),
                    ));
                }
                let next_key_hash =
                    nxt_commitment(&self.next_key_threshold, &self.next_keys, &self.derivation);
                EventMessage::new(
                    KeyEvent::new(
                        self.prefix,
                        self.sn,
                        EventData::Rot(RotationEvent {
                            previous_event_hash: self.prev_event,
                            key_threshold: self.key_threshold,
                            public_keys: self.keys,
                            next_key_threshold: self.next_key_threshold,
                            next_key_hashes: vec![next_key_hash],
                            witness_config: RotationWitnessConfig {
                                tally: self.witness_threshold,
                                prune: self.witness_cuts,
                                graft: self.witness_adds,
                            },
                            data: self.data,
                        }),
                    ),
                    self.format,
                    &self.derivation,
                )
            }

            EventType::Interaction => {
                if self.prefix == IdentifierPrefix::default() {
                    return Err(Error::SemanticError(
                        "Interaction requires an identifier prefix".to_string(),
                    ));
                }
                EventMessage::new(
                    KeyEvent::new(
                        self.prefix,
                        self.sn,
                        EventData::Ixn(InteractionEvent {
                            previous_event_hash: self.prev_event,
                            data: self.data,
                        }),
                    ),
                    self.format,
                    &self.derivation,
                )
            }
        }
    }
}
