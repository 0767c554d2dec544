pub mod dummy_event;
pub mod event_msg_builder;
pub mod serialization_info;
pub mod signed_event_message;

use crate::derivation::self_addressing::SelfAddressing;
use crate::error::Error;
use crate::event::event_data::EventData;
use crate::event::KeyEvent;
use crate::prefix::{AttachedSignaturePrefix, IdentifierPrefix, SelfAddressingPrefix};
use crate::state::{EventSemantics, IdentifierState};
use dummy_event::DummyEventMessage;
use serde::{Deserialize, Serialize, Serializer};
use serialization_info::{SerializationFormats, SerializationInfo};
use signed_event_message::SignedEventMessage;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EventTypeTag {
    Icp,
    Rot,
    Ixn,
    // recognized but refused: delegation is a future extension
    Dip,
    Drt,
}

impl EventTypeTag {
    pub fn is_establishment_event(&self) -> bool {
        matches!(
            self,
            EventTypeTag::Icp | EventTypeTag::Rot | EventTypeTag::Dip | EventTypeTag::Drt
        )
    }

    pub fn to_str(&self) -> String {
        match self {
            Self::Icp => "icp",
            Self::Rot => "rot",
            Self::Ixn => "ixn",
            Self::Dip => "dip",
            Self::Drt => "drt",
        }
        .to_string()
    }
}

/// A complete key event: version string, type tag and self-addressing
/// digest wrapped around the event body. Field order on the wire is
/// v, t, d, i, s, then the type-specific fields.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct EventMessage {
    /// Serialization Information
    ///
    /// Encodes the version, size and serialization format of the event
    #[serde(rename = "v")]
    pub serialization_info: SerializationInfo,

    #[serde(rename = "t")]
    pub event_type: EventTypeTag,

    /// Digest of the event
    ///
    /// While computing the digest, this field is replaced with a sequence
    /// of `#` of the same length, then the computed digest is inserted.
    #[serde(rename = "d")]
    pub digest: SelfAddressingPrefix,

    #[serde(flatten)]
    pub event: KeyEvent,
}

impl EventMessage {
    /// Wraps a non-inception event, deriving its size and digest over the
    /// dummy serialization. Inceptions go through
    /// `InceptionEvent::incept_self_addressing` instead, which also sets
    /// the prefix.
    pub fn new(
        event: KeyEvent,
        format: SerializationFormats,
        derivation: &SelfAddressing,
    ) -> Result<Self, Error> {
        let dummy = DummyEventMessage::dummy_event(event.clone(), format, derivation)?;
        Ok(Self {
            serialization_info: SerializationInfo::new(&format, dummy.len()),
            event_type: (&event.event_data).into(),
            digest: derivation.derive(&dummy),
            event,
        })
    }

    pub fn serialization(&self) -> SerializationFormats {
        self.serialization_info.kind
    }

    /// Serialize
    ///
    /// Returns the canonical serialized form of the event message.
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        self.serialization().encode(self)
    }

    pub fn sign(&self, signatures: Vec<AttachedSignaturePrefix>) -> SignedEventMessage {
        SignedEventMessage::new(self, signatures)
    }

    /// Recomputes the digest over the dummy form and compares it with the
    /// embedded one.
    pub fn check_digest(&self) -> Result<bool, Error> {
        let derivation_data =
            DummyEventMessage::derivation_data(self, &self.digest.derivation)?;
        Ok(self.digest.verify_binding(&derivation_data))
    }

    /// Structural validation: type tag consistency, sequence parity,
    /// threshold bounds, declared size and digest binding.
    pub fn validate(&self) -> Result<(), Error> {
        if matches!(self.event_type, EventTypeTag::Dip | EventTypeTag::Drt) {
            return Err(Error::UnsupportedEventType(self.event_type.to_str()));
        }
        let tag: EventTypeTag = (&self.event.event_data).into();
        if tag != self.event_type {
            return Err(Error::SemanticError(
                "Event type tag does not match event data".to_string(),
            ));
        }
        match &self.event.event_data {
            EventData::Icp(icp) => {
                if self.event.sn != 0 {
                    return Err(Error::SemanticError(
                        "Inception must occur at sn 0".to_string(),
                    ));
                }
                if self.event.prefix != IdentifierPrefix::SelfAddressing(self.digest.clone()) {
                    return Err(Error::SemanticError(
                        "Inception prefix must equal the event digest".to_string(),
                    ));
                }
                icp.validate()?;
            }
            EventData::Rot(rot) => {
                if self.event.sn == 0 {
                    return Err(Error::SemanticError(
                        "Rotation cannot occur at sn 0".to_string(),
                    ));
                }
                rot.validate()?;
            }
            EventData::Ixn(_) => {
                if self.event.sn == 0 {
                    return Err(Error::SemanticError(
                        "Interaction cannot occur at sn 0".to_string(),
                    ));
                }
            }
        }
        let encoded = self.serialize()?;
        if encoded.len() != self.serialization_info.size {
            return Err(Error::SemanticError(format!(
                "Version string declares {} bytes but the event serializes to {}",
                self.serialization_info.size,
                encoded.len()
            )));
        }
        if !self.check_digest()? {
            return Err(Error::SemanticError(
                "Event digest does not match its contents".to_string(),
            ));
        }
        Ok(())
    }
}

impl Serialize for EventMessage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Helper struct placing the `t` and `d` fields between the version
        // string and the flattened event body
        #[derive(Serialize)]
        struct TypedEventMessage<'a> {
            #[serde(rename = "v")]
            serialization_info: &'a SerializationInfo,

            #[serde(rename = "t")]
            event_type: &'a EventTypeTag,

            #[serde(rename = "d")]
            digest: &'a SelfAddressingPrefix,

            #[serde(flatten)]
            event: &'a KeyEvent,
        }

        TypedEventMessage {
            serialization_info: &self.serialization_info,
            event_type: &self.event_type,
            digest: &self.digest,
            event: &self.event,
        }
        .serialize(serializer)
    }
}

impl EventSemantics for EventMessage {
    fn apply_to(&self, state: IdentifierState) -> Result<IdentifierState, Error> {
        Ok(IdentifierState {
            last_event_digest: self.digest.clone(),
            last_event_type: Some(self.event_type.clone()),
            ..self.event.apply_to(state)?
        })
    }
}
