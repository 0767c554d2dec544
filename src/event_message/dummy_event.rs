use super::serialization_info::{SerializationFormats, SerializationInfo};
use super::{EventMessage, EventTypeTag};
use crate::derivation::{self_addressing::SelfAddressing, DerivationCode};
use crate::error::Error;
use crate::event::event_data::{EventData, InceptionEvent};
use crate::event::KeyEvent;
use serde::Serialize;
use serde_hex::{Compact, SerHex};

/// Placeholder filling the digest (and, for inceptions, the prefix) field
/// while the self-addressing digest is computed. It has the same length as
/// the digest it stands in for, so the version-string size survives the
/// substitution.
fn dummy_prefix(derivation: &SelfAddressing) -> String {
    "#".repeat(derivation.code_len() + derivation.derivative_b64_len())
}

/// Dummy Inception Event
///
/// Encapsulates the prefix derivation process for inceptions, where both
/// the digest and the identifier fields are held at the placeholder.
#[derive(Serialize, Debug, Clone)]
pub(crate) struct DummyInceptionEvent {
    #[serde(rename = "v")]
    serialization_info: SerializationInfo,

    #[serde(rename = "t")]
    event_type: EventTypeTag,

    #[serde(rename = "d")]
    digest: String,

    #[serde(rename = "i")]
    prefix: String,

    #[serde(rename = "s", with = "SerHex::<Compact>")]
    sn: u64,

    #[serde(flatten)]
    data: InceptionEvent,
}

impl DummyInceptionEvent {
    /// The canonical bytes an inception digests into its SAID: the final
    /// serialization with `d` and `i` dummied out.
    pub fn dummy_inception_data(
        icp: InceptionEvent,
        derivation: &SelfAddressing,
        format: SerializationFormats,
    ) -> Result<Vec<u8>, Error> {
        let size = Self {
            serialization_info: SerializationInfo::new(&format, 0),
            event_type: EventTypeTag::Icp,
            digest: dummy_prefix(derivation),
            prefix: dummy_prefix(derivation),
            sn: 0,
            data: icp.clone(),
        }
        .serialize()?
        .len();

        Self {
            serialization_info: SerializationInfo::new(&format, size),
            event_type: EventTypeTag::Icp,
            digest: dummy_prefix(derivation),
            prefix: dummy_prefix(derivation),
            sn: 0,
            data: icp,
        }
        .serialize()
    }

    fn serialize(&self) -> Result<Vec<u8>, Error> {
        self.serialization_info.kind.encode(&self)
    }
}

/// Dummy Event Message
///
/// The digest-derivation form of rotation and interaction events: the
/// enclosing message with only `d` dummied out.
#[derive(Serialize, Debug, Clone)]
pub(crate) struct DummyEventMessage {
    #[serde(rename = "v")]
    pub serialization_info: SerializationInfo,

    #[serde(rename = "t")]
    event_type: EventTypeTag,

    #[serde(rename = "d")]
    digest: String,

    #[serde(flatten)]
    data: KeyEvent,
}

impl DummyEventMessage {
    /// The canonical bytes a non-inception event digests into its SAID.
    pub fn dummy_event(
        event: KeyEvent,
        format: SerializationFormats,
        derivation: &SelfAddressing,
    ) -> Result<Vec<u8>, Error> {
        let size = Self {
            serialization_info: SerializationInfo::new(&format, 0),
            event_type: (&event.event_data).into(),
            digest: dummy_prefix(derivation),
            data: event.clone(),
        }
        .serialize()?
        .len();

        Self {
            serialization_info: SerializationInfo::new(&format, size),
            event_type: (&event.event_data).into(),
            digest: dummy_prefix(derivation),
            data: event,
        }
        .serialize()
    }

    /// Reconstructs the digest-derivation bytes of an accepted message,
    /// using its recorded version string rather than re-measuring.
    pub fn derivation_data(
        message: &EventMessage,
        derivation: &SelfAddressing,
    ) -> Result<Vec<u8>, Error> {
        match &message.event.event_data {
            EventData::Icp(icp) => DummyInceptionEvent {
                serialization_info: message.serialization_info,
                event_type: EventTypeTag::Icp,
                digest: dummy_prefix(derivation),
                prefix: dummy_prefix(derivation),
                sn: message.event.sn,
                data: icp.clone(),
            }
            .serialize(),
            _ => Self {
                serialization_info: message.serialization_info,
                event_type: message.event_type.clone(),
                digest: dummy_prefix(derivation),
                data: message.event.clone(),
            }
            .serialize(),
        }
    }

    fn serialize(&self) -> Result<Vec<u8>, Error> {
        self.serialization_info.kind.encode(&self)
    }
}
