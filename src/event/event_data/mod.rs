pub mod inception;
pub mod interaction;
pub mod rotation;

use crate::error::Error;
use crate::event_message::EventTypeTag;
use crate::prefix::SelfAddressingPrefix;
use crate::state::{EventSemantics, IdentifierState};
use serde::{Deserialize, Serialize};

pub use self::{
    inception::InceptionEvent, interaction::InteractionEvent, rotation::RotationEvent,
};

/// Event Data
///
/// Conveys the semantic content of a key event. The variants carry
/// disjoint field sets, so the wire form needs no embedded tag; the `t`
/// field of the enclosing message is cross-checked during validation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum EventData {
    Icp(InceptionEvent),
    Rot(RotationEvent),
    Ixn(InteractionEvent),
}

impl EventData {
    /// Digest of the predecessor event; absent for inceptions.
    pub fn previous(&self) -> Option<&SelfAddressingPrefix> {
        match self {
            Self::Icp(_) => None,
            Self::Rot(rot) => Some(&rot.previous_event_hash),
            Self::Ixn(ixn) => Some(&ixn.previous_event_hash),
        }
    }
}

impl EventSemantics for EventData {
    fn apply_to(&self, state: IdentifierState) -> Result<IdentifierState, Error> {
        match self {
            Self::Icp(icp) => icp.apply_to(state),
            Self::Rot(rot) => rot.apply_to(state),
            Self::Ixn(ixn) => ixn.apply_to(state),
        }
    }
}

impl From<&EventData> for EventTypeTag {
    fn from(data: &EventData) -> Self {
        match data {
            EventData::Icp(_) => EventTypeTag::Icp,
            EventData::Rot(_) => EventTypeTag::Rot,
            EventData::Ixn(_) => EventTypeTag::Ixn,
        }
    }
}
