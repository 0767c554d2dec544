use super::EventMessage;
use crate::prefix::AttachedSignaturePrefix;
use serde::{Deserialize, Serialize};

/// An event message together with the controller signatures over its
/// canonical serialization.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SignedEventMessage {
    pub event_message: EventMessage,
    pub signatures: Vec<AttachedSignaturePrefix>,
}

impl SignedEventMessage {
    pub fn new(message: &EventMessage, signatures: Vec<AttachedSignaturePrefix>) -> Self {
        Self {
            event_message: message.clone(),
            signatures,
        }
    }
}
