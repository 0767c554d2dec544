use crate::error::Error;
use crate::event::sections::seal::Seal;
use crate::prefix::SelfAddressingPrefix;
use crate::state::{EventSemantics, IdentifierState};
use serde::{Deserialize, Serialize};

/// Interaction Event
///
/// Anchors data into the log without touching any key material.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InteractionEvent {
    #[serde(rename = "p")]
    pub previous_event_hash: SelfAddressingPrefix,

    #[serde(rename = "a")]
    pub data: Vec<Seal>,
}

impl EventSemantics for InteractionEvent {
    fn apply_to(&self, state: IdentifierState) -> Result<IdentifierState, Error> {
        if state.establishment_only {
            return Err(Error::EstablishmentOnlyError);
        }
        if self.previous_event_hash != state.last_event_digest {
            return Err(Error::PriorDigestMismatch);
        }
        Ok(IdentifierState { ..state })
    }
}
