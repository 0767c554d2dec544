pub mod event_data;
pub mod sections;

use crate::error::Error;
use crate::prefix::IdentifierPrefix;
use crate::state::{EventSemantics, IdentifierState};
use event_data::EventData;
use serde::{Deserialize, Serialize};
use serde_hex::{Compact, SerHex};

/// The header fields shared by every key event: the identifier prefix and
/// the sequence number, with the type-specific data flattened behind them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct KeyEvent {
    #[serde(rename = "i")]
    pub prefix: IdentifierPrefix,

    #[serde(rename = "s", with = "SerHex::<Compact>")]
    pub sn: u64,

    #[serde(flatten)]
    pub event_data: EventData,
}

impl KeyEvent {
    pub fn new(prefix: IdentifierPrefix, sn: u64, event_data: EventData) -> Self {
        Self {
            prefix,
            sn,
            event_data,
        }
    }
}

impl EventSemantics for KeyEvent {
    fn apply_to(&self, state: IdentifierState) -> Result<IdentifierState, Error> {
        match self.event_data {
            EventData::Icp(_) => {
                // inception requires an uninitialized state
                if state.prefix != IdentifierPrefix::default() {
                    return Err(Error::EventDuplicateError);
                }
                if self.sn != 0 {
                    return Err(Error::SemanticError(
                        "Inception must occur at sn 0".to_string(),
                    ));
                }
            }
            _ => {
                if self.prefix != state.prefix {
                    return Err(Error::SemanticError(
                        "Prefix does not match identifier state".to_string(),
                    ));
                } else if self.sn < state.sn + 1 {
                    return Err(Error::EventDuplicateError);
                } else if self.sn > state.sn + 1 {
                    return Err(Error::EventOutOfOrderError {
                        expected: state.sn + 1,
                        got: self.sn,
                    });
                }
            }
        };
        Ok(IdentifierState {
            sn: self.sn,
            prefix: self.prefix.clone(),
            ..self.event_data.apply_to(state)?
        })
    }
}
