use crate::error::Error;
use crate::event::sections::{threshold::SignatureThreshold, KeyConfig};
use crate::event_message::EventTypeTag;
use crate::prefix::{IdentifierPrefix, SelfAddressingPrefix};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_hex::{Compact, SerHex};

/// Witness configuration accumulated in identifier state: the receipt
/// threshold and the current member set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WitnessConfig {
    #[serde(rename = "bt")]
    pub tally: SignatureThreshold,

    #[serde(rename = "b")]
    pub witnesses: Vec<String>,
}

impl Default for WitnessConfig {
    fn default() -> Self {
        Self {
            tally: SignatureThreshold(0),
            witnesses: vec![],
        }
    }
}

/// Identifier State
///
/// The accumulated state after applying an ordered sequence of events to
/// an identifier, reconstructed by replay.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct IdentifierState {
    #[serde(rename = "i")]
    pub prefix: IdentifierPrefix,

    #[serde(rename = "s", with = "SerHex::<Compact>")]
    pub sn: u64,

    #[serde(rename = "d")]
    pub last_event_digest: SelfAddressingPrefix,

    #[serde(rename = "et")]
    pub last_event_type: Option<EventTypeTag>,

    #[serde(flatten)]
    pub current: KeyConfig,

    #[serde(flatten)]
    pub witness_config: WitnessConfig,

    #[serde(rename = "di")]
    pub delegator: Option<IdentifierPrefix>,

    #[serde(rename = "eo")]
    pub establishment_only: bool,

    #[serde(rename = "dt")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl IdentifierState {
    /// Apply
    ///
    /// Validates and applies the semantic rules of the event to this state.
    pub fn apply<T: EventSemantics>(self, event: &T) -> Result<Self, Error> {
        event.apply_to(self)
    }
}

/// EventSemantics
///
/// Describes an interface for applying the semantic rule of an event to
/// the state of an identifier.
pub trait EventSemantics {
    fn apply_to(&self, state: IdentifierState) -> Result<IdentifierState, Error> {
        // default impl is the identity transition
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_message::event_msg_builder::{EventMsgBuilder, EventType};
    use crate::prefix::{BasicPrefix, SeedPrefix};
    use crate::signer::Signer;

    fn test_key(seed_byte: u8) -> BasicPrefix {
        Signer::from_seed(SeedPrefix::RandomSeed256Ed25519(vec![seed_byte; 32]), true)
            .and_then(|signer| signer.public_key())
            .unwrap()
    }

    #[test]
    fn inception_initializes_state() -> Result<(), Error> {
        let key = test_key(1);
        let icp = EventMsgBuilder::new(EventType::Inception)
            .with_keys(vec![key.clone()])
            .with_next_keys(vec![test_key(2)])
            .build()?;

        let state = IdentifierState::default().apply(&icp)?;
        assert_eq!(state.prefix, icp.event.prefix);
        assert_eq!(state.sn, 0);
        assert_eq!(state.last_event_digest, icp.digest);
        assert_eq!(state.last_event_type, Some(crate::event_message::EventTypeTag::Icp));
        assert_eq!(state.current.public_keys, vec![key]);
        assert!(!state.establishment_only);
        Ok(())
    }

    #[test]
    fn rotation_replaces_keys() -> Result<(), Error> {
        let icp = EventMsgBuilder::new(EventType::Inception)
            .with_keys(vec![test_key(1)])
            .with_next_keys(vec![test_key(2)])
            .build()?;
        let state = IdentifierState::default().apply(&icp)?;

        let rot = EventMsgBuilder::new(EventType::Rotation)
            .with_prefix(&icp.event.prefix)
            .with_sn(1)
            .with_previous_event(&icp.digest)
            .with_keys(vec![test_key(2)])
            .with_next_keys(vec![test_key(3)])
            .build()?;
        let state = state.apply(&rot)?;

        assert_eq!(state.sn, 1);
        assert_eq!(state.current.public_keys, vec![test_key(2)]);
        assert_eq!(state.last_event_digest, rot.digest);
        Ok(())
    }

    #[test]
    fn rotation_with_uncommitted_keys_is_refused() -> Result<(), Error> {
        let icp = EventMsgBuilder::new(EventType::Inception)
            .with_keys(vec![test_key(1)])
            .with_next_keys(vec![test_key(2)])
            .build()?;
        let state = IdentifierState::default().apply(&icp)?;

        let rot = EventMsgBuilder::new(EventType::Rotation)
            .with_prefix(&icp.event.prefix)
            .with_sn(1)
            .with_previous_event(&icp.digest)
            .with_keys(vec![test_key(9)])
            .with_next_keys(vec![test_key(3)])
            .build()?;
        assert!(matches!(
            state.apply(&rot),
            Err(Error::NextKeysMismatch)
        ));
        Ok(())
    }

    #[test]
    fn interaction_preserves_key_material() -> Result<(), Error> {
        let icp = EventMsgBuilder::new(EventType::Inception)
            .with_keys(vec![test_key(1)])
            .with_next_keys(vec![test_key(2)])
            .build()?;
        let state = IdentifierState::default().apply(&icp)?;
        let before = state.current.clone();

        let ixn = EventMsgBuilder::new(EventType::Interaction)
            .with_prefix(&icp.event.prefix)
            .with_sn(1)
            .with_previous_event(&icp.digest)
            .build()?;
        let state = state.apply(&ixn)?;

        assert_eq!(state.sn, 1);
        assert_eq!(state.current, before);
        assert_eq!(state.last_event_digest, ixn.digest);
        Ok(())
    }

    #[test]
    fn establishment_only_refuses_interactions() -> Result<(), Error> {
        let icp = EventMsgBuilder::new(EventType::Inception)
            .with_keys(vec![test_key(1)])
            .with_next_keys(vec![test_key(2)])
            .with_configuration(vec!["EO".to_string()])
            .build()?;
        let state = IdentifierState::default().apply(&icp)?;
        assert!(state.establishment_only);

        let ixn = EventMsgBuilder::new(EventType::Interaction)
            .with_prefix(&icp.event.prefix)
            .with_sn(1)
            .with_previous_event(&icp.digest)
            .build()?;
        assert!(matches!(
            state.clone().apply(&ixn),
            Err(Error::EstablishmentOnlyError)
        ));

        // rotation is still permitted
        let rot = EventMsgBuilder::new(EventType::Rotation)
            .with_prefix(&icp.event.prefix)
            .with_sn(1)
            .with_previous_event(&icp.digest)
            .with_keys(vec![test_key(2)])
            .with_next_keys(vec![test_key(3)])
            .build()?;
        assert!(state.apply(&rot).is_ok());
        Ok(())
    }

    #[test]
    fn sequence_gaps_are_refused() -> Result<(), Error> {
        let icp = EventMsgBuilder::new(EventType::Inception)
            .with_keys(vec![test_key(1)])
            .with_next_keys(vec![test_key(2)])
            .build()?;
        let state = IdentifierState::default().apply(&icp)?;

        let ixn = EventMsgBuilder::new(EventType::Interaction)
            .with_prefix(&icp.event.prefix)
            .with_sn(3)
            .with_previous_event(&icp.digest)
            .build()?;
        assert!(matches!(
            state.apply(&ixn),
            Err(Error::EventOutOfOrderError { expected: 1, got: 3 })
        ));
        Ok(())
    }
}
