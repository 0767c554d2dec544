use chrono::{SecondsFormat, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::derivation::{self_addressing::SelfAddressing, self_signing::SelfSigning};
use crate::error::Error;
use crate::event::sections::{seal::Seal, threshold::SignatureThreshold};
use crate::event_message::{
    event_msg_builder::{EventMsgBuilder, EventType},
    signed_event_message::SignedEventMessage,
    EventMessage,
};
use crate::kel::{EventLog, LogEntry, LogStats};
use crate::prefix::{AttachedSignaturePrefix, IdentifierPrefix, Prefix};
use crate::signer::Signer;
use crate::state::IdentifierState;

pub const EXPORT_VERSION: &str = "1.0";

/// Inception parameters beyond the two signing identities.
#[derive(Debug, Clone, Default)]
pub struct InceptionSettings {
    pub witnesses: Vec<String>,
    /// Defaults to the witness count when absent.
    pub witness_threshold: Option<u64>,
    pub configuration: Vec<String>,
}

/// Rotation parameters beyond the three signing identities.
#[derive(Debug, Clone, Default)]
pub struct RotationSettings {
    pub witness_cuts: Vec<String>,
    pub witness_adds: Vec<String>,
    /// Defaults to the pre-rotation tally when absent.
    pub witness_threshold: Option<u64>,
    pub data: Vec<Seal>,
}

/// Portable snapshot of one identifier: its terminal key state plus every
/// accepted event with signatures and receipts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IdentifierExport {
    pub version: String,
    pub prefix: String,
    pub exported_at: String,
    pub key_state: ExportedKeyState,
    pub events: Vec<ExportedEvent>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportedKeyState {
    pub sequence: u64,
    pub keys: Vec<String>,
    pub threshold: u64,
    pub witnesses: Vec<String>,
    pub witness_threshold: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportedEvent {
    pub sequence: u64,
    pub event: EventMessage,
    /// Standard base64 of the raw 64 byte signatures, in key-index order.
    pub signatures: Vec<String>,
    pub receipts: Vec<String>,
    pub timestamp: String,
}

/// Facade combining signers, the event builder and the event log into
/// single transactional operations per identifier.
pub struct Keri {
    log: EventLog,
}

impl Default for Keri {
    fn default() -> Self {
        Self::new()
    }
}

impl Keri {
    pub fn new() -> Self {
        Keri {
            log: EventLog::new(),
        }
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Creates a new self-certifying identifier: builds the inception
    /// event over the signer's key and the next signer's commitment, signs
    /// it and commits it to the log.
    pub fn incept(
        &self,
        signer: &Signer,
        next_signer: &Signer,
        settings: InceptionSettings,
    ) -> Result<IdentifierState, Error> {
        let witness_threshold = settings
            .witness_threshold
            .unwrap_or(settings.witnesses.len() as u64);
        let icp = EventMsgBuilder::new(EventType::Inception)
            .with_keys(vec![signer.public_key()?])
            .with_next_keys(vec![next_signer.public_key()?])
            .with_witnesses(settings.witnesses)
            .with_witness_threshold(&SignatureThreshold(witness_threshold))
            .with_configuration(settings.configuration)
            .build()?;

        let prefix = icp.event.prefix.clone();
        self.log.commit(&self.sign_message(&icp, signer)?)?;
        info!("incepted identifier {}", prefix.to_str());
        self.state_of(&prefix)
    }

    /// Rotates an identifier to the pre-committed key: the new signer's
    /// key must hash to the standing commitment, the next signer's key is
    /// committed for the following rotation, and the current signer signs.
    pub fn rotate(
        &self,
        prefix: &IdentifierPrefix,
        current_signer: &Signer,
        new_signer: &Signer,
        next_signer: &Signer,
        settings: RotationSettings,
    ) -> Result<IdentifierState, Error> {
        let state = self.state_of(prefix)?;
        let witness_threshold = settings
            .witness_threshold
            .unwrap_or(state.witness_config.tally.0);
        let rot = EventMsgBuilder::new(EventType::Rotation)
            .with_prefix(prefix)
            .with_sn(state.sn + 1)
            .with_previous_event(&state.last_event_digest)
            .with_keys(vec![new_signer.public_key()?])
            .with_next_keys(vec![next_signer.public_key()?])
            .with_witness_threshold(&SignatureThreshold(witness_threshold))
            .with_witness_cuts(settings.witness_cuts)
            .with_witness_adds(settings.witness_adds)
            .with_seal(settings.data)
            .build()?;

        self.log.commit(&self.sign_message(&rot, current_signer)?)?;
        self.state_of(prefix)
    }

    /// Anchors data into the log without changing any key material.
    pub fn interact(
        &self,
        prefix: &IdentifierPrefix,
        signer: &Signer,
        data: Vec<Seal>,
    ) -> Result<IdentifierState, Error> {
        let state = self.state_of(prefix)?;
        if state.establishment_only {
            return Err(Error::EstablishmentOnlyError);
        }
        let ixn = EventMsgBuilder::new(EventType::Interaction)
            .with_prefix(prefix)
            .with_sn(state.sn + 1)
            .with_previous_event(&state.last_event_digest)
            .with_seal(data)
            .build()?;

        self.log.commit(&self.sign_message(&ixn, signer)?)?;
        self.state_of(prefix)
    }

    /// Replays the identifier's chain, checking inception, contiguity and
    /// digest links.
    pub fn verify(&self, prefix: &IdentifierPrefix) -> Result<(), Error> {
        self.log.verify_chain(prefix)
    }

    pub fn get_events(
        &self,
        prefix: &IdentifierPrefix,
        from: Option<u64>,
        to: Option<u64>,
        limit: Option<usize>,
    ) -> Result<Vec<LogEntry>, Error> {
        self.log.get_events(prefix, from, to, limit)
    }

    pub fn get_state(&self, prefix: &IdentifierPrefix) -> Result<Option<IdentifierState>, Error> {
        self.log.compute_state(prefix)
    }

    pub fn stats(&self) -> Result<LogStats, Error> {
        self.log.stats()
    }

    /// Blake3-256 digest of arbitrary bytes as a self-addressing prefix.
    pub fn digest(&self, data: &[u8]) -> crate::prefix::SelfAddressingPrefix {
        SelfAddressing::Blake3_256.derive(data)
    }

    /// Snapshot of one identifier for transport or backup.
    pub fn export(&self, prefix: &IdentifierPrefix) -> Result<IdentifierExport, Error> {
        let state = self.state_of(prefix)?;
        let entries = self.log.get_events(prefix, None, None, None)?;
        Ok(IdentifierExport {
            version: EXPORT_VERSION.to_string(),
            prefix: prefix.to_str(),
            exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            key_state: ExportedKeyState {
                sequence: state.sn,
                keys: state
                    .current
                    .public_keys
                    .iter()
                    .map(|key| key.to_str())
                    .collect(),
                threshold: state.current.threshold.0,
                witnesses: state.witness_config.witnesses.clone(),
                witness_threshold: state.witness_config.tally.0,
            },
            events: entries
                .into_iter()
                .map(|entry| ExportedEvent {
                    sequence: entry.sn,
                    event: entry.event,
                    signatures: entry
                        .signatures
                        .iter()
                        .map(|sig| base64::encode(sig.signature.signature()))
                        .collect(),
                    receipts: entry.receipts,
                    timestamp: entry.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
                })
                .collect(),
        })
    }

    /// Clears the prefix and replays the exported events in order. Halts
    /// at the first rejected event without rolling back earlier appends;
    /// callers needing all-or-nothing semantics clear the prefix on error.
    pub fn import(&self, export: &IdentifierExport) -> Result<IdentifierState, Error> {
        if export.version != EXPORT_VERSION {
            return Err(Error::SemanticError(format!(
                "Unsupported export version: {}",
                export.version
            )));
        }
        let prefix: IdentifierPrefix = export.prefix.parse()?;
        self.log.clear(&prefix)?;
        for exported in &export.events {
            let signatures = exported
                .signatures
                .iter()
                .enumerate()
                .map(|(index, sig)| {
                    Ok(AttachedSignaturePrefix::new(
                        SelfSigning::Ed25519Sha512,
                        base64::decode(sig)?,
                        index as u16,
                    ))
                })
                .collect::<Result<Vec<_>, Error>>()?;
            let signed = SignedEventMessage::new(&exported.event, signatures);
            self.log.commit(&signed)?;
            if !exported.receipts.is_empty() {
                self.log
                    .add_receipts(&prefix, exported.sequence, &exported.receipts)?;
            }
        }
        info!(
            "imported {} events for {}",
            export.events.len(),
            export.prefix
        );
        self.state_of(&prefix)
    }

    fn sign_message(
        &self,
        message: &EventMessage,
        signer: &Signer,
    ) -> Result<SignedEventMessage, Error> {
        let signature = signer.sign(&message.serialize()?)?;
        Ok(message.sign(vec![AttachedSignaturePrefix {
            index: 0,
            signature,
        }]))
    }

    fn state_of(&self, prefix: &IdentifierPrefix) -> Result<IdentifierState, Error> {
        self.get_state(prefix)?.ok_or(Error::NoEventError)
    }
}
