use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::error::Error;
use crate::event_message::{
    signed_event_message::SignedEventMessage, EventMessage, EventTypeTag,
};
use crate::prefix::{AttachedSignaturePrefix, IdentifierPrefix, Prefix, SelfAddressingPrefix};
use crate::state::IdentifierState;

/// A single accepted event with its attachments. Immutable once inserted,
/// except that receipts may be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub prefix: IdentifierPrefix,
    pub sn: u64,
    pub event: EventMessage,
    pub signatures: Vec<AttachedSignaturePrefix>,
    pub receipts: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogStats {
    pub total_prefixes: usize,
    pub total_events: usize,
    pub approximate_size: usize,
}

#[derive(Default)]
struct LogTables {
    /// accepted events keyed by (prefix, sn)
    events: BTreeMap<(IdentifierPrefix, u64), LogEntry>,
    /// highest accepted sn per prefix
    heads: HashMap<IdentifierPrefix, u64>,
}

/// Event Log
///
/// Owns the accepted-event table and the per-prefix head index for the
/// lifetime of the process. Mutations take the write half of the lock and
/// either commit completely or leave both tables untouched; reads share
/// the lock and observe a consistent snapshot.
pub struct EventLog {
    tables: RwLock<LogTables>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        EventLog {
            tables: RwLock::new(LogTables::default()),
        }
    }

    /// Commit
    ///
    /// Validates the event against the current chain and inserts it.
    /// Replaying a byte-identical event at an occupied slot succeeds
    /// without mutating anything; a different event at an occupied slot is
    /// a conflict.
    pub fn commit(&self, signed: &SignedEventMessage) -> Result<(), Error> {
        let message = &signed.event_message;
        message.validate()?;
        let prefix = message.event.prefix.clone();
        let sn = message.event.sn;
        let encoded = message.serialize()?;

        let mut tables = self.tables.write().map_err(|_| Error::StorageError)?;

        if let Some(existing) = tables.events.get(&(prefix.clone(), sn)) {
            return if existing.event.serialize()? == encoded {
                debug!("replay of event {} sn {} ignored", prefix.to_str(), sn);
                Ok(())
            } else {
                warn!(
                    "conflicting event for {} at sn {} refused",
                    prefix.to_str(),
                    sn
                );
                Err(Error::EventDuplicateError)
            };
        }

        match tables.heads.get(&prefix) {
            None => {
                if sn != 0 || !matches!(message.event_type, EventTypeTag::Icp) {
                    return Err(Error::MissingInceptionError);
                }
            }
            Some(&head) => {
                if sn != head + 1 {
                    return Err(Error::EventOutOfOrderError {
                        expected: head + 1,
                        got: sn,
                    });
                }
                let previous = tables
                    .events
                    .get(&(prefix.clone(), head))
                    .ok_or(Error::NoEventError)?;
                let linked = message.event.event_data.previous().ok_or_else(|| {
                    Error::SemanticError(
                        "Event beyond sn 0 must reference its predecessor".to_string(),
                    )
                })?;
                if linked != &previous.event.digest {
                    return Err(Error::PriorDigestMismatch);
                }
            }
        }

        // the event must also apply cleanly to the replayed state, so a
        // rotation against a stale commitment or an interaction on an
        // establishment-only identifier never reaches the tables
        let mut state = IdentifierState::default();
        for (_, entry) in tables
            .events
            .range((prefix.clone(), 0)..=(prefix.clone(), u64::MAX))
        {
            state = state.apply(&entry.event)?;
        }
        state.apply(message)?;

        tables.events.insert(
            (prefix.clone(), sn),
            LogEntry {
                prefix: prefix.clone(),
                sn,
                event: message.clone(),
                signatures: signed.signatures.clone(),
                receipts: vec![],
                timestamp: Utc::now(),
            },
        );
        tables.heads.insert(prefix.clone(), sn);
        debug!(
            "accepted {} event for {} at sn {}",
            message.event_type.to_str(),
            prefix.to_str(),
            sn
        );
        Ok(())
    }

    /// Ordered entries for a prefix, optionally restricted to a sequence
    /// range and truncated to `limit`.
    pub fn get_events(
        &self,
        prefix: &IdentifierPrefix,
        from: Option<u64>,
        to: Option<u64>,
        limit: Option<usize>,
    ) -> Result<Vec<LogEntry>, Error> {
        let tables = self.tables.read().map_err(|_| Error::StorageError)?;
        let lower = from.unwrap_or(0);
        let upper = to.unwrap_or(u64::MAX);
        let mut entries: Vec<LogEntry> = tables
            .events
            .range((prefix.clone(), lower)..=(prefix.clone(), upper))
            .map(|(_, entry)| entry.clone())
            .collect();
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    pub fn get_event_at(&self, prefix: &IdentifierPrefix, sn: u64) -> Result<LogEntry, Error> {
        let tables = self.tables.read().map_err(|_| Error::StorageError)?;
        tables
            .events
            .get(&(prefix.clone(), sn))
            .cloned()
            .ok_or(Error::NoEventError)
    }

    /// Highest accepted sequence number for a prefix.
    pub fn current_sn(&self, prefix: &IdentifierPrefix) -> Result<u64, Error> {
        let tables = self.tables.read().map_err(|_| Error::StorageError)?;
        tables.heads.get(prefix).copied().ok_or(Error::NoEventError)
    }

    /// Appends receipts to an existing entry, dropping duplicates. The
    /// receipts are stored verbatim and never verified here.
    pub fn add_receipts(
        &self,
        prefix: &IdentifierPrefix,
        sn: u64,
        receipts: &[String],
    ) -> Result<(), Error> {
        let mut tables = self.tables.write().map_err(|_| Error::StorageError)?;
        let entry = tables
            .events
            .get_mut(&(prefix.clone(), sn))
            .ok_or(Error::NoEventError)?;
        for receipt in receipts {
            if !entry.receipts.contains(receipt) {
                entry.receipts.push(receipt.clone());
            }
        }
        Ok(())
    }

    /// Replays the whole chain of a prefix checking the inception rule,
    /// sequence contiguity and the prior-digest links. Signatures are not
    /// checked here.
    pub fn verify_chain(&self, prefix: &IdentifierPrefix) -> Result<(), Error> {
        let tables = self.tables.read().map_err(|_| Error::StorageError)?;
        let mut expected = 0u64;
        let mut previous_digest: Option<SelfAddressingPrefix> = None;
        for (_, entry) in tables
            .events
            .range((prefix.clone(), 0)..=(prefix.clone(), u64::MAX))
        {
            if entry.sn != expected {
                return Err(Error::EventOutOfOrderError {
                    expected,
                    got: entry.sn,
                });
            }
            match (&previous_digest, entry.event.event.event_data.previous()) {
                (None, _) => {
                    if !matches!(entry.event.event_type, EventTypeTag::Icp) {
                        return Err(Error::MissingInceptionError);
                    }
                }
                (Some(digest), Some(linked)) => {
                    if linked != digest {
                        return Err(Error::PriorDigestMismatch);
                    }
                }
                (Some(_), None) => {
                    return Err(Error::SemanticError(
                        "Event beyond sn 0 must reference its predecessor".to_string(),
                    ))
                }
            }
            previous_digest = Some(entry.event.digest.clone());
            expected += 1;
        }
        if expected == 0 {
            return Err(Error::NoEventError);
        }
        Ok(())
    }

    /// Compute State for Prefix
    ///
    /// Folds the event semantics over the ordered entries of the prefix,
    /// returning the terminal state, or None for an unknown prefix.
    pub fn compute_state(
        &self,
        prefix: &IdentifierPrefix,
    ) -> Result<Option<IdentifierState>, Error> {
        let tables = self.tables.read().map_err(|_| Error::StorageError)?;
        let mut state = IdentifierState::default();
        let mut seen = false;
        for (_, entry) in tables
            .events
            .range((prefix.clone(), 0)..=(prefix.clone(), u64::MAX))
        {
            state = state.apply(&entry.event)?;
            state.timestamp = Some(entry.timestamp);
            seen = true;
        }
        Ok(if seen { Some(state) } else { None })
    }

    /// Destructively removes all entries and the head index for a prefix,
    /// returning how many entries were dropped.
    pub fn clear(&self, prefix: &IdentifierPrefix) -> Result<usize, Error> {
        let mut tables = self.tables.write().map_err(|_| Error::StorageError)?;
        let keys: Vec<(IdentifierPrefix, u64)> = tables
            .events
            .range((prefix.clone(), 0)..=(prefix.clone(), u64::MAX))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &keys {
            tables.events.remove(key);
        }
        tables.heads.remove(prefix);
        if !keys.is_empty() {
            info!("cleared {} events for {}", keys.len(), prefix.to_str());
        }
        Ok(keys.len())
    }

    pub fn stats(&self) -> Result<LogStats, Error> {
        let tables = self.tables.read().map_err(|_| Error::StorageError)?;
        Ok(LogStats {
            total_prefixes: tables.heads.len(),
            total_events: tables.events.len(),
            approximate_size: tables
                .events
                .values()
                .map(|entry| {
                    entry.event.serialization_info.size
                        + entry.signatures.len() * 88
                        + entry.receipts.iter().map(String::len).sum::<usize>()
                })
                .sum(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_message::event_msg_builder::{EventMsgBuilder, EventType};
    use crate::prefix::{BasicPrefix, SeedPrefix};
    use crate::signer::Signer;

    fn signer(seed_byte: u8) -> Signer {
        Signer::from_seed(SeedPrefix::RandomSeed256Ed25519(vec![seed_byte; 32]), true).unwrap()
    }

    fn key(seed_byte: u8) -> BasicPrefix {
        signer(seed_byte).public_key().unwrap()
    }

    fn signed(message: &EventMessage, by: &Signer) -> SignedEventMessage {
        let signature = by.sign(&message.serialize().unwrap()).unwrap();
        message.sign(vec![AttachedSignaturePrefix {
            index: 0,
            signature,
        }])
    }

    fn incept(log: &EventLog) -> (EventMessage, IdentifierPrefix) {
        let icp = EventMsgBuilder::new(EventType::Inception)
            .with_keys(vec![key(1)])
            .with_next_keys(vec![key(2)])
            .build()
            .unwrap();
        log.commit(&signed(&icp, &signer(1))).unwrap();
        let prefix = icp.event.prefix.clone();
        (icp, prefix)
    }

    #[test]
    fn first_event_must_be_inception_at_zero() {
        let log = EventLog::new();
        let icp = EventMsgBuilder::new(EventType::Inception)
            .with_keys(vec![key(1)])
            .with_next_keys(vec![key(2)])
            .build()
            .unwrap();
        let orphan_ixn = EventMsgBuilder::new(EventType::Interaction)
            .with_prefix(&icp.event.prefix)
            .with_sn(1)
            .with_previous_event(&icp.digest)
            .build()
            .unwrap();

        assert!(matches!(
            log.commit(&signed(&orphan_ixn, &signer(1))),
            Err(Error::MissingInceptionError)
        ));
        assert_eq!(log.stats().unwrap().total_events, 0);
    }

    #[test]
    fn idempotent_replay() {
        let log = EventLog::new();
        let icp = EventMsgBuilder::new(EventType::Inception)
            .with_keys(vec![key(1)])
            .with_next_keys(vec![key(2)])
            .build()
            .unwrap();
        let message = signed(&icp, &signer(1));
        log.commit(&message).unwrap();
        log.commit(&message).unwrap();
        assert_eq!(log.stats().unwrap().total_events, 1);
    }

    #[test]
    fn conflicting_event_is_refused() {
        let log = EventLog::new();
        let (icp, prefix) = incept(&log);

        let ixn_a = EventMsgBuilder::new(EventType::Interaction)
            .with_prefix(&prefix)
            .with_sn(1)
            .with_previous_event(&icp.digest)
            .build()
            .unwrap();
        let ixn_b = EventMsgBuilder::new(EventType::Interaction)
            .with_prefix(&prefix)
            .with_sn(1)
            .with_previous_event(&icp.digest)
            .with_seal(vec![crate::event::sections::seal::Seal::Digest(
                crate::event::sections::seal::DigestSeal {
                    dig: "EBfxc4RiVY6saIFmUfEtETs1FcqmktZW88UkbnOg0Qen".to_string(),
                },
            )])
            .build()
            .unwrap();

        log.commit(&signed(&ixn_a, &signer(1))).unwrap();
        assert!(matches!(
            log.commit(&signed(&ixn_b, &signer(1))),
            Err(Error::EventDuplicateError)
        ));
        // the accepted entry is untouched
        let entry = log.get_event_at(&prefix, 1).unwrap();
        assert_eq!(entry.event, ixn_a);
    }

    #[test]
    fn sequence_gap_is_refused() {
        let log = EventLog::new();
        let (icp, prefix) = incept(&log);

        let gap = EventMsgBuilder::new(EventType::Interaction)
            .with_prefix(&prefix)
            .with_sn(2)
            .with_previous_event(&icp.digest)
            .build()
            .unwrap();
        assert!(matches!(
            log.commit(&signed(&gap, &signer(1))),
            Err(Error::EventOutOfOrderError { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn prior_digest_must_link() {
        let log = EventLog::new();
        let (_icp, prefix) = incept(&log);

        let unlinked = EventMsgBuilder::new(EventType::Interaction)
            .with_prefix(&prefix)
            .with_sn(1)
            .with_previous_event(
                &crate::derivation::self_addressing::SelfAddressing::Blake3_256.derive(b"not it"),
            )
            .build()
            .unwrap();
        assert!(matches!(
            log.commit(&signed(&unlinked, &signer(1))),
            Err(Error::PriorDigestMismatch)
        ));
    }

    #[test]
    fn receipts_accumulate_without_duplicates() {
        let log = EventLog::new();
        let (_icp, prefix) = incept(&log);

        log.add_receipts(&prefix, 0, &["r1".to_string(), "r2".to_string()])
            .unwrap();
        log.add_receipts(&prefix, 0, &["r2".to_string(), "r3".to_string()])
            .unwrap();
        let entry = log.get_event_at(&prefix, 0).unwrap();
        assert_eq!(entry.receipts, vec!["r1", "r2", "r3"]);

        assert!(matches!(
            log.add_receipts(&prefix, 9, &["r".to_string()]),
            Err(Error::NoEventError)
        ));
    }

    #[test]
    fn chain_verification_and_state() {
        let log = EventLog::new();
        let (icp, prefix) = incept(&log);

        let ixn = EventMsgBuilder::new(EventType::Interaction)
            .with_prefix(&prefix)
            .with_sn(1)
            .with_previous_event(&icp.digest)
            .build()
            .unwrap();
        log.commit(&signed(&ixn, &signer(1))).unwrap();

        log.verify_chain(&prefix).unwrap();
        let state = log.compute_state(&prefix).unwrap().unwrap();
        assert_eq!(state.sn, 1);
        assert_eq!(state.last_event_digest, ixn.digest);
        assert!(state.timestamp.is_some());

        assert!(matches!(
            log.verify_chain(&IdentifierPrefix::default()),
            Err(Error::NoEventError)
        ));
    }

    #[test]
    fn clear_removes_prefix() {
        let log = EventLog::new();
        let (_icp, prefix) = incept(&log);
        assert_eq!(log.clear(&prefix).unwrap(), 1);
        assert!(log.compute_state(&prefix).unwrap().is_none());
        assert!(matches!(log.current_sn(&prefix), Err(Error::NoEventError)));
        assert_eq!(log.clear(&prefix).unwrap(), 0);
    }

    #[test]
    fn range_queries() {
        let log = EventLog::new();
        let (icp, prefix) = incept(&log);

        let mut previous = icp.digest.clone();
        for sn in 1..=4 {
            let ixn = EventMsgBuilder::new(EventType::Interaction)
                .with_prefix(&prefix)
                .with_sn(sn)
                .with_previous_event(&previous)
                .build()
                .unwrap();
            log.commit(&signed(&ixn, &signer(1))).unwrap();
            previous = ixn.digest.clone();
        }

        let all = log.get_events(&prefix, None, None, None).unwrap();
        assert_eq!(all.len(), 5);
        assert!(all.windows(2).all(|pair| pair[0].sn + 1 == pair[1].sn));

        let middle = log.get_events(&prefix, Some(1), Some(3), None).unwrap();
        assert_eq!(
            middle.iter().map(|entry| entry.sn).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );

        let limited = log.get_events(&prefix, None, None, Some(2)).unwrap();
        assert_eq!(limited.len(), 2);

        assert_eq!(log.current_sn(&prefix).unwrap(), 4);
    }

    #[test]
    fn rejects_unsupported_event_types() {
        let log = EventLog::new();
        let icp = EventMsgBuilder::new(EventType::Inception)
            .with_keys(vec![key(1)])
            .with_next_keys(vec![key(2)])
            .build()
            .unwrap();
        let mut delegated = icp;
        delegated.event_type = EventTypeTag::Dip;
        assert!(matches!(
            log.commit(&signed(&delegated, &signer(1))),
            Err(Error::UnsupportedEventType(_))
        ));
    }

    #[test]
    fn rotation_and_interaction_never_land_at_zero() {
        let log = EventLog::new();
        let (icp, prefix) = incept(&log);

        for event_type in [EventType::Rotation, EventType::Interaction] {
            let zero = EventMsgBuilder::new(event_type)
                .with_prefix(&prefix)
                .with_sn(0)
                .with_previous_event(&icp.digest)
                .with_keys(vec![key(2)])
                .with_next_keys(vec![key(3)])
                .build()
                .unwrap();
            assert!(matches!(
                log.commit(&signed(&zero, &signer(1))),
                Err(Error::SemanticError(_))
            ));
        }
        assert_eq!(log.stats().unwrap().total_events, 1);
    }

    #[test]
    fn stats_accumulate() {
        let log = EventLog::new();
        assert_eq!(log.stats().unwrap(), LogStats::default());
        let _ = incept(&log);
        let stats = log.stats().unwrap();
        assert_eq!(stats.total_prefixes, 1);
        assert_eq!(stats.total_events, 1);
        assert!(stats.approximate_size > 0);
    }
}
