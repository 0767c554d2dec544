//! Core engine for self-certifying identifiers backed by an append-only,
//! cryptographically chained Key Event Log.
//!
//! Identifiers are incepted from Ed25519 keypairs, rotated against
//! pre-rotation commitments and extended with interaction events that
//! anchor external data. Every event is self-addressing: its identifier
//! is the Blake3-256 digest of its own canonical serialization, encoded
//! in the qb64 text form.

pub mod derivation;
pub mod error;
pub mod event;
pub mod event_message;
pub mod kel;
pub mod keri;
pub mod keys;
pub mod prefix;
pub mod signer;
pub mod state;
