use serde::{Deserialize, Serialize};

/// Anchors carried in the `a` field of an event.
///
/// The engine treats anchors as opaque: the typed shapes below cover the
/// common digest seals, anything else is preserved verbatim as JSON.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Seal {
    Event(EventSeal),
    Digest(DigestSeal),
    Other(serde_json::Value),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventSeal {
    #[serde(rename = "i")]
    pub prefix: String,

    #[serde(rename = "s")]
    pub sn: String,

    #[serde(rename = "d")]
    pub event_digest: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DigestSeal {
    #[serde(rename = "d")]
    pub dig: String,
}
