use crate::state::WitnessConfig;
use serde::{Deserialize, Serialize};

pub mod key_config;
pub mod seal;
pub mod threshold;

pub use key_config::KeyConfig;

use self::threshold::SignatureThreshold;

/// Witness set declared at inception. Witness identifiers are opaque to
/// the engine; only membership and the receipt threshold are tracked.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InceptionWitnessConfig {
    #[serde(rename = "bt", with = "threshold::dec")]
    pub tally: SignatureThreshold,

    #[serde(rename = "b")]
    pub initial_witnesses: Vec<String>,
}

impl Default for InceptionWitnessConfig {
    fn default() -> Self {
        Self {
            tally: SignatureThreshold(0),
            initial_witnesses: vec![],
        }
    }
}

/// Witness delta declared by a rotation: the new tally plus the pruned
/// and grafted members.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RotationWitnessConfig {
    #[serde(rename = "bt", with = "threshold::hex")]
    pub tally: SignatureThreshold,

    #[serde(rename = "br")]
    pub prune: Vec<String>,

    #[serde(rename = "ba")]
    pub graft: Vec<String>,
}

impl Default for RotationWitnessConfig {
    fn default() -> Self {
        Self {
            tally: SignatureThreshold(0),
            prune: vec![],
            graft: vec![],
        }
    }
}

impl From<InceptionWitnessConfig> for WitnessConfig {
    fn from(config: InceptionWitnessConfig) -> Self {
        Self {
            tally: config.tally,
            witnesses: config.initial_witnesses,
        }
    }
}
