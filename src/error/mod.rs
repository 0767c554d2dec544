use base64::DecodeError;
use core::num::ParseIntError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error during Serialization: {0}")]
    SerializationError(String),

    #[error("JSON Serialization error")]
    JsonSerializationError {
        #[from]
        source: serde_json::Error,
    },

    #[error("CBOR Serialization error")]
    CborSerializationError {
        #[from]
        source: serde_cbor::Error,
    },

    #[error("MessagePack Serialization error")]
    MsgPackSerializationError {
        #[from]
        source: rmp_serde::encode::Error,
    },

    #[error("Error parsing numerical value: {source}")]
    IntegerParseValue {
        #[from]
        source: ParseIntError,
    },

    #[error("Base64 Decoding error")]
    Base64DecodingError {
        #[from]
        source: DecodeError,
    },

    #[error("Deserialization error")]
    DeserializationError,

    #[error("Unknown derivation code: {0}")]
    UnknownCodeError(String),

    #[error("Invalid derivative for code {code}: expected {expected}, got {got}")]
    IncorrectLengthError {
        code: String,
        expected: usize,
        got: usize,
    },

    #[error("Error while applying event: {0}")]
    SemanticError(String),

    #[error("Unsupported event type: {0}")]
    UnsupportedEventType(String),

    #[error("Out of order event: expected sn {expected}, got {got}")]
    EventOutOfOrderError { expected: u64, got: u64 },

    #[error("Conflicting event already accepted at this sn")]
    EventDuplicateError,

    #[error("First event for a prefix must be an inception at sn 0")]
    MissingInceptionError,

    #[error("Prior event digest does not match the preceding event")]
    PriorDigestMismatch,

    #[error("New keys do not match the pre-rotation commitment")]
    NextKeysMismatch,

    #[error("Identifier accepts establishment events only")]
    EstablishmentOnlyError,

    #[error("Not enough signatures while verifying")]
    NotEnoughSigsError,

    #[error("Duplicate signature index")]
    DuplicateSignature,

    #[error("Too many signatures")]
    TooManySignatures,

    #[error("No event of given sn and prefix in the log")]
    NoEventError,

    #[error("Storage error")]
    StorageError,

    #[error(transparent)]
    Ed25519DalekSignatureError(#[from] ed25519_dalek::SignatureError),
}
