// ─── Error ──────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("CBOR encode error: {0}")]
    Encode(String),
    #[error("CBOR decode error: {0}")]
    Decode(String),
    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("opaque type {0:?} has no binary form registered")]
    UnregisteredOther(String),
    #[error("encoded record names unknown opaque type {0:?}")]
    UnknownOtherType(String),
}
