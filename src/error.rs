//! Error taxonomy for the dashboard core.
//!
//! Setup faults abort before streaming starts; a malformed inbound batch
//! rejects only its own tick and leaves every buffer in its pre-tick state.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GridscopeError>;

#[derive(Error, Debug)]
pub enum GridscopeError {
    /// Fatal pre-streaming fault (missing mapping source, unreadable pair
    /// configuration, ...).
    #[error("setup fault: {what}")]
    Setup { what: String },

    /// An inbound batch could not be interpreted; the tick is rejected.
    #[error("malformed message: missing or invalid field `{field}`")]
    MalformedMessage { field: &'static str },

    /// A numeric payload field was NaN or infinite.
    #[error("non-finite value for `{field}`: {value}")]
    NonFinite { field: &'static str, value: f64 },

    /// The dashboard consumer loop has gone away.
    #[error("dashboard channel closed")]
    ChannelClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML decode error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
