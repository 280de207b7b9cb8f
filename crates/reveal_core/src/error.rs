//! Error types shared by the Reveal crates

use thiserror::Error;

use crate::scene::NodeId;

/// Errors raised while building or configuring the engine
///
/// Runtime visibility handling never produces these: missing groups,
/// detached nodes and double disposal are all silent no-ops.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RevealError {
    /// A counter value string had no parsable number in it
    #[error("Invalid counter value: {0:?}")]
    InvalidCounterValue(String),

    /// An easing identifier was not recognised
    #[error("Unknown easing: {0:?}")]
    UnknownEasing(String),

    /// A length literal could not be parsed (expected `px`, `vw` or `vh`)
    #[error("Invalid length: {0:?}")]
    InvalidLength(String),

    /// Two scene nodes share an id
    #[error("Duplicate scene node id: {0}")]
    DuplicateNode(NodeId),

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The host cannot report viewport geometry
    #[error("Visibility observation unsupported: {0}")]
    ObservationUnsupported(String),
}

/// Result type for Reveal operations
pub type Result<T> = std::result::Result<T, RevealError>;
