//! Error types for population management

use std::io;

/// Rejected evolution settings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvolveError {
    #[error("invalid evolution config: {0}")]
    InvalidConfig(String),
}

/// Failure to store or restore a population.
///
/// `Population::store` and `Population::load` log these and report `false`;
/// the `try_` variants return them.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("no storage target configured")]
    NoTarget,

    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("stored population is malformed: {0}")]
    Format(#[from] serde_json::Error),

    #[error("stored population is inconsistent: {0}")]
    Inconsistent(String),
}
