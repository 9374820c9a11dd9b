use thiserror::Error;

use crate::domain::ErrorInstance;

/// Programming errors made while configuring the registry or handlers.
///
/// These are deliberately NOT routed through the assertion engine: the engine
/// needs a registered `AssertError` variant before it can report anything,
/// so registry input validation has to stand on its own.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot create unnamed error")]
    MissingName,

    #[error("error name must not be empty")]
    EmptyName,

    #[error("`{0}` is reserved and cannot be used as an error name")]
    ReservedName(String),

    #[error("error `{0}` is already registered")]
    DuplicateVariant(String),

    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum RektError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("no handler registered for `{0}`")]
    HandlerNotFound(String),

    #[error("no error registered under `{0}`")]
    UnknownVariant(String),

    #[error(transparent)]
    Raised(#[from] ErrorInstance),
}

impl RektError {
    /// The realized error carried by this value, if any.
    pub fn instance(&self) -> Option<&ErrorInstance> {
        match self {
            RektError::Raised(err) => Some(err),
            _ => None,
        }
    }
}
