//! Variant model: a named, status-coded error template.
//!
//! A variant is registered once and reused to construct `ErrorInstance`s.
//! Names are validated up front so that the registry never holds an empty or
//! reserved key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::instance::ErrorInstance;
use crate::error::ConfigError;

/// Status used when a variant is registered without one.
pub const DEFAULT_STATUS: u16 = 500;

/// Names that would shadow an entry point of the context object.
pub const RESERVED_NAMES: &[&str] = &[
    "assert",
    "createError",
    "registerError",
    "register_error",
    "setLogger",
    "set_logger",
    "setHandler",
    "set_handler",
    "handle",
    "dispatch",
    "log",
    "registeredHandlers",
    "registered_handlers",
];

/// A validated variant name: non-empty and not reserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ErrorName(String);

impl ErrorName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_reserved(name: &str) -> bool {
        RESERVED_NAMES.contains(&name)
    }
}

impl FromStr for ErrorName {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if Self::is_reserved(s) {
            return Err(ConfigError::ReservedName(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for ErrorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ErrorName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Registration request, mirroring `{ name, status }`.
///
/// Both fields are optional on the wire so that a nameless request can be
/// rejected with a proper `ConfigError::MissingName` instead of a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_message: Option<String>,
}

impl ErrorSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_default_message(mut self, message: impl Into<String>) -> Self {
        self.default_message = Some(message.into());
        self
    }

    /// Validate and turn the request into a variant.
    ///
    /// A status of `0` counts as unspecified and falls back to
    /// [`DEFAULT_STATUS`].
    pub fn into_variant(self) -> Result<ErrorVariant, ConfigError> {
        let name: ErrorName = self.name.ok_or(ConfigError::MissingName)?.parse()?;
        let status = match self.status {
            None | Some(0) => DEFAULT_STATUS,
            Some(status) => status,
        };
        Ok(ErrorVariant {
            name,
            status,
            default_message: self.default_message,
        })
    }
}

/// A registered error kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorVariant {
    name: ErrorName,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_message: Option<String>,
}

impl ErrorVariant {
    pub fn new(name: ErrorName, status: u16) -> Self {
        Self {
            name,
            status,
            default_message: None,
        }
    }

    pub fn name(&self) -> &ErrorName {
        &self.name
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn default_message(&self) -> Option<&str> {
        self.default_message.as_deref()
    }

    /// Construct a fresh instance carrying `message`.
    pub fn instance(&self, message: impl Into<String>) -> ErrorInstance {
        ErrorInstance::new(self.name.as_str(), self.status, Some(message.into()))
    }

    /// Construct an instance without an explicit message; the variant's
    /// default message is used when it has one.
    pub fn bare(&self) -> ErrorInstance {
        ErrorInstance::new(self.name.as_str(), self.status, self.default_message.clone())
    }
}
