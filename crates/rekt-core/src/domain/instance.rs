//! ErrorInstance: a realized error produced from a registered variant.

use std::fmt;

use serde::Serialize;

/// Anything a response-shaping collaborator can turn into a reply:
/// `status` becomes the wire status code, `name`/`message` the payload.
pub trait Reportable {
    fn name(&self) -> &str;
    fn status(&self) -> u16;
    fn message(&self) -> Option<&str>;
}

/// A realized error.
///
/// Serializes as `{"name", "status", "message", "isRekt"}` so it can be
/// handed to a transport layer as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInstance {
    name: String,
    status: u16,
    message: Option<String>,
    #[serde(rename = "isRekt")]
    is_rekt: bool,
}

impl ErrorInstance {
    pub(crate) fn new(name: impl Into<String>, status: u16, message: Option<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message,
            is_rekt: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Origin marker: set on every instance built by a registry.
    pub fn is_rekt(&self) -> bool {
        self.is_rekt
    }
}

impl Reportable for ErrorInstance {
    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> u16 {
        self.status
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for ErrorInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{} ({}): {}", self.name, self.status, message),
            None => write!(f, "{} ({})", self.name, self.status),
        }
    }
}

impl std::error::Error for ErrorInstance {}
