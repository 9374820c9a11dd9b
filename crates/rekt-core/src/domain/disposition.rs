//! Disposition: how the embedding application should treat a failure.
//!
//! The library never terminates the process itself. It only classifies.

use serde::{Deserialize, Serialize};

use super::instance::Reportable;

/// Classification of a reported error.
///
/// Serialized as SCREAMING_SNAKE_CASE: FATAL / RECOVERABLE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Disposition {
    /// Server-side fault (status >= 500). The embedding application may
    /// choose to terminate.
    Fatal,
    /// Client-side or domain fault. Reply and carry on.
    Recoverable,
}

impl Disposition {
    pub fn of(err: &(impl Reportable + ?Sized)) -> Self {
        Self::from_status(err.status())
    }

    pub fn from_status(status: u16) -> Self {
        if status >= 500 {
            Disposition::Fatal
        } else {
            Disposition::Recoverable
        }
    }

    pub fn is_fatal(self) -> bool {
        self == Disposition::Fatal
    }
}
