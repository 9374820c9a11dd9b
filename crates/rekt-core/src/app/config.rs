//! Configuration for a `Rekt` context.
//!
//! ```json
//! {
//!   "overwrite": "reject",
//!   "default_message": "Assert Error",
//!   "errors": [{ "name": "PaymentFailed", "status": 402 }]
//! }
//! ```
//!
//! Every field is optional. `RektConfig::default()` matches the behavior of a
//! plain `Rekt::new()`.

use serde::{Deserialize, Serialize};

use crate::assertion::DEFAULT_MESSAGE;
use crate::domain::ErrorSpec;
use crate::error::ConfigError;
use crate::registry::OverwritePolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RektConfig {
    /// Re-registration policy for the error registry.
    pub overwrite: OverwritePolicy,

    /// Message of an assertion failure that has no message parts.
    pub default_message: String,

    /// Extra variants registered after the built-ins, in order.
    pub errors: Vec<ErrorSpec>,
}

impl Default for RektConfig {
    fn default() -> Self {
        Self {
            overwrite: OverwritePolicy::default(),
            default_message: DEFAULT_MESSAGE.to_string(),
            errors: Vec::new(),
        }
    }
}

impl RektConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }
}
