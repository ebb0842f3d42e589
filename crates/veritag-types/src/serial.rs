//! Product serial numbers.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::RegistryError;
use crate::MAX_SERIAL_BYTES;

/// A product serial number: the primary key of a product and the QR
/// payload verbatim. Non-empty UTF-8, at most [`MAX_SERIAL_BYTES`] bytes,
/// compared case-sensitively.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
pub struct Serial(String);

impl Serial {
    /// Validate and wrap a raw serial string.
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        if raw.is_empty() {
            return Err(RegistryError::InvalidArgument(
                "serial must not be empty".to_string(),
            ));
        }
        if raw.len() > MAX_SERIAL_BYTES {
            return Err(RegistryError::InvalidArgument(format!(
                "serial exceeds {MAX_SERIAL_BYTES} bytes"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// The serial as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Serial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Serial> for String {
    fn from(serial: Serial) -> Self {
        serial.0
    }
}
