//! Caller identities.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::RegistryError;
use crate::MAX_IDENTITY_BYTES;

/// An opaque caller identity assigned by the external identity provider
/// (a wallet address in the reference deployment). Compared for byte
/// equality only; no case folding.
///
/// "No owner" is represented as `Option<Identity>::None` in process and
/// as the empty string on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Validate and wrap a raw identity string supplied by the boundary.
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        if raw.is_empty() {
            return Err(RegistryError::InvalidArgument(
                "identity must not be empty".to_string(),
            ));
        }
        if raw.len() > MAX_IDENTITY_BYTES {
            return Err(RegistryError::InvalidArgument(format!(
                "identity exceeds {MAX_IDENTITY_BYTES} bytes"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

/// Render an optional owner for the wire: empty string means "no owner".
pub fn owner_to_wire(owner: Option<&Identity>) -> String {
    owner.map(|o| o.0.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let id = Identity::parse("0xA1B2").expect("valid identity");
        assert_eq!(id.as_str(), "0xA1B2");
    }

    #[test]
    fn test_parse_empty_rejected() {
        assert!(matches!(
            Identity::parse(""),
            Err(RegistryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_oversized_rejected() {
        let raw = "a".repeat(MAX_IDENTITY_BYTES + 1);
        assert!(matches!(
            Identity::parse(&raw),
            Err(RegistryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_byte_equality() {
        let a = Identity::parse("0xAbC").expect("parse");
        let b = Identity::parse("0xabc").expect("parse");
        assert_ne!(a, b, "identities are compared byte-exact");
    }

    #[test]
    fn test_owner_to_wire() {
        let id = Identity::parse("0xB").expect("parse");
        assert_eq!(owner_to_wire(Some(&id)), "0xB");
        assert_eq!(owner_to_wire(None), "");
    }
}
