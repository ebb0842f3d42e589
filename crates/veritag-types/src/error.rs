//! Registry error taxonomy.

use crate::identity::Identity;
use crate::serial::Serial;

/// Errors surfaced by registry operations. Kinds are stable; messages are
/// for humans.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    /// A request field failed validation (empty, oversized, malformed).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The serial is already registered.
    #[error("serial '{0}' is already registered")]
    DuplicateSerial(Serial),

    /// No product with this serial exists.
    #[error("no product with serial '{0}'")]
    NotFound(Serial),

    /// The product has already been claimed. Carries the current owner so
    /// the UI can show it.
    #[error("product '{serial}' already claimed by {owner}")]
    AlreadyClaimed {
        /// The serial that was being claimed.
        serial: Serial,
        /// The identity that holds the product.
        owner: Identity,
    },

    /// Reserved for a future authorization policy layered above the core.
    /// Never returned in demo mode.
    #[error("permission denied")]
    PermissionDenied,

    /// Durable-storage failure. The operation left all state unchanged;
    /// retries are the caller's responsibility.
    #[error("storage error: {0}")]
    Storage(String),
}

impl RegistryError {
    /// Stable machine-readable kind name for the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::DuplicateSerial(_) => "DUPLICATE_SERIAL",
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyClaimed { .. } => "ALREADY_CLAIMED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_stable() {
        let serial = Serial::parse("SN-1").expect("parse");
        let owner = Identity::parse("0xA").expect("parse");

        assert_eq!(
            RegistryError::InvalidArgument("x".to_string()).kind(),
            "INVALID_ARGUMENT"
        );
        assert_eq!(
            RegistryError::DuplicateSerial(serial.clone()).kind(),
            "DUPLICATE_SERIAL"
        );
        assert_eq!(RegistryError::NotFound(serial.clone()).kind(), "NOT_FOUND");
        assert_eq!(
            RegistryError::AlreadyClaimed { serial, owner }.kind(),
            "ALREADY_CLAIMED"
        );
    }

    #[test]
    fn test_already_claimed_message_names_owner() {
        let err = RegistryError::AlreadyClaimed {
            serial: Serial::parse("SN-1").expect("parse"),
            owner: Identity::parse("0xB").expect("parse"),
        };
        assert!(err.to_string().contains("0xB"));
    }
}
