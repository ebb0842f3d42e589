//! # veritag-types
//!
//! Shared domain types for the Veritag product-authentication registry.
//! Everything that crosses a crate boundary lives here: serials, caller
//! identities, product records, report entries, the wire-facing views,
//! and the registry error taxonomy.

pub mod error;
pub mod identity;
pub mod product;
pub mod report;
pub mod serial;
pub mod stats;

pub use error::RegistryError;
pub use identity::Identity;
pub use product::{ProductRecord, ProductView};
pub use report::Report;
pub use serial::Serial;
pub use stats::RegistryStats;

/// Maximum serial length in bytes (the QR payload verbatim).
pub const MAX_SERIAL_BYTES: usize = 128;

/// Maximum caller identity length in bytes.
pub const MAX_IDENTITY_BYTES: usize = 128;

/// Maximum product name / manufacturer length in bytes.
pub const MAX_FIELD_BYTES: usize = 256;

/// Maximum image handle length in bytes. Handles are opaque
/// content-addressed strings from an external object store.
pub const MAX_IMAGE_HANDLE_BYTES: usize = 256;

/// Maximum fraud-report note length in bytes.
pub const MAX_NOTE_BYTES: usize = 512;
