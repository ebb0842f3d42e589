//! Integration test crate for the Veritag registry.
//!
//! This crate has no library code; it only contains integration tests
//! that exercise end-to-end registry flows across the workspace crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p veritag-integration-tests
//! ```
