//! Query functions, one module per table.

pub mod owners;
pub mod products;
pub mod reports;
pub mod stats;
