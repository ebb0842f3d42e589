//! Registry-wide counters.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Process-wide monotonic counters. `total_products` and `total_reports`
/// always equal the sizes of the product store and report log;
/// `total_scans` counts successful `verify` lookups only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegistryStats {
    pub total_products: u64,
    pub total_scans: u64,
    pub total_reports: u64,
}
