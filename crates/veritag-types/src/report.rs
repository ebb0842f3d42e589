//! Fraud report entries.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::identity::Identity;
use crate::serial::Serial;

/// A consumer-submitted fraud report against a serial, recorded
/// append-only. The serial need not be registered: reports against
/// unknown serials are the expected counterfeit signal, and reports
/// against registered products do not invalidate the registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Report {
    /// The serial being reported.
    pub serial: Serial,
    /// The identity that filed the report.
    pub reporter: Identity,
    /// Free-form note; possibly empty.
    pub note: String,
    /// Unix timestamp of submission.
    pub reported_at: u64,
}
