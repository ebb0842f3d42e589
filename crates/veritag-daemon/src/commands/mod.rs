//! Command handlers for the JSON-RPC surface.

pub mod diagnostics;
pub mod events;
pub mod registry;

use serde_json::Value;
use veritag_types::Identity;

use crate::rpc::RpcError;

/// Extract a required string parameter.
fn require_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, RpcError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params(&format!("{key} required")))
}

/// Extract and validate the caller identity supplied by the boundary.
fn caller(params: &Value) -> Result<Identity, RpcError> {
    let raw = require_str(params, "caller")?;
    Identity::parse(raw).map_err(RpcError::from)
}
