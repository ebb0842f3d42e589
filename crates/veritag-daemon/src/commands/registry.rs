//! Registry command handlers.
//!
//! Each handler extracts parameters, calls the authority service, and
//! serializes the result. Mutations emit an advisory event after the
//! registry transaction has committed.

use std::sync::Arc;

use serde_json::Value;

use crate::commands::{caller, require_str};
use crate::events::Event;
use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Register a fresh serial.
pub async fn register_product(state: &Arc<DaemonState>, params: &Value) -> Result {
    let caller = caller(params)?;
    let serial = require_str(params, "serial")?;
    let name = require_str(params, "name")?;
    let manufacturer = require_str(params, "manufacturer")?;
    let image_handle = params
        .get("imageHandle")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    let serial = state
        .registry
        .register(&caller, serial, name, manufacturer, image_handle)?;

    state.emit(Event {
        event_type: "ProductRegistered".to_string(),
        timestamp: unix_now(),
        payload: serde_json::json!({
            "serial": serial.as_str(),
            "registrar": caller.as_str(),
        }),
    });

    Ok(serde_json::json!({"serial": serial.as_str()}))
}

/// Look up a serial and count the scan.
pub async fn verify_product(state: &Arc<DaemonState>, params: &Value) -> Result {
    let serial = require_str(params, "serial")?;
    let view = state.registry.verify(serial)?;
    serde_json::to_value(view).map_err(|e| RpcError::internal_error(&e.to_string()))
}

/// Claim ownership of an unclaimed product.
pub async fn claim_ownership(state: &Arc<DaemonState>, params: &Value) -> Result {
    let caller = caller(params)?;
    let serial = require_str(params, "serial")?;

    state.registry.claim(&caller, serial)?;

    state.emit(Event {
        event_type: "ProductClaimed".to_string(),
        timestamp: unix_now(),
        payload: serde_json::json!({
            "serial": serial,
            "owner": caller.as_str(),
        }),
    });

    Ok(serde_json::json!({"claimed": true}))
}

/// File a fraud report against a serial.
pub async fn report_fake(state: &Arc<DaemonState>, params: &Value) -> Result {
    let caller = caller(params)?;
    let serial = require_str(params, "serial")?;
    let note = params.get("note").and_then(|v| v.as_str()).unwrap_or("");

    state.registry.report_fake(&caller, serial, note)?;

    state.emit(Event {
        event_type: "FakeReported".to_string(),
        timestamp: unix_now(),
        payload: serde_json::json!({
            "serial": serial,
            "reporter": caller.as_str(),
        }),
    });

    Ok(serde_json::json!({"reported": true}))
}

/// List an owner's serials in acquisition order.
pub async fn get_user_products(state: &Arc<DaemonState>, params: &Value) -> Result {
    let raw = require_str(params, "owner")?;
    let owner = veritag_types::Identity::parse(raw).map_err(RpcError::from)?;

    let serials = state.registry.user_products(&owner)?;
    let result: Vec<&str> = serials.iter().map(|s| s.as_str()).collect();
    Ok(serde_json::json!(result))
}

/// Fetch the product view without counting a scan.
pub async fn get_product_details(state: &Arc<DaemonState>, params: &Value) -> Result {
    let serial = require_str(params, "serial")?;
    let view = state.registry.product_details(serial)?;
    serde_json::to_value(view).map_err(|e| RpcError::internal_error(&e.to_string()))
}

/// List reports filed against one serial.
pub async fn get_reports(state: &Arc<DaemonState>, params: &Value) -> Result {
    let serial = require_str(params, "serial")?;
    let reports = state.registry.reports_for(serial)?;
    serde_json::to_value(reports).map_err(|e| RpcError::internal_error(&e.to_string()))
}

/// List the full report log.
pub async fn list_reports(state: &Arc<DaemonState>) -> Result {
    let reports = state.registry.list_reports()?;
    serde_json::to_value(reports).map_err(|e| RpcError::internal_error(&e.to_string()))
}

/// Read the registry counters.
pub async fn get_registry_stats(state: &Arc<DaemonState>) -> Result {
    let stats = state.registry.stats()?;
    serde_json::to_value(stats).map_err(|e| RpcError::internal_error(&e.to_string()))
}

/// Current Unix time in seconds.
fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
