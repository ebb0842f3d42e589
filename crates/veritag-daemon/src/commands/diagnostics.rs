//! Daemon diagnostics command handlers.

use std::sync::Arc;

use serde_json::Value;

use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Basic daemon info for health checks and support bundles.
pub async fn get_daemon_info(state: &Arc<DaemonState>) -> Result {
    Ok(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "data_dir": state.config.data_dir().display().to_string(),
        "events_emitted": state.event_bus.sequence(),
    }))
}

/// Request a graceful daemon shutdown.
pub async fn shutdown(state: &Arc<DaemonState>) -> Result {
    // No receiver means the daemon is already shutting down
    let _ = state.shutdown_tx.send(());
    Ok(serde_json::json!({"shutting_down": true}))
}
