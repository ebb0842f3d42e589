//! Event subscription command handlers.
//!
//! Subscribers register a filter and poll for buffered events. Events
//! that overflow the broadcast buffer between polls are dropped; the
//! poll response reports how many were lost.

use std::sync::Arc;

use serde_json::Value;

use crate::commands::require_str;
use crate::events::EventFilter;
use crate::rpc::RpcError;
use crate::{DaemonState, Subscription};

type Result = std::result::Result<Value, RpcError>;

/// Subscribe to daemon events. Returns a subscription ID.
pub async fn subscribe_events(state: &Arc<DaemonState>, params: &Value) -> Result {
    let filter = match params.get("filter") {
        Some(raw) => serde_json::from_value::<EventFilter>(raw.clone())
            .map_err(|e| RpcError::invalid_params(&format!("filter: {e}")))?,
        None => EventFilter::default(),
    };

    // Generate subscription ID
    let mut sub_id = [0u8; 16];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut sub_id);
    let sub_id = hex::encode(sub_id);

    let subscription = Subscription {
        filter,
        receiver: state.event_bus.subscribe(),
    };
    state
        .subscriptions
        .write()
        .await
        .insert(sub_id.clone(), subscription);

    Ok(serde_json::json!({"subscription_id": sub_id}))
}

/// Drain buffered events for a subscription.
pub async fn poll_events(state: &Arc<DaemonState>, params: &Value) -> Result {
    let sub_id = require_str(params, "subscription_id")?;

    let mut subscriptions = state.subscriptions.write().await;
    let subscription = subscriptions
        .get_mut(sub_id)
        .ok_or_else(|| RpcError::unknown_subscription(sub_id))?;

    let mut events = Vec::new();
    let mut lagged: u64 = 0;
    loop {
        match subscription.receiver.try_recv() {
            Ok(event) => {
                if subscription.filter.matches(&event) {
                    events.push(event);
                }
            }
            Err(tokio::sync::broadcast::error::TryRecvError::Lagged(n)) => lagged += n,
            Err(_) => break,
        }
    }

    Ok(serde_json::json!({"events": events, "dropped": lagged}))
}

/// Unsubscribe from daemon events.
pub async fn unsubscribe_events(state: &Arc<DaemonState>, params: &Value) -> Result {
    let sub_id = require_str(params, "subscription_id")?;

    let removed = state.subscriptions.write().await.remove(sub_id).is_some();
    if !removed {
        return Err(RpcError::unknown_subscription(sub_id));
    }

    Ok(serde_json::json!({"unsubscribed": true}))
}
