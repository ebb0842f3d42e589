//! veritag-daemon: the Veritag registry daemon.
//!
//! Single OS process running a Tokio async runtime. Clients (the
//! browser-UI backend, CLI tooling) talk JSON-RPC over a Unix socket;
//! every call carries the caller identity resolved by the boundary.

mod commands;
mod config;
mod events;
mod rpc;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::{error, info};
use veritag_registry::Registry;

use crate::config::DaemonConfig;
use crate::events::{Event, EventBus, EventFilter};
use crate::rpc::RpcServer;

/// A registered event subscription.
pub struct Subscription {
    /// Which events the subscriber wants.
    pub filter: EventFilter,
    /// Receiving end of the event bus.
    pub receiver: broadcast::Receiver<Event>,
}

/// Daemon-wide shared state.
pub struct DaemonState {
    /// The authoritative product registry.
    pub registry: Arc<Registry>,
    /// Configuration.
    pub config: DaemonConfig,
    /// Event bus for pushing events to subscribers.
    pub event_bus: EventBus,
    /// Active event subscriptions, keyed by subscription ID.
    pub subscriptions: RwLock<HashMap<String, Subscription>>,
    /// Shutdown signal sender.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl DaemonState {
    /// Emit an event on the bus.
    pub fn emit(&self, event: Event) {
        self.event_bus.emit(event);
    }

    /// State backed by an in-memory registry (for testing).
    #[cfg(test)]
    pub fn in_memory() -> anyhow::Result<Self> {
        let (shutdown_tx, _) = broadcast::channel(1);
        Ok(Self {
            registry: Arc::new(Registry::open_memory()?),
            config: DaemonConfig::default(),
            event_bus: EventBus::new(16),
            subscriptions: RwLock::new(HashMap::new()),
            shutdown_tx,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = DaemonConfig::load()?;

    // Initialize tracing; RUST_LOG still overrides the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("veritag={}", config.advanced.log_level).parse()?),
        )
        .init();

    info!("Veritag daemon starting");

    let data_dir = config.data_dir();

    // Ensure data directory exists
    std::fs::create_dir_all(&data_dir)?;

    // 2. Open the registry
    let db_path = data_dir.join("veritag.db");
    let registry = Arc::new(Registry::open(&db_path)?);

    // 3. Create event bus
    let event_bus = EventBus::new(config.rpc.event_buffer);

    // 4. Create shutdown channel
    let (shutdown_tx, _shutdown_rx) = broadcast::channel(1);

    // 5. Build daemon state
    let socket_path = config.socket_path();
    let state = Arc::new(DaemonState {
        registry,
        config,
        event_bus,
        subscriptions: RwLock::new(HashMap::new()),
        shutdown_tx: shutdown_tx.clone(),
    });

    // 6. Start IPC server
    let rpc_server = RpcServer::new(state.clone(), socket_path.clone());
    info!("Starting JSON-RPC server on {:?}", socket_path);

    // 7. Emit DaemonStarted event
    state.emit(Event {
        event_type: "DaemonStarted".to_string(),
        timestamp: std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        payload: serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
        }),
    });

    // 8. Run the RPC server until shutdown
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::select! {
        result = rpc_server.run() => {
            if let Err(e) = result {
                error!("RPC server error: {}", e);
            }
        }
        _ = shutdown_rx.recv() => {
            info!("Shutdown signal received");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down");
        }
    }

    // Graceful shutdown
    info!("Daemon shutting down gracefully");

    // Clean up socket file
    let _ = std::fs::remove_file(&socket_path);

    info!("Daemon stopped");
    Ok(())
}
