// Application state module
// Shared by every connection task: configuration plus the hero store

use std::sync::atomic::AtomicUsize;
use tokio::sync::watch;

use super::types::Config;
use crate::store::HeroStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: HeroStore,
    /// Connections currently being served
    pub active_connections: AtomicUsize,
    /// Flipped to `true` when the server stops accepting; live connections
    /// finish their current request and close
    pub draining: watch::Sender<bool>,
}

impl AppState {
    /// Create `AppState` with an empty store
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            store: HeroStore::new(),
            active_connections: AtomicUsize::new(0),
            draining: watch::channel(false).0,
        }
    }
}
