use std::sync::Arc;

use kafra_core::instance::InstanceTicks;
use tokio::sync::RwLock;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything behind an `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: kafra_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Instance completion flags. Memory only, lost on restart.
    pub ticks: Arc<RwLock<InstanceTicks>>,
}

impl AppState {
    pub fn new(pool: kafra_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            ticks: Arc::new(RwLock::new(InstanceTicks::new())),
        }
    }
}
