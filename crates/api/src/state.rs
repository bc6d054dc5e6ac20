use std::sync::Arc;

use tuneiq_core::catalog::TrackCatalog;
use tuneiq_core::store::GameStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Persistence for assembled games.
    pub store: Arc<dyn GameStore>,
    /// Source of candidate tracks.
    pub catalog: Arc<dyn TrackCatalog>,
}
