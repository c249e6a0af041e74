use std::sync::Arc;

use crate::reconcile::SaveTracker;
use crate::store::StoreConnector;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Builds a backend client scoped to the caller's bearer token.
    pub store: Arc<dyn StoreConnector>,
    /// Save state per job; rejects overlapping saves of the same job.
    pub saves: SaveTracker,
}
