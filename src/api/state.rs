use std::sync::Arc;

use crate::services::{Catalog, CategoryGraph, WatchlistStore};

/// Shared application state
///
/// Catalog and graph are immutable after startup and need no locking. The
/// watchlist store handles its own per-user locking.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub graph: Arc<CategoryGraph>,
    pub watchlists: Arc<WatchlistStore>,
}

impl AppState {
    /// Builds the state, deriving the genre graph from the catalog
    pub fn new(catalog: Catalog, watchlists: WatchlistStore) -> Self {
        let graph = CategoryGraph::build(&catalog);
        Self {
            catalog: Arc::new(catalog),
            graph: Arc::new(graph),
            watchlists: Arc::new(watchlists),
        }
    }
}
