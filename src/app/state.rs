use crate::engine::ProviderGraph;
use std::sync::Arc;

/// Shared application state holding the built provider graph.
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<ProviderGraph>,
}

impl AppState {
    #[must_use]
    pub fn new(graph: ProviderGraph) -> Self {
        Self {
            graph: Arc::new(graph),
        }
    }
}
