use std::collections::HashMap;
use std::sync::Arc;

use crate::traits::RetrievalAdapter;

/// Named pool of single-adapter retrieval clients (weather, sports,
/// airports). Web-search providers live in `ParallelSearchEngine`
/// instead, since they are always invoked as a fan-out group.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn RetrievalAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, adapter: Arc<dyn RetrievalAdapter>) {
        self.adapters.insert(adapter.name().to_string(), adapter);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn RetrievalAdapter>> {
        self.adapters.get(name).cloned()
    }

    /// `{name: healthy}` used by `GET /health`. An adapter counts healthy
    /// here if it exists — actual reachability is only known per-call.
    pub fn names(&self) -> Vec<String> {
        self.adapters.keys().cloned().collect()
    }
}
