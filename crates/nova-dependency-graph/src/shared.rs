use std::sync::Arc;

use parking_lot::RwLock;

use crate::DependencyGraph;

/// The dependency graph of the latest sync, shared between request handlers.
///
/// Readers take a [`snapshot`](Self::snapshot) and keep querying it even if a newer sync
/// [`replace`](Self::replace)s the graph in the meantime.
#[derive(Debug, Default)]
pub struct SharedDependencyGraph {
    current: RwLock<Arc<DependencyGraph>>,
}

impl SharedDependencyGraph {
    pub fn new(graph: DependencyGraph) -> Self {
        Self {
            current: RwLock::new(Arc::new(graph)),
        }
    }

    pub fn snapshot(&self) -> Arc<DependencyGraph> {
        Arc::clone(&self.current.read())
    }

    /// Install the graph of a new sync, returning the previous one.
    pub fn replace(&self, graph: DependencyGraph) -> Arc<DependencyGraph> {
        let graph = Arc::new(graph);
        tracing::debug!(
            target: "nova.dependency_graph",
            targets = graph.len(),
            "replacing dependency graph"
        );
        std::mem::replace(&mut *self.current.write(), graph)
    }
}
