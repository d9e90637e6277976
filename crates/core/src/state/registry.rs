//! Registry of every project known to one orchestrator.

use crate::state::handle::ProjectHandle;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Entries {
    by_id: HashMap<Uuid, Arc<ProjectHandle>>,
    /// Insertion order, used for listing.
    order: Vec<Uuid>,
}

/// Concurrency-safe map from project id to its handle.
///
/// The registry lock is only held for lookups and inserts; all work on a
/// project goes through its own [`ProjectHandle`], so projects never
/// contend with each other.
#[derive(Default)]
pub struct ProjectRegistry {
    entries: RwLock<Entries>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle. Re-inserting an id keeps its original position.
    pub async fn insert(&self, handle: Arc<ProjectHandle>) {
        let mut entries = self.entries.write().await;
        let id = handle.id();
        if entries.by_id.insert(id, handle).is_none() {
            entries.order.push(id);
        }
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<ProjectHandle>> {
        self.entries.read().await.by_id.get(&id).cloned()
    }

    /// Every handle, in creation order.
    pub async fn list(&self) -> Vec<Arc<ProjectHandle>> {
        let entries = self.entries.read().await;
        entries
            .order
            .iter()
            .filter_map(|id| entries.by_id.get(id).cloned())
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_protocol::Project;

    #[tokio::test]
    async fn test_insert_and_get() {
        let registry = ProjectRegistry::new();
        assert!(registry.is_empty().await);

        let handle = Arc::new(ProjectHandle::new(Project::new("demo", "Rust", vec![])));
        let id = handle.id();
        registry.insert(handle).await;

        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.get(id).await.map(|h| h.id()), Some(id));
        assert!(registry.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_list_preserves_creation_order() {
        let registry = ProjectRegistry::new();
        let mut ids = Vec::new();
        for name in ["first", "second", "third"] {
            let handle = Arc::new(ProjectHandle::new(Project::new(name, "Go", vec![])));
            ids.push(handle.id());
            registry.insert(handle).await;
        }

        let listed: Vec<Uuid> = registry.list().await.iter().map(|h| h.id()).collect();
        assert_eq!(listed, ids);
    }
}
