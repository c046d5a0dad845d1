//! Hard invalidation of derived assets.

use tracing::info;

use crate::assets::AssetStore;

use super::{DependencyGraph, PipelineStep};

/// Clears every asset derived from a step that is about to be regenerated.
///
/// Derived content is computed from the upstream text verbatim, so once the
/// upstream is regenerated the derived asset reverts to never-generated:
/// content and version history both go.
#[derive(Debug, Clone, Default)]
pub struct InvalidationManager {
    graph: DependencyGraph,
}

impl InvalidationManager {
    pub fn new(graph: DependencyGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Every step derived from `step`, directly or transitively, in step order.
    pub fn affected(&self, step: PipelineStep) -> Vec<PipelineStep> {
        self.graph.transitive_dependents(step).into_iter().collect()
    }

    /// The affected steps that currently hold content.
    pub fn populated_dependents(&self, step: PipelineStep, store: &AssetStore) -> Vec<PipelineStep> {
        self.affected(step)
            .into_iter()
            .filter(|s| store.has_content(*s) || !store.history(*s).is_empty())
            .collect()
    }

    /// Regenerating `step` would destroy content and must be confirmed first.
    pub fn needs_confirmation(&self, step: PipelineStep, store: &AssetStore) -> bool {
        !self.populated_dependents(step, store).is_empty()
    }

    /// Discard every dependent of `step`; returns the ones that held anything.
    ///
    /// `step`'s own history is left alone.
    pub fn on_regenerate(&self, step: PipelineStep, store: &mut AssetStore) -> Vec<PipelineStep> {
        let cleared = self.populated_dependents(step, store);
        for dependent in self.affected(step) {
            store.discard(dependent);
        }
        if !cleared.is_empty() {
            let keys: Vec<_> = cleared.iter().map(|s| s.key()).collect();
            info!(%step, cleared = %keys.join(", "), "Invalidated derived assets");
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::VersionSource;
    use PipelineStep::*;

    fn populated_store() -> AssetStore {
        let mut store = AssetStore::new();
        store
            .commit(Generate, "Hello world", VersionSource::AiGenerated)
            .unwrap();
        store
            .commit(Brief, "Brief: Hello world", VersionSource::AiGenerated)
            .unwrap();
        store
            .commit(PlatformCopy, "Copy", VersionSource::AiGenerated)
            .unwrap();
        store
    }

    #[test]
    fn affected_lists_transitive_dependents() {
        let manager = InvalidationManager::default();
        assert_eq!(manager.affected(Generate), vec![Brief, PlatformCopy]);
        assert_eq!(manager.affected(Brief), vec![PlatformCopy]);
        assert!(manager.affected(PlatformCopy).is_empty());
    }

    #[test]
    fn regenerating_root_clears_whole_chain() {
        let manager = InvalidationManager::default();
        let mut store = populated_store();

        let cleared = manager.on_regenerate(Generate, &mut store);

        assert_eq!(cleared, vec![Brief, PlatformCopy]);
        assert_eq!(store.current(Brief), None);
        assert!(store.history(Brief).is_empty());
        assert_eq!(store.current(PlatformCopy), None);
        assert!(store.history(PlatformCopy).is_empty());
        assert_eq!(store.current(Generate), Some("Hello world"));
        assert_eq!(store.history(Generate).len(), 1);
    }

    #[test]
    fn regenerating_middle_keeps_upstream() {
        let manager = InvalidationManager::default();
        let mut store = populated_store();

        manager.on_regenerate(Brief, &mut store);

        assert!(store.has_content(Generate));
        assert!(store.has_content(Brief));
        assert!(!store.has_content(PlatformCopy));
    }

    #[test]
    fn confirmation_only_needed_with_populated_dependents() {
        let manager = InvalidationManager::default();
        let mut store = AssetStore::new();
        store
            .commit(Generate, "Hello", VersionSource::AiGenerated)
            .unwrap();
        assert!(!manager.needs_confirmation(Generate, &store));

        store
            .commit(Brief, "Brief", VersionSource::AiGenerated)
            .unwrap();
        assert!(manager.needs_confirmation(Generate, &store));
        assert!(!manager.needs_confirmation(PlatformCopy, &store));
    }
}
