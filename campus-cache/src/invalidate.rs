//! Mutation-driven cache invalidation.
//!
//! After a successful create/update/delete, every cached view of the mutated
//! resource family is dropped: all pages, filters, and sorts of the
//! collection, plus cached item views under it. Scoping follows the
//! narrowest context available from the mutation call, so a write under
//! institute A never purges institute B's entries, and a write scoped to one
//! class leaves sibling classes' cached data alone.
//!
//! Invalidation is infallible by construction and therefore can never mask
//! the success of the mutation that triggered it.

use std::sync::Arc;

use campus_core::RequestContext;
use tracing::debug;

use crate::entry::EntryStore;

/// Computes and purges the cache-key family affected by a mutation.
#[derive(Debug, Clone)]
pub struct InvalidationEngine {
    store: Arc<EntryStore>,
}

impl InvalidationEngine {
    pub fn new(store: Arc<EntryStore>) -> Self {
        Self { store }
    }

    /// Purge every entry belonging to the resource family at `endpoint`
    /// whose context carries the same values for every dimension present in
    /// `context`. Returns the number of entries removed.
    pub fn invalidate(&self, endpoint: &str, context: &RequestContext) -> usize {
        let removed = self
            .store
            .remove_matching(|key| key.matches_family(endpoint, context));
        if removed > 0 {
            debug!(endpoint, removed, "invalidated cache entries after mutation");
        }
        removed
    }

    /// Purge the whole store. Used on logout.
    pub fn invalidate_all(&self) {
        self.store.clear();
        debug!("cleared entire cache");
    }
}
