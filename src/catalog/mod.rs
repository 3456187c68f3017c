//! In-memory index of the remote API surface.
//!
//! The catalog is populated once per session from a cached discovery
//! payload (or the built-in fallback payload) and rebuilt in full on
//! `sync`. Rebuilds swap the whole value; nothing mutates a live catalog
//! in place, so readers never observe a partially built index.

pub mod builtin;
pub mod ingest;
pub mod models;
pub mod verbs;

use std::collections::HashMap;
use std::sync::Arc;

use models::Operation;

/// The full keyed set of ingested operations, looked up by lower-cased
/// operation name.
#[derive(Debug, Default)]
pub struct ApiCatalog {
    operations: HashMap<String, Arc<Operation>>,
}

impl ApiCatalog {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, op: Operation) {
        self.operations.insert(op.name.to_lowercase(), Arc::new(op));
    }

    /// Case-insensitive operation lookup.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Operation>> {
        self.operations.get(&name.to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn operations(&self) -> impl Iterator<Item = &Arc<Operation>> {
        self.operations.values()
    }

    /// All operation names in their canonical casing, sorted ascending.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.operations.values().map(|op| op.name.clone()).collect();
        names.sort();
        names
    }
}
