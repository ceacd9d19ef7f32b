//! Per-table identity map.
//!
//! # Responsibility
//! - Map each persisted row id to the single live instance for that row.
//! - Refresh cached instances in place when their row is fetched again.
//!
//! # Invariants
//! - At most one instance per id is reachable through the map.
//! - Entries are added on save or first fetch and removed on delete or
//!   explicit `clear`. Nothing else evicts them.

use crate::model::RecordId;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Cache of live instances keyed by row id.
#[derive(Debug)]
pub struct IdentityMap<T> {
    table: &'static str,
    entries: RefCell<HashMap<RecordId, Rc<T>>>,
}

impl<T> IdentityMap<T> {
    /// Creates an empty map for `table`.
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            entries: RefCell::new(HashMap::new()),
        }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Returns the cached instance for `id`, if any.
    pub fn cached(&self, id: RecordId) -> Option<Rc<T>> {
        self.entries.borrow().get(&id).cloned()
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.entries.borrow().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drops every cached instance. Instances held elsewhere stay alive but
    /// are no longer the canonical handle for their row.
    pub fn clear(&self) {
        let dropped = {
            let mut entries = self.entries.borrow_mut();
            let count = entries.len();
            entries.clear();
            count
        };
        debug!(
            "event=identity_map_reset module=repo table={} dropped={dropped}",
            self.table
        );
    }

    pub(crate) fn insert(&self, id: RecordId, instance: Rc<T>) {
        self.entries.borrow_mut().insert(id, instance);
        debug!(
            "event=identity_map_insert module=repo table={} id={id}",
            self.table
        );
    }

    pub(crate) fn evict(&self, id: RecordId) -> Option<Rc<T>> {
        let evicted = self.entries.borrow_mut().remove(&id);
        debug!(
            "event=identity_map_evict module=repo table={} id={id} cached={}",
            self.table,
            evicted.is_some()
        );
        evicted
    }

    /// Returns the canonical instance for row `id`.
    ///
    /// `fresh` must already be fully validated. A cached instance receives
    /// its values through `refresh`; otherwise `fresh` itself is cached.
    pub(crate) fn resolve(&self, id: RecordId, fresh: T, refresh: fn(&T, T)) -> Rc<T> {
        if let Some(existing) = self.cached(id) {
            debug!(
                "event=identity_map_hit module=repo table={} id={id}",
                self.table
            );
            refresh(&existing, fresh);
            return existing;
        }
        let instance = Rc::new(fresh);
        self.insert(id, Rc::clone(&instance));
        instance
    }
}
