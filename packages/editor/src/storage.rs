//! Storage adapters.
//!
//! An adapter persists and recalls raw (serialized) editable trees. The
//! [`ContentService`](crate::ContentService) consults adapters in
//! configured order on fetch and fans every store call out to all of
//! them. Fetch and parse failures are adapter-local concerns; the
//! service only ever observes "no data returned".

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Fetch/store contract for one persistence backend.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// The stored tree for a handle, or `None` if this adapter has
    /// nothing for it.
    async fn fetch(&self, handle: &str) -> Option<Value>;

    /// Persist a serialized tree snapshot. Fire-and-forget: errors stay
    /// inside the adapter.
    async fn store(&self, state: &Value);
}

/// In-memory adapter, keyed by editable id. Doubles as the test double.
#[derive(Default)]
pub struct MemoryAdapter {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored tree under a handle, bypassing the async contract.
    pub fn seed(&self, handle: impl Into<String>, state: Value) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(handle.into(), state);
        }
    }

    pub fn get(&self, handle: &str) -> Option<Value> {
        self.entries.lock().ok()?.get(handle).cloned()
    }
}

#[async_trait]
impl StorageAdapter for MemoryAdapter {
    async fn fetch(&self, handle: &str) -> Option<Value> {
        self.entries.lock().ok()?.get(handle).cloned()
    }

    async fn store(&self, state: &Value) {
        let Some(id) = state.get("id").and_then(Value::as_str) else {
            return;
        };
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(id.to_string(), state.clone());
        }
    }
}

/// Adapter that never recalls anything and logs every store. Useful
/// while wiring up a new integration.
#[derive(Debug, Default)]
pub struct DebugAdapter;

#[async_trait]
impl StorageAdapter for DebugAdapter {
    async fn fetch(&self, _handle: &str) -> Option<Value> {
        None
    }

    async fn store(&self, state: &Value) {
        tracing::debug!(%state, "debug adapter received store");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_adapter_round_trips_by_id() {
        let adapter = MemoryAdapter::new();
        adapter.store(&json!({ "id": "doc", "cells": [] })).await;

        let fetched = adapter.fetch("doc").await;
        assert_eq!(fetched, Some(json!({ "id": "doc", "cells": [] })));
        assert_eq!(adapter.fetch("other").await, None);
    }

    #[tokio::test]
    async fn test_memory_adapter_ignores_idless_state() {
        let adapter = MemoryAdapter::new();
        adapter.store(&json!({ "cells": [] })).await;
        assert!(adapter.get("").is_none());
    }

    #[tokio::test]
    async fn test_debug_adapter_never_fetches() {
        let adapter = DebugAdapter;
        adapter.store(&json!({ "id": "doc" })).await;
        assert_eq!(adapter.fetch("doc").await, None);
    }
}
