//! # Content Service
//!
//! Fetching, storing and transforming editable content trees.
//!
//! Three transformations move a tree across the storage boundary:
//!
//! ```text
//! Fetch → Hydrate → Unserialize → Editable → Serialize → Store
//!   ↓        ↓           ↓            ↓           ↓         ↓
//! Value   ids set   descriptors   mutations   name/ver   Value
//! ```
//!
//! - **hydrate** assigns ids to every node that lacks one. Idempotent.
//! - **unserialize** resolves plugin references to registry descriptors
//!   and runs the content plugin's `unserialize` hook over the state.
//!   An unknown plugin is a hard error: such a document cannot be
//!   rendered or edited, so it must not load partially.
//! - **serialize** is the structural inverse: descriptors collapse back
//!   to name/version and the `serialize` hook runs over the state.
//!   Round-trips are lossless whenever a plugin's hooks are mutual
//!   inverses, which is the plugin author's contract to uphold.

use std::sync::Arc;

use trellis_model::tree::{Cell, Editable, Row};
use trellis_model::{new_id, PluginError, PluginRegistry};

use crate::errors::EditorError;
use crate::mutations::reindex;
use crate::storage::StorageAdapter;

/// Walk a cell and generate ids where missing.
pub fn hydrate_cell(cell: &mut Cell) {
    if cell.id.is_empty() {
        cell.id = new_id();
    }
    for row in &mut cell.rows {
        hydrate_row(row);
    }
}

fn hydrate_row(row: &mut Row) {
    if row.id.is_empty() {
        row.id = new_id();
    }
    for cell in &mut row.cells {
        hydrate_cell(cell);
    }
}

/// Hydrate a whole document, root id included.
pub fn hydrate_editable(editable: &mut Editable) {
    if editable.id.is_empty() {
        editable.id = new_id();
    }
    for cell in &mut editable.cells {
        hydrate_cell(cell);
    }
}

/// Resolve plugin references into runtime descriptors, applying the
/// content plugin's `unserialize` hook to the state where one exists.
pub fn unserialize_cell(cell: &mut Cell, registry: &PluginRegistry) -> Result<(), PluginError> {
    if let Some(content) = &mut cell.content {
        let plugin =
            registry.resolve_content_plugin(&content.plugin.name, &content.plugin.version)?;
        if let Some(hook) = &plugin.hooks.unserialize {
            content.state = hook(std::mem::take(&mut content.state));
        }
        // pin the reference to the resolved version so "*" requests
        // serialize back as something concrete
        content.plugin = plugin.reference();
        content.descriptor = Some(plugin);
    }

    if let Some(layout) = &mut cell.layout {
        let plugin =
            registry.resolve_layout_plugin(&layout.plugin.name, &layout.plugin.version)?;
        layout.plugin = plugin.reference();
        layout.descriptor = Some(plugin);
    }

    for row in &mut cell.rows {
        unserialize_row(row, registry)?;
    }
    Ok(())
}

fn unserialize_row(row: &mut Row, registry: &PluginRegistry) -> Result<(), PluginError> {
    for cell in &mut row.cells {
        unserialize_cell(cell, registry)?;
    }
    Ok(())
}

pub fn unserialize_editable(
    editable: &mut Editable,
    registry: &PluginRegistry,
) -> Result<(), PluginError> {
    for cell in &mut editable.cells {
        unserialize_cell(cell, registry)?;
    }
    Ok(())
}

/// Produce the wire form of a cell: descriptors stripped to
/// name/version, `serialize` hooks applied, runtime bookkeeping cleared.
pub fn serialize_cell(cell: &Cell) -> Cell {
    let mut out = cell.clone();
    strip_cell(&mut out);
    out
}

pub fn serialize_editable(editable: &Editable) -> Editable {
    let mut out = editable.clone();
    for cell in &mut out.cells {
        strip_cell(cell);
    }
    out
}

fn strip_cell(cell: &mut Cell) {
    cell.ancestors.clear();
    if let Some(content) = &mut cell.content {
        if let Some(descriptor) = content.descriptor.take() {
            if let Some(hook) = &descriptor.hooks.serialize {
                content.state = hook(std::mem::take(&mut content.state));
            }
            content.plugin = descriptor.reference();
        }
    }
    if let Some(layout) = &mut cell.layout {
        if let Some(descriptor) = layout.descriptor.take() {
            layout.plugin = descriptor.reference();
        }
    }
    for row in &mut cell.rows {
        strip_row(row);
    }
}

fn strip_row(row: &mut Row) {
    row.ancestors.clear();
    for cell in &mut row.cells {
        strip_cell(cell);
    }
}

/// ContentService is an abstraction layer for fetching and storing
/// editable content trees through a list of [`StorageAdapter`]s.
pub struct ContentService {
    adapters: Vec<Arc<dyn StorageAdapter>>,
    registry: Arc<PluginRegistry>,
}

impl ContentService {
    pub fn new(adapters: Vec<Arc<dyn StorageAdapter>>, registry: Arc<PluginRegistry>) -> Self {
        Self { adapters, registry }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Fetch the content tree stored under a handle.
    ///
    /// Adapters are tried in order; the first non-empty result wins and
    /// is hydrated, unserialized and reindexed. When no adapter has
    /// data, a fresh empty editable is synthesized so callers never
    /// receive nothing.
    pub async fn fetch(&self, handle: &str) -> Result<Editable, EditorError> {
        for adapter in &self.adapters {
            let Some(raw) = adapter.fetch(handle).await else {
                continue;
            };
            let mut editable: Editable = serde_json::from_value(raw)?;
            hydrate_editable(&mut editable);
            unserialize_editable(&mut editable, &self.registry)?;
            reindex(&mut editable);
            return Ok(editable);
        }

        tracing::debug!(handle, "no stored content found, synthesizing an empty editable");
        Ok(Editable::empty())
    }

    /// Persist a snapshot of an editable through every adapter.
    ///
    /// The snapshot is serialized up front, so mutations racing in
    /// after this call do not leak into the stored state.
    pub async fn store(&self, editable: &Editable) -> Result<(), EditorError> {
        let snapshot = serde_json::to_value(serialize_editable(editable))?;
        for adapter in &self.adapters {
            adapter.store(&snapshot).await;
        }
        Ok(())
    }
}
