//! # Editor Context
//!
//! Caller-owned handle tying the pieces together: a plugin registry,
//! a content service with its storage adapters, the drag-and-drop
//! engine, and the editables currently attached.
//!
//! Editors are plain values. Any number of independent instances can
//! coexist in one process, each with its own registry and documents;
//! nothing here is global.

use serde_json::Value;
use std::sync::Arc;

use trellis_model::tree::{Config, Editable, NodeRef};
use trellis_model::{new_id, NativeItem, PluginRegistry};

use crate::content::{hydrate_editable, unserialize_editable, ContentService};
use crate::dnd::{DndEngine, DragItem, DropOutcome, HoverStatus};
use crate::errors::EditorError;
use crate::mutations::{reindex, Mutation};
use crate::placement::{Bounds, Point};
use crate::selector::{self, SelectorError};
use crate::storage::{DebugAdapter, MemoryAdapter, StorageAdapter};

pub struct Editor {
    pub id: String,
    registry: Arc<PluginRegistry>,
    service: ContentService,
    dnd: DndEngine,
    editables: Vec<Editable>,
}

impl Editor {
    /// Editor with the default adapter chain (memory, then debug).
    pub fn new(registry: PluginRegistry) -> Self {
        Self::with_adapters(
            registry,
            vec![
                Arc::new(MemoryAdapter::new()),
                Arc::new(DebugAdapter),
            ],
        )
    }

    pub fn with_adapters(
        registry: PluginRegistry,
        adapters: Vec<Arc<dyn StorageAdapter>>,
    ) -> Self {
        let registry = Arc::new(registry);
        Self {
            id: new_id(),
            registry: registry.clone(),
            service: ContentService::new(adapters, registry),
            dnd: DndEngine::new(),
            editables: Vec::new(),
        }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn editables(&self) -> &[Editable] {
        &self.editables
    }

    /// Fetch the tree stored under `handle` and attach it. Returns the
    /// attached editable's id.
    pub async fn load(&mut self, handle: &str) -> Result<String, EditorError> {
        let editable = self.service.fetch(handle).await?;
        let id = editable.id.clone();
        self.editables.push(editable);
        Ok(id)
    }

    /// Attach a raw serialized tree directly, e.g. inline bootstrap
    /// content delivered with the page.
    pub fn attach(&mut self, raw: Value, config: Config) -> Result<String, EditorError> {
        let mut editable: Editable = serde_json::from_value(raw)?;
        hydrate_editable(&mut editable);
        unserialize_editable(&mut editable, &self.registry)?;
        reindex(&mut editable);
        editable.config = config;

        let id = editable.id.clone();
        self.editables.push(editable);
        Ok(id)
    }

    /// Drop an editable from the context. True when something was
    /// removed.
    pub fn detach(&mut self, id: &str) -> bool {
        let before = self.editables.len();
        self.editables.retain(|editable| editable.id != id);
        self.editables.len() != before
    }

    pub fn editable(&self, id: &str) -> Option<&Editable> {
        selector::find_editable(&self.editables, id)
    }

    pub fn editable_mut(&mut self, id: &str) -> Option<&mut Editable> {
        self.editables.iter_mut().find(|editable| editable.id == id)
    }

    pub fn node(&self, editable_id: &str, node_id: &str) -> Result<Option<NodeRef<'_>>, SelectorError> {
        selector::node(&self.editables, editable_id, node_id)
    }

    /// Apply a validated mutation to a named editable.
    pub fn apply(&mut self, editable_id: &str, mutation: Mutation) -> Result<(), EditorError> {
        let editable = self
            .editable_mut(editable_id)
            .ok_or_else(|| SelectorError::EditableNotFound(editable_id.to_string()))?;
        mutation.apply(editable)?;
        Ok(())
    }

    /// Persist a named editable through every configured adapter.
    pub async fn store(&self, editable_id: &str) -> Result<(), EditorError> {
        let editable = self
            .editable(editable_id)
            .ok_or_else(|| SelectorError::EditableNotFound(editable_id.to_string()))?;
        self.service.store(editable).await
    }

    // --- drag-and-drop -------------------------------------------------

    pub fn drag_cell(&mut self, cell_id: impl Into<String>) -> Result<(), EditorError> {
        self.dnd.begin_drag(DragItem::Cell { id: cell_id.into() })
    }

    pub fn drag_native(&mut self, item: NativeItem) -> Result<(), EditorError> {
        self.dnd.begin_drag(DragItem::Native(item))
    }

    pub fn cancel_drag(&mut self) {
        self.dnd.cancel();
    }

    pub fn dragging(&self) -> bool {
        self.dnd.active().is_some()
    }

    /// Evaluate hover feedback for the active gesture.
    pub fn hover(
        &mut self,
        editable_id: &str,
        target_id: &str,
        pointer: Point,
        bounds: Bounds,
        shallow: bool,
    ) -> Result<HoverStatus, SelectorError> {
        let editable = selector::find_editable(&self.editables, editable_id)
            .ok_or_else(|| SelectorError::EditableNotFound(editable_id.to_string()))?;
        Ok(self
            .dnd
            .hover(editable, &self.registry, target_id, pointer, bounds, shallow))
    }

    /// Commit the active gesture onto a drop target.
    pub fn drop(
        &mut self,
        editable_id: &str,
        target_id: &str,
        pointer: Point,
        bounds: Bounds,
        shallow: bool,
        already_handled: bool,
    ) -> Result<DropOutcome, EditorError> {
        let registry = self.registry.clone();
        let index = self
            .editables
            .iter()
            .position(|editable| editable.id == editable_id)
            .ok_or_else(|| SelectorError::EditableNotFound(editable_id.to_string()))?;
        self.dnd.drop(
            &mut self.editables[index],
            &registry,
            target_id,
            pointer,
            bounds,
            shallow,
            already_handled,
        )
    }
}
