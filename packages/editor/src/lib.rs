//! # Trellis Editor
//!
//! Content-tree editing engine for Trellis.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ storage: adapters fetch/store raw trees     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ content: hydrate → unserialize → Editable   │
//! │  - id assignment for incoming trees         │
//! │  - plugin resolution via the registry       │
//! │  - serialize back to the wire form on store │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Editable lifecycle + mutations      │
//! │  - selectors over attached editables        │
//! │  - drag-and-drop hover/drop evaluation      │
//! │  - validated tree mutations on drop         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The tree is source of truth**: hover feedback and shallow
//!    projections are derived views
//! 2. **Mutations are validated**: self-drops, descendant-drops and
//!    whitelist violations are rejected before anything changes
//! 3. **One event loop, one active drag**: no locks, the single-writer
//!    discipline is the concurrency model
//! 4. **Editors are caller-owned**: any number of [`Editor`] instances
//!    can coexist, each with its own registry and editables
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trellis_editor::{Editor, Point, Bounds};
//! use trellis_model::PluginRegistry;
//!
//! let mut registry = PluginRegistry::new();
//! trellis_plugins::register_defaults(&mut registry);
//!
//! let mut editor = Editor::new(registry);
//! let id = editor.load("page-1").await?;
//!
//! // Drag cell `a` and drop it onto cell `b`
//! editor.drag_cell("a");
//! editor.hover(&id, "b", pointer, bounds, true);
//! editor.drop(&id, "b", pointer, bounds, true, false)?;
//! ```

mod content;
mod dnd;
mod editor;
mod errors;
mod mutations;
mod placement;
mod selector;
mod storage;

pub use content::{
    hydrate_cell, hydrate_editable, serialize_cell, serialize_editable, unserialize_cell,
    unserialize_editable, ContentService,
};
pub use dnd::{DndEngine, DragItem, DropOutcome, HoverStatus, Throttle, NATIVE_DRAG_ID};
pub use editor::Editor;
pub use errors::EditorError;
pub use mutations::{reindex, Mutation, MutationError};
pub use placement::{Bounds, GridPolicy, Placement, PlacementPolicy, Point};
pub use selector::{
    find_editable, node, purify_editable, purify_node, search_node_everywhere, SelectorError,
    ShallowCell, ShallowEditable, ShallowNode, ShallowRow,
};
pub use storage::{DebugAdapter, MemoryAdapter, StorageAdapter};

// Re-export common types for convenience
pub use trellis_model::tree::{Cell, Config, Content, Editable, Layout, NodeRef, PluginRef, Row};
pub use trellis_model::{NativeItem, PluginRegistry};
