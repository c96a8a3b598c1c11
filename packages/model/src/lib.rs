//! # Trellis Model
//!
//! Core data model for Trellis: the content tree edited by
//! `trellis-editor` and persisted through its storage adapters.
//!
//! A document (an [`Editable`](tree::Editable)) is a tree of cells and
//! rows. Cells either carry a content plugin with opaque state, or nest
//! further rows (optionally governed by a layout plugin). Plugins are
//! referenced by name and version on the wire and resolved to descriptors
//! from the [`PluginRegistry`](plugin::PluginRegistry) at load time.

pub mod error;
pub mod id;
pub mod plugin;
pub mod tree;

pub use error::{PluginError, PluginKind};
pub use id::new_id;
pub use plugin::{
    ContentPlugin, LayoutPlugin, NativeHandler, NativeItem, PluginHooks, PluginRegistry,
    StateTransform, NATIVE_TYPE_URL,
};
pub use tree::{Cell, Config, Content, Editable, Layout, NodeRef, PluginRef, Row};
