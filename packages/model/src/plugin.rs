//! Plugin descriptors and the registry that resolves them.
//!
//! Descriptors are registered once during editor setup and resolved many
//! times afterwards (single-writer, many-reader). Serialize/unserialize
//! hooks are plain optional fields on the descriptor, bound at
//! registration time, so the pipeline never has to probe for them.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::{PluginError, PluginKind};
use crate::tree::{Cell, PluginRef};

/// Transform applied to plugin state at a serialization boundary.
pub type StateTransform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Reserved item type for URLs dragged in from outside the tree.
pub const NATIVE_TYPE_URL: &str = "url";

/// Optional state transforms a content plugin runs at the
/// serialize/unserialize boundary.
#[derive(Clone, Default)]
pub struct PluginHooks {
    pub serialize: Option<StateTransform>,
    pub unserialize: Option<StateTransform>,
}

impl fmt::Debug for PluginHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginHooks")
            .field("serialize", &self.serialize.is_some())
            .field("unserialize", &self.unserialize.is_some())
            .finish()
    }
}

/// Descriptor of a content plugin (text, image, ...).
#[derive(Debug, Clone)]
pub struct ContentPlugin {
    pub name: String,
    pub version: String,
    /// Whether cells of this plugin accept horizontal (inline) neighbours.
    pub allow_inline_neighbours: bool,
    /// State a freshly inserted cell of this plugin starts with.
    pub default_state: Value,
    pub hooks: PluginHooks,
}

impl ContentPlugin {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            allow_inline_neighbours: false,
            default_state: Value::Null,
            hooks: PluginHooks::default(),
        }
    }

    pub fn allow_inline_neighbours(mut self) -> Self {
        self.allow_inline_neighbours = true;
        self
    }

    pub fn with_default_state(mut self, state: Value) -> Self {
        self.default_state = state;
        self
    }

    pub fn with_hooks(mut self, hooks: PluginHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// The serialized identity of this descriptor.
    pub fn reference(&self) -> PluginRef {
        PluginRef::new(&self.name, &self.version)
    }
}

impl PartialEq for ContentPlugin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.version == other.version
    }
}

/// Descriptor of a layout plugin (container, grid, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlugin {
    pub name: String,
    pub version: String,
}

impl LayoutPlugin {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn reference(&self) -> PluginRef {
        PluginRef::new(&self.name, &self.version)
    }
}

/// A payload dragged in from outside the tree, e.g. a dropped URL.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeItem {
    pub item_type: String,
    pub data: Value,
}

/// Converts a native drag payload into a serialized cell.
pub type NativeHandler = Arc<dyn Fn(&NativeItem) -> Cell + Send + Sync>;

/// Process-wide lookup from plugin name/version to descriptor.
#[derive(Default)]
pub struct PluginRegistry {
    content: Vec<Arc<ContentPlugin>>,
    layout: Vec<Arc<LayoutPlugin>>,
    native: Option<NativeHandler>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_content_plugin(&mut self, plugin: ContentPlugin) {
        self.content.push(Arc::new(plugin));
    }

    pub fn register_layout_plugin(&mut self, plugin: LayoutPlugin) {
        self.layout.push(Arc::new(plugin));
    }

    pub fn register_native_handler(&mut self, handler: NativeHandler) {
        self.native = Some(handler);
    }

    /// Resolve a content plugin. Exact name+version wins; otherwise the
    /// latest registered version under that name (which also covers
    /// `"*"` requests); otherwise the document cannot be loaded.
    pub fn resolve_content_plugin(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Arc<ContentPlugin>, PluginError> {
        if let Some(found) = self
            .content
            .iter()
            .find(|p| p.name == name && p.version == version)
        {
            return Ok(found.clone());
        }
        self.content
            .iter()
            .rev()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| PluginError::not_found(PluginKind::Content, name, version))
    }

    pub fn resolve_layout_plugin(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Arc<LayoutPlugin>, PluginError> {
        if let Some(found) = self
            .layout
            .iter()
            .find(|p| p.name == name && p.version == version)
        {
            return Ok(found.clone());
        }
        self.layout
            .iter()
            .rev()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| PluginError::not_found(PluginKind::Layout, name, version))
    }

    pub fn native_handler(&self) -> Option<&NativeHandler> {
        self.native.as_ref()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("content", &self.content)
            .field("layout", &self.layout)
            .field("native", &self.native.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        registry.register_content_plugin(ContentPlugin::new("text", "0.0.1"));
        registry.register_content_plugin(ContentPlugin::new("text", "0.0.2"));
        registry.register_layout_plugin(LayoutPlugin::new("grid", "0.0.1"));
        registry
    }

    #[test]
    fn test_exact_version_match_wins() {
        let plugin = registry().resolve_content_plugin("text", "0.0.1").unwrap();
        assert_eq!(plugin.version, "0.0.1");
    }

    #[test]
    fn test_wildcard_resolves_to_latest_registered() {
        let plugin = registry().resolve_content_plugin("text", "*").unwrap();
        assert_eq!(plugin.version, "0.0.2");
    }

    #[test]
    fn test_unknown_version_falls_back_to_name_match() {
        let plugin = registry().resolve_content_plugin("text", "9.9.9").unwrap();
        assert_eq!(plugin.version, "0.0.2");
    }

    #[test]
    fn test_unknown_name_fails() {
        let err = registry()
            .resolve_content_plugin("unknown-plugin", "*")
            .unwrap_err();
        assert!(matches!(err, PluginError::NotFound { .. }));
    }

    #[test]
    fn test_layout_resolution_is_independent_of_content() {
        let registry = registry();
        assert!(registry.resolve_layout_plugin("grid", "*").is_ok());
        assert!(registry.resolve_layout_plugin("text", "*").is_err());
    }
}
