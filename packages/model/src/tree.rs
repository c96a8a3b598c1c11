//! Content tree types.
//!
//! The tree alternates between two node kinds: a [`Cell`] holds either a
//! content plugin with opaque state or a list of [`Row`]s (optionally
//! governed by a layout plugin), and a [`Row`] holds a list of cells.
//! An [`Editable`] is one whole document: an id plus its top-level cells.
//!
//! Serialized and runtime forms share these types. On the wire a plugin
//! is only its [`PluginRef`] (name and version); at runtime the resolved
//! descriptor is attached to the `descriptor` fields, which are never
//! serialized. `ancestors` is runtime bookkeeping as well, recomputed
//! whenever the tree changes shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::plugin::{ContentPlugin, LayoutPlugin};

/// Serialized plugin identity: name plus version, `"*"` meaning any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRef {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "*".to_string()
}

impl PluginRef {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Reference matching any registered version of `name`.
    pub fn any(name: impl Into<String>) -> Self {
        Self::new(name, "*")
    }
}

/// Content payload of a leaf cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub plugin: PluginRef,
    #[serde(default)]
    pub state: Value,
    /// Resolved at load time, stripped again before persistence.
    #[serde(skip)]
    pub descriptor: Option<Arc<ContentPlugin>>,
}

impl Content {
    pub fn new(plugin: PluginRef, state: Value) -> Self {
        Self {
            plugin,
            state,
            descriptor: None,
        }
    }
}

impl PartialEq for Content {
    fn eq(&self, other: &Self) -> bool {
        // Structural equality; the resolved descriptor is derived state.
        self.plugin == other.plugin && self.state == other.state
    }
}

/// Layout payload of a container cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub plugin: PluginRef,
    #[serde(skip)]
    pub descriptor: Option<Arc<LayoutPlugin>>,
}

impl Layout {
    pub fn new(plugin: PluginRef) -> Self {
        Self {
            plugin,
            descriptor: None,
        }
    }
}

impl PartialEq for Layout {
    fn eq(&self, other: &Self) -> bool {
        self.plugin == other.plugin
    }
}

/// A cell: either a content leaf or a container of rows.
///
/// A well-formed cell has at most one of {non-empty `rows`, `content`}
/// as payload; `layout` may accompany `rows`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Empty until assigned by hydration.
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<Row>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,

    /// Proportional weight for the owning row's layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    /// Ids from the editable root down to this cell's parent.
    #[serde(skip)]
    pub ancestors: Vec<String>,
}

impl Cell {
    /// Leaf cell carrying plugin content.
    pub fn with_content(content: Content) -> Self {
        Self {
            id: crate::id::new_id(),
            content: Some(content),
            ..Self::default()
        }
    }

    /// Container cell holding the given rows.
    pub fn container(rows: Vec<Row>) -> Self {
        Self {
            id: crate::id::new_id(),
            rows,
            ..Self::default()
        }
    }

    pub fn find_node(&self, id: &str) -> Option<NodeRef<'_>> {
        if self.id == id {
            return Some(NodeRef::Cell(self));
        }
        self.rows.iter().find_map(|row| row.find_node(id))
    }
}

/// A row: an ordered run of sibling cells.
///
/// Non-empty in a well-formed tree; emptied rows are pruned after moves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<Cell>,

    #[serde(skip)]
    pub ancestors: Vec<String>,
}

impl Row {
    pub fn with_cells(cells: Vec<Cell>) -> Self {
        Self {
            id: crate::id::new_id(),
            cells,
            ancestors: Vec::new(),
        }
    }

    pub fn find_node(&self, id: &str) -> Option<NodeRef<'_>> {
        if self.id == id {
            return Some(NodeRef::Row(self));
        }
        self.cells.iter().find_map(|cell| cell.find_node(id))
    }
}

/// Runtime editor configuration attached to one editable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Content plugin names allowed in this editable; `None` allows all.
    pub whitelist: Option<Vec<String>>,
}

impl Config {
    pub fn allows(&self, plugin_name: &str) -> bool {
        match &self.whitelist {
            Some(names) => names.iter().any(|n| n == plugin_name),
            None => true,
        }
    }
}

/// One whole document: a root id plus its top-level cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Editable {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub cells: Vec<Cell>,

    #[serde(skip)]
    pub config: Config,
}

impl Editable {
    /// Fresh empty document.
    pub fn empty() -> Self {
        Self {
            id: crate::id::new_id(),
            cells: Vec::new(),
            config: Config::default(),
        }
    }

    /// Depth-first lookup over rows, then cells. Ids are unique within an
    /// editable, so the first match is the only match.
    pub fn find_node(&self, id: &str) -> Option<NodeRef<'_>> {
        self.cells.iter().find_map(|cell| cell.find_node(id))
    }

    /// Lookup restricted to cells; rows never act as drop targets.
    pub fn find_cell(&self, id: &str) -> Option<&Cell> {
        match self.find_node(id) {
            Some(NodeRef::Cell(cell)) => Some(cell),
            _ => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_node(id).is_some()
    }
}

/// Borrowed reference to either node kind, for selector results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Cell(&'a Cell),
    Row(&'a Row),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> &str {
        match self {
            NodeRef::Cell(cell) => &cell.id,
            NodeRef::Row(row) => &row.id,
        }
    }

    pub fn ancestors(&self) -> &[String] {
        match self {
            NodeRef::Cell(cell) => &cell.ancestors,
            NodeRef::Row(row) => &row.ancestors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn leaf(id: &str) -> Cell {
        Cell {
            id: id.to_string(),
            ..Cell::default()
        }
    }

    #[test]
    fn test_plugin_ref_version_defaults_to_any() {
        let reference: PluginRef = serde_json::from_value(json!({ "name": "text" })).unwrap();
        assert_eq!(reference.version, "*");
    }

    #[test]
    fn test_missing_ids_deserialize_as_empty() {
        let cell: Cell = serde_json::from_value(json!({
            "rows": [{ "cells": [{ "content": { "plugin": { "name": "text" } } }] }]
        }))
        .unwrap();

        assert!(cell.id.is_empty());
        assert!(cell.rows[0].id.is_empty());
        assert!(cell.rows[0].cells[0].id.is_empty());
    }

    #[test]
    fn test_serialized_cell_omits_empty_branches() {
        let value = serde_json::to_value(leaf("a")).unwrap();
        assert_eq!(value, json!({ "id": "a" }));
    }

    #[test]
    fn test_find_node_searches_rows_then_cells() {
        let editable = Editable {
            id: "root".to_string(),
            cells: vec![Cell {
                id: "outer".to_string(),
                rows: vec![Row {
                    id: "row".to_string(),
                    cells: vec![leaf("inner")],
                    ancestors: Vec::new(),
                }],
                ..Cell::default()
            }],
            config: Config::default(),
        };

        assert_eq!(editable.find_node("row").map(|n| n.id().to_string()), Some("row".into()));
        assert_eq!(editable.find_node("inner").map(|n| n.id().to_string()), Some("inner".into()));
        assert!(editable.find_node("absent").is_none());
        assert!(editable.find_cell("row").is_none(), "rows are not cells");
    }

    #[test]
    fn test_whitelist_gates_plugin_names() {
        let open = Config::default();
        assert!(open.allows("anything"));

        let closed = Config {
            whitelist: Some(vec!["text".to_string()]),
        };
        assert!(closed.allows("text"));
        assert!(!closed.allows("video"));
    }
}
