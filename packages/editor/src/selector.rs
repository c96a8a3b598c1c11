//! Read-only queries over attached editables.
//!
//! Selectors never mutate and never panic on malformed ids: a missing
//! node is an ordinary `None`. Asking for a node inside a *named*
//! editable that does not exist is different: that is a configuration
//! error, reported as [`SelectorError::EditableNotFound`].

use thiserror::Error;

use trellis_model::tree::{Cell, Editable, NodeRef, Row};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectorError {
    #[error("Could not find editable: {0}")]
    EditableNotFound(String),
}

/// Linear scan over the attached editables.
pub fn find_editable<'a>(editables: &'a [Editable], id: &str) -> Option<&'a Editable> {
    editables.iter().find(|editable| editable.id == id)
}

/// Find a node inside a named editable.
///
/// The editable must exist; the node may not.
pub fn node<'a>(
    editables: &'a [Editable],
    editable_id: &str,
    node_id: &str,
) -> Result<Option<NodeRef<'a>>, SelectorError> {
    let editable = find_editable(editables, editable_id)
        .ok_or_else(|| SelectorError::EditableNotFound(editable_id.to_string()))?;
    Ok(editable.find_node(node_id))
}

/// Scan every editable for a node id; the first editable containing it
/// wins.
pub fn search_node_everywhere<'a>(
    editables: &'a [Editable],
    id: &str,
) -> Option<(NodeRef<'a>, &'a Editable)> {
    editables
        .iter()
        .find_map(|editable| editable.find_node(id).map(|node| (node, editable)))
}

/// An editable with its children reduced to id references.
#[derive(Debug, Clone, PartialEq)]
pub struct ShallowEditable {
    pub id: String,
    pub cells: Vec<String>,
}

/// A cell with its child rows reduced to id references.
#[derive(Debug, Clone, PartialEq)]
pub struct ShallowCell {
    pub id: String,
    pub rows: Vec<String>,
    pub size: Option<u32>,
    pub has_content: bool,
    pub has_layout: bool,
}

/// A row with its child cells reduced to id references.
#[derive(Debug, Clone, PartialEq)]
pub struct ShallowRow {
    pub id: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShallowNode {
    Cell(ShallowCell),
    Row(ShallowRow),
}

/// Project an editable to a reference form: consumers can address the
/// top-level cells without deep-cloning them.
pub fn purify_editable(editable: &Editable) -> ShallowEditable {
    ShallowEditable {
        id: editable.id.clone(),
        cells: editable.cells.iter().map(|cell| cell.id.clone()).collect(),
    }
}

/// Project a node to a reference form.
pub fn purify_node(node: NodeRef<'_>) -> ShallowNode {
    match node {
        NodeRef::Cell(cell) => ShallowNode::Cell(purify_cell(cell)),
        NodeRef::Row(row) => ShallowNode::Row(purify_row(row)),
    }
}

fn purify_cell(cell: &Cell) -> ShallowCell {
    ShallowCell {
        id: cell.id.clone(),
        rows: cell.rows.iter().map(|row| row.id.clone()).collect(),
        size: cell.size,
        has_content: cell.content.is_some(),
        has_layout: cell.layout.is_some(),
    }
}

fn purify_row(row: &Row) -> ShallowRow {
    ShallowRow {
        id: row.id.clone(),
        cells: row.cells.iter().map(|cell| cell.id.clone()).collect(),
    }
}
