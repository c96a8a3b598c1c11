//! # Tree Mutations
//!
//! High-level structural operations on editable content trees.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each mutation is one semantic drop outcome
//! 2. **Validated**: structural constraints are checked before anything
//!    is touched, so a rejected mutation never leaves a partial tree
//! 3. **Invariant-restoring**: ancestors are recomputed for the whole
//!    tree after every successful apply
//!
//! ## Placement Semantics
//!
//! A placement is resolved against the drop target's layout context:
//!
//! - Target inside a row (horizontal run): `LeftOf`/`RightOf` insert a
//!   sibling cell. `Above`/`Below` insert a sibling row when the target
//!   is alone in its row, otherwise the target is wrapped into a
//!   two-row container cell.
//! - Target at the editable top level (vertical run): `Above`/`Below`
//!   insert a sibling top-level cell. `LeftOf`/`RightOf` wrap target
//!   and dragged cell into one container holding a two-cell row.
//! - `Inside` appends the dragged cell as a new row of the target. A
//!   content-bearing target first converts its content into a leading
//!   row, preserving the one-payload invariant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use trellis_common::{walk_cell_mut, walk_row_mut, VisitorMut};
use trellis_model::tree::{Cell, Editable, Row};

use crate::placement::Placement;

/// Structural mutations committed by the drag-and-drop engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Re-parent an existing cell relative to a target cell.
    MoveCell {
        cell_id: String,
        target_id: String,
        placement: Placement,
    },

    /// Insert a new cell (e.g. converted from a native drop) relative
    /// to a target cell.
    InsertCell {
        cell: Cell,
        target_id: String,
        placement: Placement,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Drop target not found: {0}")]
    TargetNotFound(String),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Content plugin not allowed here: {0}")]
    PluginNotAllowed(String),
}

impl Mutation {
    /// Apply mutation to the tree with validation.
    pub fn apply(&self, editable: &mut Editable) -> Result<(), MutationError> {
        // Validate first
        self.validate(editable)?;

        match self {
            Mutation::MoveCell {
                cell_id,
                target_id,
                placement,
            } => {
                let cell = detach_cell(editable, cell_id)
                    .ok_or_else(|| MutationError::NodeNotFound(cell_id.clone()))?;
                insert_relative(editable, target_id, cell, *placement)?;
            }

            Mutation::InsertCell {
                cell,
                target_id,
                placement,
            } => {
                insert_relative(editable, target_id, cell.clone(), *placement)?;
            }
        }

        reindex(editable);
        Ok(())
    }

    /// Validate without applying.
    pub fn validate(&self, editable: &Editable) -> Result<(), MutationError> {
        match self {
            Mutation::MoveCell {
                cell_id, target_id, ..
            } => {
                if editable.find_node(cell_id).is_none() {
                    return Err(MutationError::NodeNotFound(cell_id.clone()));
                }
                let target = editable
                    .find_cell(target_id)
                    .ok_or_else(|| MutationError::TargetNotFound(target_id.clone()))?;

                // Self-drops and drops into one's own subtree would
                // detach the target along with the dragged cell.
                if cell_id == target_id || target.ancestors.iter().any(|a| a == cell_id) {
                    return Err(MutationError::CycleDetected);
                }
                Ok(())
            }

            Mutation::InsertCell {
                cell, target_id, ..
            } => {
                if editable.find_cell(target_id).is_none() {
                    return Err(MutationError::TargetNotFound(target_id.clone()));
                }
                if let Some(content) = &cell.content {
                    if !editable.config.allows(&content.plugin.name) {
                        return Err(MutationError::PluginNotAllowed(content.plugin.name.clone()));
                    }
                }
                Ok(())
            }
        }
    }
}

/// Remove a cell from wherever it sits and return it, pruning any row
/// the removal emptied.
pub(crate) fn detach_cell(editable: &mut Editable, id: &str) -> Option<Cell> {
    if let Some(pos) = editable.cells.iter().position(|c| c.id == id) {
        return Some(editable.cells.remove(pos));
    }
    for cell in &mut editable.cells {
        if let Some(found) = detach_from_cell(cell, id) {
            return Some(found);
        }
    }
    None
}

fn detach_from_cell(host: &mut Cell, id: &str) -> Option<Cell> {
    let mut found = None;

    'rows: for row in &mut host.rows {
        if let Some(pos) = row.cells.iter().position(|c| c.id == id) {
            found = Some(row.cells.remove(pos));
            break 'rows;
        }
        for cell in &mut row.cells {
            if let Some(detached) = detach_from_cell(cell, id) {
                found = Some(detached);
                break 'rows;
            }
        }
    }

    if found.is_some() {
        host.rows.retain(|row| !row.cells.is_empty());
    }
    found
}

/// Insert `cell` at the location described by `target_id` + `placement`.
fn insert_relative(
    editable: &mut Editable,
    target_id: &str,
    cell: Cell,
    placement: Placement,
) -> Result<(), MutationError> {
    // Top-level cells stack vertically.
    if let Some(idx) = editable.cells.iter().position(|c| c.id == target_id) {
        match placement {
            Placement::Above => editable.cells.insert(idx, cell),
            Placement::Below => editable.cells.insert(idx + 1, cell),
            Placement::LeftOf | Placement::RightOf => {
                let target = editable.cells.remove(idx);
                let pair = if placement == Placement::LeftOf {
                    vec![cell, target]
                } else {
                    vec![target, cell]
                };
                editable
                    .cells
                    .insert(idx, Cell::container(vec![Row::with_cells(pair)]));
            }
            Placement::Inside => nest_into(&mut editable.cells[idx], cell),
        }
        return Ok(());
    }

    match insert_in_cells(&mut editable.cells, target_id, cell, placement) {
        None => Ok(()),
        // Unreachable after validation: the target cannot sit inside
        // the detached subtree, so it is still present here.
        Some(_) => Err(MutationError::TargetNotFound(target_id.to_string())),
    }
}

/// Recursive search over nested rows. Returns the cell back to the
/// caller when the target was not found in this subtree.
fn insert_in_cells(
    cells: &mut [Cell],
    target_id: &str,
    cell: Cell,
    placement: Placement,
) -> Option<Cell> {
    let mut cell = cell;
    for host in cells {
        match insert_in_rows(&mut host.rows, target_id, cell, placement) {
            None => return None,
            Some(back) => cell = back,
        }
    }
    Some(cell)
}

fn insert_in_rows(
    rows: &mut Vec<Row>,
    target_id: &str,
    cell: Cell,
    placement: Placement,
) -> Option<Cell> {
    let mut cell = cell;
    let mut index = 0;

    while index < rows.len() {
        if let Some(pos) = rows[index].cells.iter().position(|c| c.id == target_id) {
            match placement {
                Placement::LeftOf => rows[index].cells.insert(pos, cell),
                Placement::RightOf => rows[index].cells.insert(pos + 1, cell),
                Placement::Above | Placement::Below => {
                    if rows[index].cells.len() == 1 {
                        // Target is alone in its row: a sibling row
                        // keeps the tree flat.
                        let at = if placement == Placement::Above {
                            index
                        } else {
                            index + 1
                        };
                        rows.insert(at, Row::with_cells(vec![cell]));
                    } else {
                        let target = rows[index].cells.remove(pos);
                        let stacked = if placement == Placement::Above {
                            vec![Row::with_cells(vec![cell]), Row::with_cells(vec![target])]
                        } else {
                            vec![Row::with_cells(vec![target]), Row::with_cells(vec![cell])]
                        };
                        rows[index].cells.insert(pos, Cell::container(stacked));
                    }
                }
                Placement::Inside => nest_into(&mut rows[index].cells[pos], cell),
            }
            return None;
        }

        match insert_in_cells(&mut rows[index].cells, target_id, cell, placement) {
            None => return None,
            Some(back) => cell = back,
        }
        index += 1;
    }

    Some(cell)
}

/// Nest `cell` as a new trailing row of `target`.
fn nest_into(target: &mut Cell, cell: Cell) {
    if let Some(content) = target.content.take() {
        // The target keeps its content as the leading nested row.
        target.rows.push(Row::with_cells(vec![Cell::with_content(content)]));
    }
    target.rows.push(Row::with_cells(vec![cell]));
}

/// Recompute `ancestors` for every node from the editable root down.
pub fn reindex(editable: &mut Editable) {
    let mut reindexer = Reindexer {
        path: vec![editable.id.clone()],
    };
    for cell in &mut editable.cells {
        reindexer.visit_cell_mut(cell);
    }
}

struct Reindexer {
    path: Vec<String>,
}

impl VisitorMut for Reindexer {
    fn visit_cell_mut(&mut self, cell: &mut Cell) {
        cell.ancestors = self.path.clone();
        self.path.push(cell.id.clone());
        walk_cell_mut(self, cell);
        self.path.pop();
    }

    fn visit_row_mut(&mut self, row: &mut Row) {
        row.ancestors = self.path.clone();
        self.path.push(row.id.clone());
        walk_row_mut(self, row);
        self.path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trellis_model::tree::{Config, Content, PluginRef};

    fn leaf(id: &str) -> Cell {
        Cell {
            id: id.to_string(),
            ..Cell::default()
        }
    }

    fn two_cells() -> Editable {
        let mut editable = Editable {
            id: "root".to_string(),
            cells: vec![leaf("a"), leaf("b")],
            config: Config::default(),
        };
        reindex(&mut editable);
        editable
    }

    #[test]
    fn test_move_above_inserts_sibling_at_top_level() {
        let mut editable = two_cells();
        Mutation::MoveCell {
            cell_id: "b".to_string(),
            target_id: "a".to_string(),
            placement: Placement::Above,
        }
        .apply(&mut editable)
        .unwrap();

        let ids: Vec<&str> = editable.cells.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_move_right_of_wraps_top_level_pair_into_row() {
        let mut editable = two_cells();
        Mutation::MoveCell {
            cell_id: "a".to_string(),
            target_id: "b".to_string(),
            placement: Placement::RightOf,
        }
        .apply(&mut editable)
        .unwrap();

        assert_eq!(editable.cells.len(), 1);
        let wrapper = &editable.cells[0];
        assert_eq!(wrapper.rows.len(), 1);
        let ids: Vec<&str> = wrapper.rows[0].cells.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_move_inside_nests_under_target() {
        let mut editable = two_cells();
        Mutation::MoveCell {
            cell_id: "a".to_string(),
            target_id: "b".to_string(),
            placement: Placement::Inside,
        }
        .apply(&mut editable)
        .unwrap();

        assert_eq!(editable.cells.len(), 1);
        let target = &editable.cells[0];
        assert_eq!(target.id, "b");
        assert_eq!(target.rows.len(), 1);
        assert_eq!(target.rows[0].cells[0].id, "a");

        // ancestors of the moved cell follow the new parent chain
        let moved = &target.rows[0].cells[0];
        assert_eq!(moved.ancestors[0], "root");
        assert!(moved.ancestors.contains(&"b".to_string()));
        assert_eq!(
            *moved.ancestors.last().unwrap(),
            target.rows[0].id,
            "direct parent comes last"
        );
    }

    #[test]
    fn test_nest_preserves_existing_content_as_leading_row() {
        let mut editable = Editable {
            id: "root".to_string(),
            cells: vec![
                leaf("a"),
                Cell {
                    id: "b".to_string(),
                    content: Some(Content::new(PluginRef::any("text"), json!({ "text": "x" }))),
                    ..Cell::default()
                },
            ],
            config: Config::default(),
        };
        reindex(&mut editable);

        Mutation::MoveCell {
            cell_id: "a".to_string(),
            target_id: "b".to_string(),
            placement: Placement::Inside,
        }
        .apply(&mut editable)
        .unwrap();

        let target = &editable.cells[0];
        assert!(target.content.is_none());
        assert_eq!(target.rows.len(), 2);
        assert!(target.rows[0].cells[0].content.is_some());
        assert_eq!(target.rows[1].cells[0].id, "a");
    }

    #[test]
    fn test_move_above_in_shared_row_wraps_target() {
        // a and b share a row; dropping c above b must not disturb a.
        let mut editable = Editable {
            id: "root".to_string(),
            cells: vec![
                Cell {
                    id: "wrapper".to_string(),
                    rows: vec![Row {
                        id: "row".to_string(),
                        cells: vec![leaf("a"), leaf("b")],
                        ancestors: Vec::new(),
                    }],
                    ..Cell::default()
                },
                leaf("c"),
            ],
            config: Config::default(),
        };
        reindex(&mut editable);

        Mutation::MoveCell {
            cell_id: "c".to_string(),
            target_id: "b".to_string(),
            placement: Placement::Above,
        }
        .apply(&mut editable)
        .unwrap();

        let row = &editable.cells[0].rows[0];
        assert_eq!(row.cells.len(), 2);
        assert_eq!(row.cells[0].id, "a");
        let stacked = &row.cells[1];
        assert_eq!(stacked.rows.len(), 2);
        assert_eq!(stacked.rows[0].cells[0].id, "c");
        assert_eq!(stacked.rows[1].cells[0].id, "b");
    }

    #[test]
    fn test_detach_prunes_emptied_rows() {
        let mut editable = Editable {
            id: "root".to_string(),
            cells: vec![Cell {
                id: "wrapper".to_string(),
                rows: vec![
                    Row {
                        id: "row-a".to_string(),
                        cells: vec![leaf("a")],
                        ancestors: Vec::new(),
                    },
                    Row {
                        id: "row-b".to_string(),
                        cells: vec![leaf("b")],
                        ancestors: Vec::new(),
                    },
                ],
                ..Cell::default()
            }],
            config: Config::default(),
        };
        reindex(&mut editable);

        let detached = detach_cell(&mut editable, "a").unwrap();
        assert_eq!(detached.id, "a");
        assert_eq!(editable.cells[0].rows.len(), 1);
        assert_eq!(editable.cells[0].rows[0].id, "row-b");
    }

    #[test]
    fn test_descendant_move_is_rejected() {
        let mut editable = Editable {
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
        reindex(&mut editable);
        let before = editable.clone();

        let err = Mutation::MoveCell {
            cell_id: "outer".to_string(),
            target_id: "inner".to_string(),
            placement: Placement::Inside,
        }
        .apply(&mut editable)
        .unwrap_err();

        assert_eq!(err, MutationError::CycleDetected);
        assert_eq!(editable, before, "rejected mutation leaves no trace");
    }

    #[test]
    fn test_self_move_is_rejected() {
        let mut editable = two_cells();
        let err = Mutation::MoveCell {
            cell_id: "a".to_string(),
            target_id: "a".to_string(),
            placement: Placement::Below,
        }
        .apply(&mut editable)
        .unwrap_err();
        assert_eq!(err, MutationError::CycleDetected);
    }

    #[test]
    fn test_insert_respects_whitelist() {
        let mut editable = two_cells();
        editable.config = Config {
            whitelist: Some(vec!["text".to_string()]),
        };

        let video = Cell::with_content(Content::new(PluginRef::any("video"), json!({})));
        let err = Mutation::InsertCell {
            cell: video,
            target_id: "a".to_string(),
            placement: Placement::Below,
        }
        .apply(&mut editable)
        .unwrap_err();

        assert_eq!(err, MutationError::PluginNotAllowed("video".to_string()));
    }

    #[test]
    fn test_reindex_tracks_full_parent_chain() {
        let mut editable = Editable {
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

        reindex(&mut editable);

        assert_eq!(editable.cells[0].ancestors, vec!["root"]);
        assert_eq!(editable.cells[0].rows[0].ancestors, vec!["root", "outer"]);
        assert_eq!(
            editable.cells[0].rows[0].cells[0].ancestors,
            vec!["root", "outer", "row"]
        );
    }
}
