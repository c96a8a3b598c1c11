use trellis_model::tree::*;

/// Visitor pattern for traversing content trees immutably
///
/// This trait provides default implementations that walk the entire tree.
/// Override specific visit_* methods to perform custom actions on nodes.
pub trait Visitor: Sized {
    fn visit_editable(&mut self, editable: &Editable) {
        walk_editable(self, editable);
    }

    fn visit_cell(&mut self, cell: &Cell) {
        walk_cell(self, cell);
    }

    fn visit_row(&mut self, row: &Row) {
        walk_row(self, row);
    }

    fn visit_content(&mut self, _content: &Content) {
        // Leaf node, no children to walk
    }

    fn visit_layout(&mut self, _layout: &Layout) {
        // Leaf node, no children to walk
    }
}

/// Mutable visitor pattern for transforming content trees
///
/// Similar to Visitor, but provides mutable access to nodes.
/// Use this when you need to modify the tree during traversal.
pub trait VisitorMut: Sized {
    fn visit_editable_mut(&mut self, editable: &mut Editable) {
        walk_editable_mut(self, editable);
    }

    fn visit_cell_mut(&mut self, cell: &mut Cell) {
        walk_cell_mut(self, cell);
    }

    fn visit_row_mut(&mut self, row: &mut Row) {
        walk_row_mut(self, row);
    }

    fn visit_content_mut(&mut self, _content: &mut Content) {
        // Leaf node, no children to walk
    }

    fn visit_layout_mut(&mut self, _layout: &mut Layout) {
        // Leaf node, no children to walk
    }
}

// Default walk implementations for immutable visitor

pub fn walk_editable<V: Visitor>(visitor: &mut V, editable: &Editable) {
    for cell in &editable.cells {
        visitor.visit_cell(cell);
    }
}

pub fn walk_cell<V: Visitor>(visitor: &mut V, cell: &Cell) {
    if let Some(content) = &cell.content {
        visitor.visit_content(content);
    }
    if let Some(layout) = &cell.layout {
        visitor.visit_layout(layout);
    }
    for row in &cell.rows {
        visitor.visit_row(row);
    }
}

pub fn walk_row<V: Visitor>(visitor: &mut V, row: &Row) {
    for cell in &row.cells {
        visitor.visit_cell(cell);
    }
}

// Default walk implementations for mutable visitor

pub fn walk_editable_mut<V: VisitorMut>(visitor: &mut V, editable: &mut Editable) {
    for cell in &mut editable.cells {
        visitor.visit_cell_mut(cell);
    }
}

pub fn walk_cell_mut<V: VisitorMut>(visitor: &mut V, cell: &mut Cell) {
    if let Some(content) = &mut cell.content {
        visitor.visit_content_mut(content);
    }
    if let Some(layout) = &mut cell.layout {
        visitor.visit_layout_mut(layout);
    }
    for row in &mut cell.rows {
        visitor.visit_row_mut(row);
    }
}

pub fn walk_row_mut<V: VisitorMut>(visitor: &mut V, row: &mut Row) {
    for cell in &mut row.cells {
        visitor.visit_cell_mut(cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trellis_model::{Content, PluginRef};

    #[derive(Default)]
    struct Counter {
        cells: usize,
        rows: usize,
        contents: usize,
    }

    impl Visitor for Counter {
        fn visit_cell(&mut self, cell: &Cell) {
            self.cells += 1;
            walk_cell(self, cell);
        }

        fn visit_row(&mut self, row: &Row) {
            self.rows += 1;
            walk_row(self, row);
        }

        fn visit_content(&mut self, _content: &Content) {
            self.contents += 1;
        }
    }

    #[test]
    fn test_visitor_reaches_every_node() {
        let leaf = Cell::with_content(Content::new(
            PluginRef::any("text"),
            json!({ "text": "hi" }),
        ));
        let editable = Editable {
            id: "root".to_string(),
            cells: vec![Cell::container(vec![Row::with_cells(vec![
                leaf,
                Cell::default(),
            ])])],
            config: Config::default(),
        };

        let mut counter = Counter::default();
        counter.visit_editable(&editable);

        assert_eq!(counter.cells, 3);
        assert_eq!(counter.rows, 1);
        assert_eq!(counter.contents, 1);
    }

    struct Renamer;

    impl VisitorMut for Renamer {
        fn visit_cell_mut(&mut self, cell: &mut Cell) {
            cell.id = format!("cell-{}", cell.id);
            walk_cell_mut(self, cell);
        }
    }

    #[test]
    fn test_mutable_visitor_transforms_in_place() {
        let mut editable = Editable {
            id: "root".to_string(),
            cells: vec![Cell {
                id: "a".to_string(),
                ..Cell::default()
            }],
            config: Config::default(),
        };

        Renamer.visit_editable_mut(&mut editable);
        assert_eq!(editable.cells[0].id, "cell-a");
    }
}
