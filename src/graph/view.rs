//! Notation-neutral view of a model for ER rendering.
//!
//! Each table is turned into a [`TableSketch`] by the strategy picked in
//! [`sketch_table`]; the notation writers in [`format`](super::format) only
//! lay the sketches out.

use super::{node_id, RenderMode};
use crate::schema::{Column, Model, Table};

/// Separator between constraint annotations of one column
pub const CONSTRAINT_SEPARATOR: &str = ", ";

/// Key marker shown in front of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMarker {
    Primary,
    Foreign,
    None,
}

impl KeyMarker {
    pub fn for_column(column: &Column) -> Self {
        if column.primary_key {
            KeyMarker::Primary
        } else if column.is_foreign_key() {
            KeyMarker::Foreign
        } else {
            KeyMarker::None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KeyMarker::Primary => "PK",
            KeyMarker::Foreign => "FK",
            KeyMarker::None => "",
        }
    }
}

/// One rendered column row
#[derive(Debug, Clone)]
pub struct ColumnLine<'a> {
    pub marker: KeyMarker,
    pub name: &'a str,
    pub type_descriptor: &'a str,
    /// `not null` and `unique`, joined by [`CONSTRAINT_SEPARATOR`]
    pub constraints: String,
    pub column: &'a Column,
}

impl<'a> ColumnLine<'a> {
    fn new(column: &'a Column) -> Self {
        Self {
            marker: KeyMarker::for_column(column),
            name: &column.name,
            type_descriptor: &column.type_descriptor,
            constraints: constraint_annotations(column),
            column,
        }
    }
}

/// Per-table output of a rendering strategy
#[derive(Debug, Clone)]
pub struct TableSketch<'a> {
    /// Sanitized node identifier
    pub id: String,
    /// Heading shown for the table
    pub display_name: &'a str,
    /// Column rows; always empty in entities-only mode
    pub lines: Vec<ColumnLine<'a>>,
    pub table: &'a Table,
}

/// A directed relationship from a referencing table to a referenced one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeInfo {
    pub from_id: String,
    pub to_id: String,
    pub from_key: String,
    pub to_key: String,
}

/// Render one table with the strategy selected by `mode`
pub fn sketch_table(table: &Table, mode: RenderMode) -> TableSketch<'_> {
    match mode {
        RenderMode::Detailed => detailed(table),
        RenderMode::EntitiesOnly => entities_only(table),
    }
}

fn detailed(table: &Table) -> TableSketch<'_> {
    TableSketch {
        id: node_id(table),
        display_name: table.name(),
        lines: table.columns().iter().map(ColumnLine::new).collect(),
        table,
    }
}

fn entities_only(table: &Table) -> TableSketch<'_> {
    TableSketch {
        id: node_id(table),
        display_name: table.name(),
        lines: Vec::new(),
        table,
    }
}

/// Constraint annotations of a column
pub fn constraint_annotations(column: &Column) -> String {
    let mut parts = Vec::new();
    if column.not_null {
        parts.push("not null");
    }
    if column.unique {
        parts.push("unique");
    }
    parts.join(CONSTRAINT_SEPARATOR)
}

/// Tables and edges of a model, in model order
#[derive(Debug)]
pub struct GraphView<'a> {
    pub tables: Vec<TableSketch<'a>>,
    pub edges: Vec<EdgeInfo>,
    pub mode: RenderMode,
}

impl<'a> GraphView<'a> {
    /// Build the view.
    ///
    /// One edge per (table, distinct referenced table). Edges to tables that
    /// are not part of the top-level list are kept; the renderer then refers
    /// to an undeclared node.
    pub fn new(model: &'a Model, mode: RenderMode) -> Self {
        let mut tables = Vec::with_capacity(model.len());
        let mut edges = Vec::new();

        for table in model.tables() {
            let sketch = sketch_table(table, mode);
            for target in model.relations(table) {
                edges.push(EdgeInfo {
                    from_id: sketch.id.clone(),
                    to_id: node_id(target),
                    from_key: table.key().to_string(),
                    to_key: target.key().to_string(),
                });
            }
            tables.push(sketch);
        }

        Self {
            tables,
            edges,
            mode,
        }
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
