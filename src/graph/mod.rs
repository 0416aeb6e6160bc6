//! ER diagram rendering.
//!
//! This module provides:
//! - Two table-rendering strategies selected by [`RenderMode`]
//! - Graphviz DOT, PlantUML, Mermaid and JSON notations over the same
//!   per-table output plus one edge per (table, referenced table) pair
//! - Identifier sanitization shared by every notation
//!
//! Rendering is a pure function of the model and the mode: no I/O and no
//! state shared between calls, so identical input yields identical text.

pub mod format;
pub mod view;

pub use format::{render, to_dot, to_json, to_mermaid, to_plantuml, Layout, OutputFormat};
pub use view::{ColumnLine, EdgeInfo, GraphView, KeyMarker, TableSketch};

use crate::schema::Table;
use std::fmt;
use std::str::FromStr;

/// Which table-rendering strategy to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Heading plus one row per column
    #[default]
    Detailed,
    /// Display name only, no column rows
    EntitiesOnly,
}

impl RenderMode {
    pub fn from_entities_only(entities_only: bool) -> Self {
        if entities_only {
            RenderMode::EntitiesOnly
        } else {
            RenderMode::Detailed
        }
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "detailed" | "full" => Ok(RenderMode::Detailed),
            "entities" | "entities-only" | "simple" => Ok(RenderMode::EntitiesOnly),
            _ => Err(format!(
                "Unknown render mode: {}. Valid options: detailed, entities-only",
                s
            )),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Detailed => write!(f, "detailed"),
            RenderMode::EntitiesOnly => write!(f, "entities-only"),
        }
    }
}

/// Replace every `.` and `$` with `_`.
///
/// Distinct names that differ only in these characters (`A.B` and `A_B`)
/// map to the same identifier.
pub fn make_identifier(name: &str) -> String {
    name.replace(['.', '$'], "_")
}

/// Node identifier of a table, used for its declaration and every edge endpoint
pub fn node_id(table: &Table) -> String {
    make_identifier(&table.key().to_lowercase())
}
