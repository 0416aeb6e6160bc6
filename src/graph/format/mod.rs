//! Output notations for ER diagrams.

mod dot;
pub(crate) mod json;
mod mermaid;
mod plantuml;

pub use dot::to_dot;
pub use json::to_json;
pub use mermaid::to_mermaid;
pub use plantuml::to_plantuml;
#[allow(unused_imports)]
pub use json::{ColumnJson, ErdJson, ErdStats, RelationshipJson, TableJson};

use super::RenderMode;
use crate::schema::Model;
use std::fmt;
use std::str::FromStr;

/// Output notation for diagram export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Graphviz DOT graph description
    #[default]
    Dot,
    /// PlantUML entity-relationship notation
    PlantUml,
    /// Mermaid erDiagram format
    Mermaid,
    /// JSON model export
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" | "graphviz" => Ok(OutputFormat::Dot),
            "plantuml" | "puml" | "plant" => Ok(OutputFormat::PlantUml),
            "mermaid" | "mmd" => Ok(OutputFormat::Mermaid),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown format: {}. Valid options: dot, plantuml, mermaid, json",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Dot => write!(f, "dot"),
            OutputFormat::PlantUml => write!(f, "plantuml"),
            OutputFormat::Mermaid => write!(f, "mermaid"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl OutputFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Dot => "dot",
            OutputFormat::PlantUml => "puml",
            OutputFormat::Mermaid => "mmd",
            OutputFormat::Json => "json",
        }
    }

    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "dot" | "gv" => Some(OutputFormat::Dot),
            "puml" | "plantuml" | "pu" => Some(OutputFormat::PlantUml),
            "mmd" | "mermaid" => Some(OutputFormat::Mermaid),
            "json" => Some(OutputFormat::Json),
            "png" | "svg" | "pdf" => Some(OutputFormat::Dot), // Will be rendered
            _ => None,
        }
    }
}

/// Layout direction for the graph description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Top to bottom
    #[default]
    TB,
    /// Left to right
    LR,
}

impl Layout {
    pub fn from_left_to_right(lr: bool) -> Self {
        if lr {
            Layout::LR
        } else {
            Layout::TB
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lr" | "left-right" | "horizontal" => Ok(Layout::LR),
            "tb" | "td" | "top-bottom" | "top-down" | "vertical" => Ok(Layout::TB),
            _ => Err(format!("Unknown layout: {}. Valid options: lr, tb", s)),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::LR => write!(f, "lr"),
            Layout::TB => write!(f, "tb"),
        }
    }
}

/// Replace everything but letters, digits and `_` with `_`, for notations
/// whose identifiers cannot be quoted
pub(crate) fn plain_identifier(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Render `model` in the given notation
pub fn render(model: &Model, format: OutputFormat, mode: RenderMode, layout: Layout) -> String {
    match format {
        OutputFormat::Dot => to_dot(model, mode, layout),
        OutputFormat::PlantUml => to_plantuml(model, mode),
        OutputFormat::Mermaid => to_mermaid(model, mode),
        OutputFormat::Json => to_json(model, mode),
    }
}
