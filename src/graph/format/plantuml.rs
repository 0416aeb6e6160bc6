//! PlantUML entity-relationship output.

use super::plain_identifier;
use crate::graph::view::{GraphView, TableSketch};
use crate::graph::RenderMode;
use crate::schema::Model;

/// Relationship marker used for every edge
const MANY_TO_ONE: &str = "}o--||";

/// Generate a PlantUML entity diagram
pub fn to_plantuml(model: &Model, mode: RenderMode) -> String {
    let view = GraphView::new(model, mode);
    let mut output = String::new();

    output.push_str("@startuml\n");
    output.push_str("hide circle\n");
    output.push_str("skinparam linetype ortho\n\n");

    for table in &view.tables {
        write_entity(&mut output, table);
    }

    if !view.edges.is_empty() {
        output.push('\n');
    }

    for edge in &view.edges {
        output.push_str(&format!(
            "{} {} {}\n",
            plain_identifier(&edge.from_id),
            MANY_TO_ONE,
            plain_identifier(&edge.to_id)
        ));
    }

    output.push_str("@enduml\n");
    output
}

fn write_entity(output: &mut String, table: &TableSketch<'_>) {
    let heading = format!(
        "entity \"{}\" as {}",
        escape_quoted(table.display_name),
        plain_identifier(&table.id)
    );

    if table.lines.is_empty() {
        output.push_str(&heading);
        output.push('\n');
        return;
    }

    output.push_str(&heading);
    output.push_str(" {\n");

    // Key columns first, then a divider
    let (keys, others): (Vec<_>, Vec<_>) =
        table.lines.iter().partition(|line| line.column.primary_key);

    for line in &keys {
        output.push_str(&format!(
            "  *{} : {}\n",
            field_name(line.name),
            line.type_descriptor
        ));
    }
    if !keys.is_empty() {
        output.push_str("  --\n");
    }

    for line in &others {
        let required = if line.column.not_null { "*" } else { "" };
        let fk = if line.column.is_foreign_key() {
            " <<FK>>"
        } else {
            ""
        };
        output.push_str(&format!(
            "  {}{} : {}{}\n",
            required,
            field_name(line.name),
            line.type_descriptor,
            fk
        ));
    }

    output.push_str("}\n");
}

fn escape_quoted(s: &str) -> String {
    s.replace('"', "'").replace(['\r', '\n'], " ")
}

/// Column names other than plain identifiers are quoted so that a leading
/// `-`, `.` or `*` is not read as PlantUML syntax
fn field_name(name: &str) -> String {
    if !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        format!("\"{}\"", escape_quoted(name))
    }
}
