//! Mermaid erDiagram format output.

use super::plain_identifier;
use crate::graph::view::GraphView;
use crate::graph::RenderMode;
use crate::schema::Model;

/// Generate Mermaid erDiagram from a model
pub fn to_mermaid(model: &Model, mode: RenderMode) -> String {
    let view = GraphView::new(model, mode);
    let mut output = String::new();

    output.push_str("erDiagram\n");

    for table in &view.tables {
        let safe_name = plain_identifier(&table.id);

        if table.lines.is_empty() {
            output.push_str(&format!("    {}[\"{}\"]\n", safe_name, table.display_name));
            continue;
        }

        output.push_str(&format!("    {}[\"{}\"] {{\n", safe_name, table.display_name));
        for line in &table.lines {
            let col_type = escape_mermaid_type(line.type_descriptor);
            let col_name = plain_identifier(line.name);
            let mut row = format!("        {} {}", col_type, col_name);
            let key_marker = line.marker.as_str();
            if !key_marker.is_empty() {
                row.push(' ');
                row.push_str(key_marker);
            }
            if !line.constraints.is_empty() {
                row.push_str(&format!(" \"{}\"", line.constraints));
            }
            row.push('\n');
            output.push_str(&row);
        }
        output.push_str("    }\n");
    }

    if !view.edges.is_empty() {
        output.push('\n');
    }

    for edge in &view.edges {
        output.push_str(&format!(
            "    {} }}o--|| {} : \"\"\n",
            plain_identifier(&edge.from_id),
            plain_identifier(&edge.to_id)
        ));
    }

    output
}

/// Escape a type string for Mermaid (no spaces, special chars)
fn escape_mermaid_type(s: &str) -> String {
    // Size suffixes are not valid in Mermaid attribute types
    let base = match s.find('(') {
        Some(paren_pos) => &s[..paren_pos],
        None => s,
    };
    base.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
