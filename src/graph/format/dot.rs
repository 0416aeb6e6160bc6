//! Graphviz DOT output for ER diagrams.

use crate::graph::format::Layout;
use crate::graph::view::{GraphView, TableSketch};
use crate::graph::RenderMode;
use crate::schema::Model;

/// Port every node exposes; edges attach to it
const TABLE_PORT: &str = "p0";

/// Generate DOT output with one HTML-like table node per table
pub fn to_dot(model: &Model, mode: RenderMode, layout: Layout) -> String {
    let view = GraphView::new(model, mode);
    let mut output = String::new();

    output.push_str("digraph tables {\n");
    output.push_str("  graph [pad=\"0.5\", nodesep=\"1\", ranksep=\"1.5\"];\n");

    let rankdir = match layout {
        Layout::LR => "LR",
        Layout::TB => "TB",
    };
    output.push_str(&format!("  rankdir={};\n", rankdir));
    output.push_str("  node [shape=plaintext];\n\n");

    for table in &view.tables {
        output.push_str(&format!(
            "  {} [label=<{}>];\n",
            escape_dot_id(&table.id),
            generate_table_label(table)
        ));
    }

    if !view.edges.is_empty() {
        output.push('\n');
    }

    // Fixed crow's foot at the referencing end
    for edge in &view.edges {
        output.push_str(&format!(
            "  {}:{} -> {}:{} [arrowtail=crow, dir=back];\n",
            escape_dot_id(&edge.from_id),
            TABLE_PORT,
            escape_dot_id(&edge.to_id),
            TABLE_PORT
        ));
    }

    output.push_str("}\n");
    output
}

/// Generate HTML-like table label for DOT
fn generate_table_label(table: &TableSketch<'_>) -> String {
    let mut html = String::new();

    html.push_str(&format!(
        "<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\" CELLPADDING=\"4\" PORT=\"{}\">",
        TABLE_PORT
    ));

    html.push_str(&format!(
        "<TR><TD BGCOLOR=\"#4a5568\" COLSPAN=\"4\"><FONT COLOR=\"white\"><B>{}</B></FONT></TD></TR>",
        escape_html(table.display_name)
    ));

    for line in &table.lines {
        html.push_str("<TR>");
        html.push_str(&format!("<TD ALIGN=\"CENTER\">{}</TD>", line.marker.as_str()));
        html.push_str(&format!(
            "<TD ALIGN=\"LEFT\">{}</TD>",
            escape_html(line.name)
        ));
        html.push_str(&format!(
            "<TD ALIGN=\"LEFT\"><FONT COLOR=\"#666666\">{}</FONT></TD>",
            escape_html(line.type_descriptor)
        ));
        html.push_str(&format!(
            "<TD ALIGN=\"LEFT\">{}</TD>",
            escape_html(&line.constraints)
        ));
        html.push_str("</TR>");
    }

    html.push_str("</TABLE>");
    html
}

/// Escape a string for use in DOT HTML labels
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Quote a DOT node ID unless it is a plain identifier
fn escape_dot_id(s: &str) -> String {
    if s.chars().all(|c| c.is_alphanumeric() || c == '_') && !s.is_empty() {
        s.to_string()
    } else {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
