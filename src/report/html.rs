//! Standalone HTML report page.

use super::{constraints, meta_information, report_name, ReportOptions};
use crate::schema::{Model, Table};

const NBSP: &str = "&nbsp;";

const STYLE: &str = r#"    <style>
      p, h1, h2, h3 { font-family: sans-serif; }
      table, th, td { border: 1px solid black; border-collapse: collapse; }
      th { font-family: sans-serif; padding: 10px; text-align: center; background-color: #f2f2f2; }
      td { font-family: sans-serif; padding: 10px; text-align: left; }
    </style>
"#;

/// Render the HTML report
pub fn to_html(model: &Model, options: &ReportOptions) -> String {
    let name = escape_html(report_name(model));
    let mut output = String::new();

    output.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n  <head>\n");
    output.push_str("    <meta charset=\"UTF-8\">\n");
    output.push_str(&format!("    <title>{}</title>\n", name));
    output.push_str(STYLE);
    output.push_str("  </head>\n  <body>\n");
    output.push_str(&format!("    <h1>Report on \"{}\"</h1>\n", name));

    if options.with_meta_information {
        output.push_str("    <h2>Meta Information</h2>\n    <table>\n");
        for (key, value) in meta_information(model, options) {
            output.push_str(&format!(
                "      <tr><td>{}</td><td>{}</td></tr>\n",
                key,
                cell(&value)
            ));
        }
        output.push_str("    </table>\n");
    }

    for table in model.tables() {
        write_table(&mut output, model, table);
    }

    output.push_str("  </body>\n</html>\n");
    output
}

fn write_table(output: &mut String, model: &Model, table: &Table) {
    output.push_str(&format!("    <h2>Table {}</h2>\n", escape_html(table.name())));
    output.push_str(&format!(
        "    <p>{}</p>\n",
        table.comment().map(cell).unwrap_or_else(|| NBSP.to_string())
    ));
    output.push_str("    <h3>Columns</h3>\n    <table>\n");
    output.push_str(
        "      <thead>\n        <tr><th>Name</th><th>Constraints</th><th>Type</th><th>Comment</th></tr>\n      </thead>\n",
    );
    output.push_str("      <tbody>\n");
    for column in table.columns() {
        output.push_str(&format!(
            "        <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            cell(&column.name),
            cell(&constraints(model, column)),
            cell(&column.type_descriptor),
            column.comment.as_deref().map(cell).unwrap_or_else(|| NBSP.to_string())
        ));
    }
    output.push_str("      </tbody>\n    </table>\n");
}

/// Escaped cell text; empty cells keep their borders with a non-breaking space
fn cell(s: &str) -> String {
    if s.is_empty() {
        NBSP.to_string()
    } else {
        escape_html(s)
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
