//! Markdown report.

use super::{constraints, meta_information, report_name, ReportOptions};
use crate::schema::Model;

const TABLE_ROW_SEPARATOR: &str = "|----|-----------|----|-------|\n";

/// Render the Markdown report
pub fn to_markdown(model: &Model, options: &ReportOptions) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Report on {}\n\n", report_name(model)));

    if options.with_meta_information {
        output.push_str("## Meta Information\n");
        output.push_str("| | Value |\n|---|---|\n");
        for (key, value) in meta_information(model, options) {
            output.push_str(&format!("| {} | {} |\n", key, escape_cell(&value)));
        }
        output.push('\n');
    }

    for table in model.tables() {
        output.push_str(&format!("## Table {}\n", table.name()));
        output.push_str(&format!("{}\n", table.comment().unwrap_or("")));
        output.push_str("### Columns\n\n");
        output.push_str("|Name|Constraints|Type|Comment|\n");
        output.push_str(TABLE_ROW_SEPARATOR);
        for column in table.columns() {
            let constraints = constraints(model, column);
            output.push_str(&format!(
                "|{}|{}|{}|{}|\n",
                escape_cell(&column.name),
                if constraints.is_empty() {
                    " ".to_string()
                } else {
                    constraints
                },
                escape_cell(&column.type_descriptor),
                column.comment.as_deref().map(escape_cell).unwrap_or_else(|| " ".to_string())
            ));
        }
        output.push('\n');
    }

    output
}

/// Keep pipes and line breaks from splitting a table cell
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::create_test_model;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_report_sections() {
        let model = create_test_model();
        let report = to_markdown(&model, &ReportOptions::default());

        assert!(report.starts_with("# Report on TestSchema\n"));
        assert!(report.contains("## Table EMP\n"));
        assert!(report.contains("## Table DEPT\nAll departments\n### Columns\n"));
        assert!(report.contains("|PK_EMP_ID|PK, Not Null|INT| |\n"));
        assert!(report.contains("|FK_DEPT_ID|FK (table: DEPT)|INT| |\n"));
        assert!(report.contains("|NAME|Not Null|VARCHAR(80)|Department \\| name|\n"));
        assert!(!report.contains("Meta Information"));
    }

    #[test]
    fn test_meta_information() {
        let mut model = create_test_model();
        model.database_product = Some("DuckDB v1.4.0".to_string());
        model.connection = Some("test.duckdb".to_string());
        model.filter = Some("^E".to_string());

        let at = Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let options = ReportOptions::default()
            .with_meta_information(true)
            .generated_at(at);
        let report = to_markdown(&model, &options);

        assert!(report.starts_with("# Report on DuckDB v1.4.0\n"));
        assert!(report.contains("| Report generated at | 2024-03-01 12:30:00 |\n"));
        assert!(report.contains("| Connection | test.duckdb |\n"));
        assert!(report.contains("| Database Type | DuckDB v1.4.0 |\n"));
        assert!(report.contains("| Filter | ^E |\n"));
    }
}
