//! Tabular reports over an introspected model.
//!
//! A report lists every top-level table with its comment and a column
//! table (name, constraints, type, comment). An optional meta information
//! block records when and from where the report was produced. The same
//! content is written as Markdown or as a standalone HTML page.

mod html;
mod markdown;

pub use html::to_html;
pub use markdown::to_markdown;

use crate::schema::{Column, Model};
use chrono::{DateTime, Local};
use std::fmt;
use std::str::FromStr;

/// Title used when the model has no database, catalog or schema name
pub const UNKNOWN_NAME: &str = "Unknown Table/Schema/Catalog";

/// Report document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Html,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "html" | "htm" => Ok(ReportFormat::Html),
            _ => Err(format!(
                "Unknown report format: {}. Valid options: markdown, html",
                s
            )),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Markdown => write!(f, "markdown"),
            ReportFormat::Html => write!(f, "html"),
        }
    }
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "md",
            ReportFormat::Html => "html",
        }
    }

    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Some(ReportFormat::Markdown),
            "html" | "htm" => Some(ReportFormat::Html),
            _ => None,
        }
    }
}

/// Options for report generation
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Emit the "Meta Information" block
    pub with_meta_information: bool,
    /// Timestamp written into the meta block; the current local time when unset
    pub generated_at: Option<DateTime<Local>>,
}

impl ReportOptions {
    pub fn with_meta_information(mut self, enabled: bool) -> Self {
        self.with_meta_information = enabled;
        self
    }

    pub fn generated_at(mut self, at: DateTime<Local>) -> Self {
        self.generated_at = Some(at);
        self
    }
}

/// Render the report in the given format
pub fn render_report(model: &Model, format: ReportFormat, options: &ReportOptions) -> String {
    match format {
        ReportFormat::Markdown => to_markdown(model, options),
        ReportFormat::Html => to_html(model, options),
    }
}

/// Name shown in the report title
pub fn report_name(model: &Model) -> &str {
    model
        .database_product
        .as_deref()
        .or(model.catalog.as_deref())
        .or(model.schema.as_deref())
        .unwrap_or(UNKNOWN_NAME)
}

/// Textual description of a column's constraints, e.g. `PK, Not Null`
pub fn constraints(model: &Model, column: &Column) -> String {
    let mut parts = Vec::new();
    if column.primary_key {
        parts.push("PK".to_string());
    }
    if column.not_null {
        parts.push("Not Null".to_string());
    }
    if column.unique {
        parts.push("Unique".to_string());
    }
    if let Some(target) = column.foreign_key_table().and_then(|id| model.table(id)) {
        parts.push(format!("FK (table: {})", target.name()));
    }
    parts.join(", ")
}

/// Key/value rows of the meta information block
fn meta_information(model: &Model, options: &ReportOptions) -> Vec<(&'static str, String)> {
    let generated_at = options.generated_at.unwrap_or_else(Local::now);
    let mut meta = vec![
        (
            "Report generated at",
            generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
        ("Connection", model.connection.clone().unwrap_or_default()),
        (
            "Database Type",
            model.database_product.clone().unwrap_or_default(),
        ),
    ];
    if let Some(filter) = &model.filter {
        meta.push(("Filter", filter.clone()));
    }
    meta
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::schema::TableRegistry;

    pub(crate) fn create_test_model() -> Model {
        let mut registry = TableRegistry::new();
        let emp = registry.get_or_create(None, Some("TestSchema"), "EMP");
        let dept = registry.get_or_create(None, Some("TestSchema"), "DEPT");
        registry.table_mut(emp).unwrap().set_columns(vec![
            Column::new("PK_EMP_ID", "INT").primary_key().not_null(),
            Column::new("LNAME", "VARCHAR(80)").not_null(),
            Column::new("FK_DEPT_ID", "INT").references(dept, Some("PK_DEPT_ID")),
        ]);
        let dept_table = registry.table_mut(dept).unwrap();
        dept_table.set_columns(vec![
            Column::new("PK_DEPT_ID", "INT").primary_key().not_null(),
            Column::new("NAME", "VARCHAR(80)").not_null().with_comment("Department | name"),
        ]);
        dept_table.set_comment(Some("All departments".to_string()));

        let mut model = Model::new(registry, vec![emp, dept]);
        model.schema = Some("TestSchema".to_string());
        model
    }

    #[test]
    fn test_report_name_fallback() {
        let model = Model::new(TableRegistry::new(), Vec::new());
        assert_eq!(report_name(&model), UNKNOWN_NAME);

        let model = create_test_model();
        assert_eq!(report_name(&model), "TestSchema");
    }

    #[test]
    fn test_constraints_text() {
        let model = create_test_model();
        let emp = model.get_table("TestSchema.EMP").unwrap();

        let pk = emp.get_column("PK_EMP_ID").unwrap();
        assert_eq!(constraints(&model, pk), "PK, Not Null");
        let fk = emp.get_column("FK_DEPT_ID").unwrap();
        assert_eq!(constraints(&model, fk), "FK (table: DEPT)");
    }

    #[test]
    fn test_report_format_parsing() {
        assert_eq!("HTML".parse::<ReportFormat>(), Ok(ReportFormat::Html));
        assert_eq!("md".parse::<ReportFormat>(), Ok(ReportFormat::Markdown));
        assert!("pdf".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::from_extension("HTM"), Some(ReportFormat::Html));
        assert_eq!(ReportFormat::from_extension("txt"), None);
        assert_eq!(ReportFormat::default(), ReportFormat::Markdown);
    }

    #[test]
    fn test_render_report_dispatch() {
        let model = create_test_model();
        let options = ReportOptions::default();

        let md = render_report(&model, ReportFormat::Markdown, &options);
        assert!(md.starts_with("# Report on TestSchema"));
        let html = render_report(&model, ReportFormat::Html, &options);
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
