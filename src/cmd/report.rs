//! Report command: introspect a database and write a Markdown or HTML report.

use super::{load_model, write_output};
use anyhow::Result;
use dbviz::config::ReportConfig;
use dbviz::report::{render_report, ReportOptions};
use tracing::debug;

pub fn run(config: &ReportConfig) -> Result<()> {
    let model = load_model(&config.run)?;

    debug!("Rendering {} report", config.format);
    let options = ReportOptions::default().with_meta_information(config.meta);
    let content = render_report(&model, config.format, &options);

    write_output(&content, config.output.as_deref())?;
    if let Some(path) = &config.output {
        eprintln!("Report written to: {}", path.display());
    }

    eprintln!(
        "Report: {} tables, {} columns, {} relationships",
        model.len(),
        model.column_count(),
        model.relationship_count()
    );
    Ok(())
}
