//! Graph command: introspect a database and write an ER diagram.

use super::{load_model, write_output};
use anyhow::{bail, Result};
use dbviz::config::GraphConfig;
use dbviz::graph::render;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Run the graph command
pub fn run(config: &GraphConfig) -> Result<()> {
    let model = load_model(&config.run)?;

    if model.is_empty() {
        eprintln!("No tables found in {}.", config.run.database);
    }

    debug!(
        "Rendering {} ({}, layout {})",
        config.format, config.mode, config.layout
    );
    let content = render(&model, config.format, config.mode, config.layout);

    match &config.output {
        Some(out_path) if config.wants_rendered_image() => {
            render_with_graphviz(&content, out_path)?;
        }
        Some(out_path) => {
            write_output(&content, Some(out_path))?;
            eprintln!("ERD written to: {}", out_path.display());
        }
        None => write_output(&content, None)?,
    }

    eprintln!(
        "ERD: {} tables, {} columns, {} relationships",
        model.len(),
        model.column_count(),
        model.relationship_count()
    );
    if !model.warnings.is_empty() {
        eprintln!("{} warning(s) during introspection", model.warnings.len());
    }

    Ok(())
}

/// Render DOT to PNG/SVG/PDF using Graphviz
fn render_with_graphviz(dot_source: &str, output_path: &Path) -> Result<()> {
    let ext = output_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png")
        .to_lowercase();

    let format_arg = format!("-T{}", ext);

    let mut child = Command::new("dot")
        .arg(&format_arg)
        .arg("-o")
        .arg(output_path)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!(
                    "Graphviz 'dot' command not found. Install Graphviz or write a .dot file instead."
                )
            } else {
                anyhow::anyhow!("Failed to run dot: {}", e)
            }
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(dot_source.as_bytes())?;
    }

    let status = child.wait()?;
    if !status.success() {
        bail!("Graphviz dot command failed with status: {}", status);
    }

    eprintln!("Rendered to: {}", output_path.display());
    Ok(())
}
