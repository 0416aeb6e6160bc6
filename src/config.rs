//! Run configuration: command-line values overlaid on an optional YAML file.
//!
//! Values given on the command line win. Anything left unset falls back to
//! the YAML file (`--config`, or `<config dir>/dbviz/config.yaml` when that
//! exists), then to built-in defaults. Output settings are resolved per
//! command, so a diagram setting never affects a report run.

use crate::graph::{Layout, OutputFormat, RenderMode};
use crate::introspect::Dialect;
use crate::report::ReportFormat;
use anyhow::{bail, Context};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions that are rasterized from DOT by Graphviz
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "svg", "pdf"];

/// Database settings shared by every command
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Database file path, or `:memory:`
    pub database: String,
    pub dialect: Dialect,
    pub catalog: Option<String>,
    pub schema: Option<String>,
    /// Regular expression matched against table names
    pub filter: Option<String>,
}

/// Settings for the `graph` command
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub run: RunConfig,
    /// Diagram output file (None for stdout)
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub layout: Layout,
    pub mode: RenderMode,
}

impl GraphConfig {
    /// Whether the diagram should be rasterized by Graphviz
    pub fn wants_rendered_image(&self) -> bool {
        self.format == OutputFormat::Dot
            && image_extension(self.output.as_deref()).is_some()
    }
}

/// Settings for the `report` command
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub run: RunConfig,
    /// Report output file (None for stdout)
    pub output: Option<PathBuf>,
    pub format: ReportFormat,
    pub meta: bool,
}

impl RunConfig {
    /// Create a new builder
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }
}

/// Builder for the per-command configurations
#[derive(Default)]
pub struct RunConfigBuilder {
    database: Option<String>,
    dialect: Option<String>,
    catalog: Option<String>,
    schema: Option<String>,
    filter: Option<String>,
    output: Option<PathBuf>,
    format: Option<String>,
    left_to_right: bool,
    entities_only: bool,
    report_meta: bool,
    yaml: Option<DbvizYamlConfig>,
}

impl RunConfigBuilder {
    pub fn database(mut self, database: Option<String>) -> Self {
        self.database = database;
        self
    }

    pub fn dialect(mut self, dialect: Option<String>) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn catalog(mut self, catalog: Option<String>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn schema(mut self, schema: Option<String>) -> Self {
        self.schema = schema;
        self
    }

    pub fn filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    /// Output file of the command being configured
    pub fn output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    /// `--format` of the command being configured
    pub fn format(mut self, format: Option<String>) -> Self {
        self.format = format;
        self
    }

    pub fn left_to_right(mut self, lr: bool) -> Self {
        self.left_to_right = lr;
        self
    }

    pub fn entities_only(mut self, entities_only: bool) -> Self {
        self.entities_only = entities_only;
        self
    }

    pub fn report_meta(mut self, meta: bool) -> Self {
        self.report_meta = meta;
        self
    }

    pub fn yaml(mut self, yaml: Option<DbvizYamlConfig>) -> Self {
        self.yaml = yaml;
        self
    }

    /// Build the settings for the `graph` command
    pub fn build_graph(self) -> anyhow::Result<GraphConfig> {
        let yaml = self.yaml.clone().unwrap_or_default();
        let out = yaml.output;
        let run = self.run_config(yaml.database)?;

        let output = self.output.or(out.file);
        let format = resolve_format(self.format.as_deref(), output.as_deref(), out.format.as_deref())?;

        Ok(GraphConfig {
            run,
            output,
            format,
            layout: Layout::from_left_to_right(
                self.left_to_right || out.left_to_right.unwrap_or(false),
            ),
            mode: RenderMode::from_entities_only(
                self.entities_only || out.entities_only.unwrap_or(false),
            ),
        })
    }

    /// Build the settings for the `report` command
    pub fn build_report(self) -> anyhow::Result<ReportConfig> {
        let yaml = self.yaml.clone().unwrap_or_default();
        let out = yaml.output;
        let run = self.run_config(yaml.database)?;

        let output = self.output.or(out.report_file);
        let format = resolve_report_format(
            self.format.as_deref(),
            output.as_deref(),
            out.report_format.as_deref(),
        )?;

        Ok(ReportConfig {
            run,
            output,
            format,
            meta: self.report_meta || out.report_meta.unwrap_or(false),
        })
    }

    fn run_config(&self, db: DatabaseSection) -> anyhow::Result<RunConfig> {
        let database = self.database.clone().or(db.path).with_context(|| {
            "No database given: pass --database or set database.path in the config file"
        })?;

        let dialect = match self.dialect.clone().or(db.dialect) {
            Some(d) => d.parse().map_err(|e: String| anyhow::anyhow!(e))?,
            None => Dialect::default(),
        };

        Ok(RunConfig {
            database,
            dialect,
            catalog: self.catalog.clone().or(db.catalog),
            schema: self.schema.clone().or(db.schema),
            filter: self.filter.clone().or(db.filter),
        })
    }
}

/// Lowercased extension of `path` when it is one Graphviz rasterizes
fn image_extension(path: Option<&Path>) -> Option<String> {
    path.and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .filter(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

/// Pick the diagram notation: explicit format, then output file extension,
/// then the config file, then DOT. Image outputs require DOT.
fn resolve_format(
    cli: Option<&str>,
    output: Option<&Path>,
    yaml: Option<&str>,
) -> anyhow::Result<OutputFormat> {
    let ext = output
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str());

    let format = if let Some(f) = cli {
        f.parse::<OutputFormat>().map_err(|e| anyhow::anyhow!(e))?
    } else if let Some(format) = ext.and_then(OutputFormat::from_extension) {
        format
    } else if let Some(f) = yaml {
        f.parse::<OutputFormat>().map_err(|e| anyhow::anyhow!(e))?
    } else if let Some(ext) = ext {
        bail!(
            "Cannot infer the output format from '.{}': pass --format or set output.format in the config file",
            ext
        );
    } else {
        OutputFormat::default()
    };

    if let Some(ext) = image_extension(output) {
        if format != OutputFormat::Dot {
            bail!(
                "Cannot write {} output to a .{} file: only dot output is rendered to images",
                format,
                ext
            );
        }
    }
    Ok(format)
}

/// Pick the report format: explicit format, then output file extension,
/// then the config file, then Markdown
fn resolve_report_format(
    cli: Option<&str>,
    output: Option<&Path>,
    yaml: Option<&str>,
) -> anyhow::Result<ReportFormat> {
    if let Some(f) = cli {
        return f.parse().map_err(|e: String| anyhow::anyhow!(e));
    }
    let from_ext = output
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .and_then(ReportFormat::from_extension);
    if let Some(format) = from_ext {
        return Ok(format);
    }
    match yaml {
        Some(f) => f.parse().map_err(|e: String| anyhow::anyhow!(e)),
        None => Ok(ReportFormat::default()),
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DbvizYamlConfig {
    pub database: DatabaseSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub path: Option<String>,
    pub dialect: Option<String>,
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub file: Option<PathBuf>,
    pub format: Option<String>,
    pub left_to_right: Option<bool>,
    pub entities_only: Option<bool>,
    pub report_file: Option<PathBuf>,
    pub report_format: Option<String>,
    pub report_meta: Option<bool>,
}

impl DbvizYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// `<config dir>/dbviz/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dbviz").join("config.yaml"))
    }

    /// Load the explicit file if given, else the default file if it exists
    pub fn discover(explicit: Option<&Path>) -> anyhow::Result<Option<Self>> {
        if let Some(path) = explicit {
            debug!("Loading config from {}", path.display());
            return Self::load(path).map(Some);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!("Loading default config from {}", path.display());
                Self::load(&path).map(Some)
            }
            _ => Ok(None),
        }
    }
}
