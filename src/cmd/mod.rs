mod graph;
mod report;

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use dbviz::config::{DbvizYamlConfig, RunConfig, RunConfigBuilder};
use dbviz::introspect::Introspector;
use dbviz::metadata::{open_database, DuckDbMetadata};
use dbviz::schema::Model;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "dbviz")]
#[command(version)]
#[command(about = "Draw entity-relationship diagrams from a live database schema", long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that reads a database
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Database file to introspect (`:memory:` for an empty in-memory database)
    #[arg(short = 'D', long)]
    pub database: Option<String>,

    /// Database dialect: mysql, postgresql, h2, oracle, sqlite, duckdb [default: duckdb]
    #[arg(short, long)]
    pub dialect: Option<String>,

    /// Catalog to read
    #[arg(long)]
    pub catalog: Option<String>,

    /// Schema to read (all schemas if not specified)
    #[arg(short, long)]
    pub schema: Option<String>,

    /// Regular expression; only tables whose name matches are included
    #[arg(long)]
    pub filter: Option<String>,

    /// YAML config file (defaults to <config dir>/dbviz/config.yaml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ConnectionArgs {
    fn builder(self) -> anyhow::Result<RunConfigBuilder> {
        let yaml = DbvizYamlConfig::discover(self.config.as_deref())?;
        Ok(RunConfig::builder()
            .database(self.database)
            .dialect(self.dialect)
            .catalog(self.catalog)
            .schema(self.schema)
            .filter(self.filter)
            .yaml(yaml))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Introspect a database and write an ER diagram
    Graph {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Output file (default: stdout). .png/.svg/.pdf are rendered with Graphviz
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: dot, plantuml, mermaid, json (default: from extension, else dot)
        #[arg(short, long)]
        format: Option<String>,

        /// Lay the graph out left to right
        #[arg(long)]
        lr: bool,

        /// Only show table names, no columns
        #[arg(long)]
        entities_only: bool,
    },

    /// Introspect a database and write a Markdown or HTML report
    Report {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format: markdown, html (default: from extension, else markdown)
        #[arg(short, long)]
        format: Option<String>,

        /// Include a meta information section
        #[arg(long)]
        meta: bool,
    },

    /// Generate shell completion scripts
    ///
    /// Examples:
    ///   dbviz completions bash > /etc/bash_completion.d/dbviz
    ///   dbviz completions zsh > "${fpath[1]}/_dbviz"
    #[command(verbatim_doc_comment)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Graph {
            connection,
            output,
            format,
            lr,
            entities_only,
        } => {
            let config = connection
                .builder()?
                .output(output)
                .format(format)
                .left_to_right(lr)
                .entities_only(entities_only)
                .build_graph()?;
            graph::run(&config)
        }
        Commands::Report {
            connection,
            output,
            format,
            meta,
        } => {
            let config = connection
                .builder()?
                .output(output)
                .format(format)
                .report_meta(meta)
                .build_report()?;
            report::run(&config)
        }
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "dbviz", &mut io::stdout());
            Ok(())
        }
    }
}

/// Open the configured database and introspect it
fn load_model(config: &RunConfig) -> anyhow::Result<Model> {
    let read_only = config.database != ":memory:";
    let conn = open_database(Path::new(&config.database), read_only)?;
    let source = DuckDbMetadata::new(&conn);

    let mut introspector = Introspector::new(&source, config.dialect);
    if let Some(pattern) = &config.filter {
        introspector = introspector.with_filter_pattern(pattern);
    }

    let mut model = introspector
        .retrieve(config.catalog.as_deref(), config.schema.as_deref())
        .with_context(|| format!("Failed to read the schema of {}", config.database))?;
    model.connection = Some(config.database.clone());

    info!(
        "Introspected {} tables from {} [dialect: {}]",
        model.len(),
        config.database,
        config.dialect
    );
    Ok(model)
}

/// Write text to a file, or to stdout when no path is given
fn write_output(content: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => print!("{}", content),
    }
    Ok(())
}
