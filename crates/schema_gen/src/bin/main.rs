//! CLI for generating random schemas.
//!
//! Usage:
//!   gen-schema --scale medium --seed 42 > schema.sql
//!   gen-schema --tables 500 --fk-style alter -o big.sql

use clap::Parser;
use schema_gen::{FkStyle, Scale, SchemaGenerator};

#[derive(Parser, Debug)]
#[command(name = "gen-schema")]
#[command(about = "Generate random CREATE TABLE DDL for dbviz", long_about = None)]
struct Args {
    /// Scale preset: small, medium, large
    /// Ignored if --tables is specified
    #[arg(short, long, default_value = "small")]
    scale: String,

    /// Number of tables (overrides --scale)
    #[arg(long)]
    tables: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Foreign key style: inline, alter
    #[arg(long, default_value = "inline")]
    fk_style: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let scale: Scale = args.scale.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let style: FkStyle = args
        .fk_style
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let mut gen = SchemaGenerator::new(args.seed, scale);
    let schema = match args.tables {
        Some(count) => gen.generate_tables(count),
        None => gen.generate(),
    };
    let ddl = schema.to_ddl(style);

    if let Some(ref path) = args.output {
        std::fs::write(path, &ddl)?;
        eprintln!(
            "Generated {} tables, {} foreign keys to {}",
            schema.tables.len(),
            schema.foreign_key_count(),
            path
        );
    } else {
        print!("{}", ddl);
    }

    Ok(())
}
