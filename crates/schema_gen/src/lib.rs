//! Random schema generator for dbviz tests and benchmarks.
//!
//! Generates deterministic, FK-consistent DDL for a given seed.
//!
//! # Example
//!
//! ```rust
//! use schema_gen::{FkStyle, Scale, SchemaGenerator};
//!
//! let schema = SchemaGenerator::new(42, Scale::Small).generate();
//! let ddl = schema.to_ddl(FkStyle::Inline);
//!
//! assert!(ddl.contains("CREATE TABLE"));
//! ```

pub mod generator;
pub mod schema;

pub use generator::{Scale, SchemaGenerator};
pub use schema::{Column, FkStyle, ForeignKey, Schema, SqlType, Table};
