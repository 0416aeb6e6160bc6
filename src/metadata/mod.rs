//! Metadata sources: the query handle the introspector reads from.
//!
//! A [`MetadataSource`] answers the standard catalog questions (schemas,
//! tables, primary keys, imported keys, columns). Every method returns fully
//! materialized rows, so the underlying cursor is consumed and released
//! before the call returns, on every exit path.

mod duckdb_meta;

pub use duckdb_meta::{open_database, DuckDbMetadata};

use crate::error::DbvizError;
use std::fmt;
use thiserror::Error;

/// Kind of relation reported by `tables()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Table,
    View,
}

impl TableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TableKind::Table => "TABLE",
            TableKind::View => "VIEW",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRow {
    pub catalog: Option<String>,
    pub schema: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub name: String,
    pub kind: TableKind,
    pub remarks: Option<String>,
}

/// One imported (foreign) key column of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedKeyRow {
    pub fk_column: String,
    pub pk_catalog: Option<String>,
    pub pk_schema: Option<String>,
    pub pk_table: String,
    pub pk_column: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnRow {
    pub name: String,
    /// Numeric type code (see [`TypeCode`](crate::schema::TypeCode))
    pub data_type: i32,
    pub type_name: Option<String>,
    pub column_size: u32,
    pub decimal_digits: u32,
    pub char_octet_length: u32,
    pub nullable: bool,
    pub unique: bool,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfo {
    pub name: String,
    pub version: Option<String>,
}

impl fmt::Display for ProductInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} {}", self.name, version),
            None => f.write_str(&self.name),
        }
    }
}

/// Failure of a single metadata call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation}: {message}")]
pub struct MetadataError {
    pub operation: &'static str,
    pub message: String,
}

impl MetadataError {
    pub fn new(operation: &'static str, err: impl fmt::Display) -> Self {
        Self {
            operation,
            message: err.to_string(),
        }
    }
}

impl From<MetadataError> for DbvizError {
    fn from(err: MetadataError) -> Self {
        DbvizError::MetadataQueryFailure {
            operation: err.operation,
            message: err.message,
        }
    }
}

pub type MetadataResult<T> = std::result::Result<T, MetadataError>;

/// Read-only catalog queries against a live database.
///
/// Implementations borrow their connection and never close it.
pub trait MetadataSource {
    /// All schemas visible through the connection
    fn schemas(&self) -> MetadataResult<Vec<SchemaRow>>;

    /// Relations of the given kinds in one schema
    fn tables(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        kinds: &[TableKind],
    ) -> MetadataResult<Vec<TableRow>>;

    /// Names of the primary-key columns of a table
    fn primary_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<String>>;

    /// Foreign-key columns of a table with the table/column they reference
    fn imported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<ImportedKeyRow>>;

    /// Columns of a table in ordinal order
    fn columns(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<ColumnRow>>;

    /// Database product name and version, if obtainable
    fn product_info(&self) -> Option<ProductInfo> {
        None
    }
}

impl<T: MetadataSource + ?Sized> MetadataSource for &T {
    fn schemas(&self) -> MetadataResult<Vec<SchemaRow>> {
        (**self).schemas()
    }

    fn tables(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        kinds: &[TableKind],
    ) -> MetadataResult<Vec<TableRow>> {
        (**self).tables(catalog, schema, kinds)
    }

    fn primary_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<String>> {
        (**self).primary_keys(catalog, schema, table)
    }

    fn imported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<ImportedKeyRow>> {
        (**self).imported_keys(catalog, schema, table)
    }

    fn columns(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<ColumnRow>> {
        (**self).columns(catalog, schema, table)
    }

    fn product_info(&self) -> Option<ProductInfo> {
        (**self).product_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_error_converts_to_query_failure() {
        let err: DbvizError = MetadataError::new("imported_keys", "no such table").into();
        match err {
            DbvizError::MetadataQueryFailure { operation, message } => {
                assert_eq!(operation, "imported_keys");
                assert_eq!(message, "no such table");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_metadata_error_display() {
        let err = MetadataError::new("columns", "table emp does not exist");
        assert_eq!(err.to_string(), "columns: table emp does not exist");
        let source: &dyn std::error::Error = &err;
        assert!(source.source().is_none());
    }

    #[test]
    fn test_product_info_display() {
        let info = ProductInfo {
            name: "DuckDB".to_string(),
            version: Some("v1.4.0".to_string()),
        };
        assert_eq!(info.to_string(), "DuckDB v1.4.0");
    }
}
