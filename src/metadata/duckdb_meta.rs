//! Metadata source backed by an embedded DuckDB database.
//!
//! All answers come from `information_schema` and the `duckdb_constraints()`,
//! `duckdb_tables()` and `duckdb_columns()` table functions.
//! DuckDB only allows foreign keys within one schema, so imported keys are
//! reported without a catalog or schema and resolve to the current ones.

use super::{
    ColumnRow, ImportedKeyRow, MetadataError, MetadataResult, MetadataSource, ProductInfo,
    SchemaRow, TableKind, TableRow,
};
use crate::error::DbvizError;
use crate::schema::TypeCode;
use duckdb::{params_from_iter, AccessMode, Config, Connection};
use std::path::Path;
use tracing::debug;

/// Open a database file for introspection.
///
/// A path of `:memory:` opens an empty in-memory database.
pub fn open_database(path: &Path, read_only: bool) -> Result<Connection, DbvizError> {
    let target = path.display().to_string();
    if target == ":memory:" {
        return Connection::open_in_memory().map_err(|e| DbvizError::connection(target, e));
    }
    if !path.exists() {
        return Err(DbvizError::connection(target, "database file does not exist"));
    }

    debug!("Opening DuckDB database {} (read-only: {})", target, read_only);
    let conn = if read_only {
        let config = Config::default()
            .access_mode(AccessMode::ReadOnly)
            .map_err(|e| DbvizError::connection(&target, e))?;
        Connection::open_with_flags(path, config)
    } else {
        Connection::open(path)
    };
    conn.map_err(|e| DbvizError::connection(target, e))
}

/// Borrowing metadata view of a DuckDB connection
pub struct DuckDbMetadata<'a> {
    conn: &'a Connection,
}

impl<'a> DuckDbMetadata<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Run a query with string parameters and map every row, releasing the
    /// statement before returning
    fn query_rows<T, F>(
        &self,
        operation: &'static str,
        sql: &str,
        params: &[String],
        map: F,
    ) -> MetadataResult<Vec<T>>
    where
        F: FnMut(&duckdb::Row<'_>) -> duckdb::Result<T>,
    {
        debug!("{}: {}", operation, sql);
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| MetadataError::new(operation, e))?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), map)
            .map_err(|e| MetadataError::new(operation, e))?;
        rows.collect::<duckdb::Result<Vec<T>>>()
            .map_err(|e| MetadataError::new(operation, e))
    }
}

/// Append `AND <column> = ?` for each present scope segment
fn scope_filter(
    sql: &mut String,
    params: &mut Vec<String>,
    catalog_column: &str,
    schema_column: &str,
    catalog: Option<&str>,
    schema: Option<&str>,
) {
    if let Some(catalog) = catalog {
        sql.push_str(&format!(" AND {} = ?", catalog_column));
        params.push(catalog.to_string());
    }
    if let Some(schema) = schema {
        sql.push_str(&format!(" AND {} = ?", schema_column));
        params.push(schema.to_string());
    }
}

fn to_u32(value: Option<i64>) -> u32 {
    value
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or_default()
}

/// Map a DuckDB type string onto a standard type code and its base name
pub fn duckdb_type_code(data_type: &str) -> (TypeCode, String) {
    let trimmed = data_type.trim();
    if trimmed.ends_with("[]") {
        return (TypeCode::Array, trimmed.to_string());
    }
    let base = trimmed
        .split('(')
        .next()
        .unwrap_or(trimmed)
        .trim()
        .to_uppercase();

    let code = match base.as_str() {
        "BOOLEAN" | "BOOL" => TypeCode::Boolean,
        "TINYINT" | "INT1" => TypeCode::TinyInt,
        "SMALLINT" | "INT2" => TypeCode::SmallInt,
        "INTEGER" | "INT4" | "INT" => TypeCode::Integer,
        "BIGINT" | "INT8" => TypeCode::BigInt,
        "HUGEINT" => TypeCode::Numeric,
        "FLOAT" | "FLOAT4" | "REAL" => TypeCode::Real,
        "DOUBLE" | "FLOAT8" => TypeCode::Double,
        "DECIMAL" | "NUMERIC" => TypeCode::Decimal,
        "VARCHAR" | "TEXT" | "STRING" => TypeCode::VarChar,
        "CHAR" | "BPCHAR" => TypeCode::Char,
        "BLOB" | "BYTEA" => TypeCode::Blob,
        "BIT" | "BITSTRING" => TypeCode::Bit,
        "DATE" => TypeCode::Date,
        "TIME" => TypeCode::Time,
        "TIMESTAMP" | "DATETIME" => TypeCode::Timestamp,
        "TIMESTAMP WITH TIME ZONE" | "TIMESTAMPTZ" => TypeCode::TimestampWithTimezone,
        "TIME WITH TIME ZONE" | "TIMETZ" => TypeCode::TimeWithTimezone,
        "STRUCT" => TypeCode::Struct,
        "LIST" => TypeCode::Array,
        _ => TypeCode::Other,
    };
    (code, base)
}

impl MetadataSource for DuckDbMetadata<'_> {
    fn schemas(&self) -> MetadataResult<Vec<SchemaRow>> {
        self.query_rows(
            "schemas",
            "SELECT catalog_name, schema_name FROM information_schema.schemata \
             WHERE catalog_name NOT IN ('system', 'temp') \
             AND schema_name NOT IN ('information_schema', 'pg_catalog') \
             ORDER BY catalog_name, schema_name",
            &[],
            |row| {
                Ok(SchemaRow {
                    catalog: row.get::<_, Option<String>>(0)?,
                    schema: row.get(1)?,
                })
            },
        )
    }

    fn tables(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        kinds: &[TableKind],
    ) -> MetadataResult<Vec<TableRow>> {
        if kinds.is_empty() {
            return Ok(Vec::new());
        }
        let type_list = kinds
            .iter()
            .map(|k| match k {
                TableKind::Table => "'BASE TABLE'",
                TableKind::View => "'VIEW'",
            })
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!(
            "SELECT table_name, table_type, TABLE_COMMENT FROM information_schema.tables \
             WHERE table_type IN ({})",
            type_list
        );
        let mut params = Vec::new();
        scope_filter(
            &mut sql,
            &mut params,
            "table_catalog",
            "table_schema",
            catalog,
            schema,
        );
        sql.push_str(" ORDER BY table_name");

        self.query_rows("tables", &sql, &params, |row| {
            let table_type: String = row.get(1)?;
            Ok(TableRow {
                name: row.get(0)?,
                kind: if table_type == "VIEW" {
                    TableKind::View
                } else {
                    TableKind::Table
                },
                remarks: row
                    .get::<_, Option<String>>(2)?
                    .filter(|c| !c.is_empty()),
            })
        })
    }

    fn primary_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<String>> {
        let mut sql = String::from(
            "SELECT unnest(constraint_column_names) FROM duckdb_constraints() \
             WHERE constraint_type = 'PRIMARY KEY' AND table_name = ?",
        );
        let mut params = vec![table.to_string()];
        scope_filter(
            &mut sql,
            &mut params,
            "database_name",
            "schema_name",
            catalog,
            schema,
        );

        self.query_rows("primary_keys", &sql, &params, |row| row.get(0))
    }

    fn imported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<ImportedKeyRow>> {
        // Constraint names keep the spelling of the FOREIGN KEY clause; join
        // back to the catalog for the declared names
        let mut sql = String::from(
            "SELECT coalesce(o.column_name, k.fk_column), \
             coalesce(t.table_name, k.referenced_table), \
             coalesce(c.column_name, k.pk_column) \
             FROM (SELECT database_name, schema_name, table_name, referenced_table, \
                   unnest(constraint_column_names) AS fk_column, \
                   unnest(referenced_column_names) AS pk_column \
                   FROM duckdb_constraints() \
                   WHERE constraint_type = 'FOREIGN KEY' AND table_name = ?",
        );
        let mut params = vec![table.to_string()];
        scope_filter(
            &mut sql,
            &mut params,
            "database_name",
            "schema_name",
            catalog,
            schema,
        );
        sql.push_str(
            ") k \
             LEFT JOIN duckdb_columns() o \
             ON o.database_name = k.database_name AND o.schema_name = k.schema_name \
             AND o.table_name = k.table_name AND lower(o.column_name) = lower(k.fk_column) \
             LEFT JOIN duckdb_tables() t \
             ON t.database_name = k.database_name AND t.schema_name = k.schema_name \
             AND lower(t.table_name) = lower(k.referenced_table) \
             LEFT JOIN duckdb_columns() c \
             ON c.database_name = t.database_name AND c.schema_name = t.schema_name \
             AND c.table_name = t.table_name AND lower(c.column_name) = lower(k.pk_column) \
             ORDER BY k.fk_column",
        );

        self.query_rows("imported_keys", &sql, &params, |row| {
            Ok(ImportedKeyRow {
                fk_column: row.get(0)?,
                pk_catalog: None,
                pk_schema: None,
                pk_table: row.get(1)?,
                pk_column: row.get::<_, Option<String>>(2)?,
            })
        })
    }

    fn columns(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> MetadataResult<Vec<ColumnRow>> {
        let mut sql = String::from(
            "SELECT c.column_name, c.data_type, \
             CAST(c.character_maximum_length AS BIGINT), \
             CAST(c.numeric_precision AS BIGINT), \
             CAST(c.numeric_scale AS BIGINT), \
             c.is_nullable, c.COLUMN_COMMENT, \
             EXISTS (SELECT 1 FROM duckdb_constraints() k \
                     WHERE k.constraint_type = 'UNIQUE' \
                     AND k.database_name = c.table_catalog \
                     AND k.schema_name = c.table_schema \
                     AND k.table_name = c.table_name \
                     AND len(k.constraint_column_names) = 1 \
                     AND k.constraint_column_names[1] = c.column_name) \
             FROM information_schema.columns c WHERE c.table_name = ?",
        );
        let mut params = vec![table.to_string()];
        scope_filter(
            &mut sql,
            &mut params,
            "c.table_catalog",
            "c.table_schema",
            catalog,
            schema,
        );
        sql.push_str(" ORDER BY c.ordinal_position");

        self.query_rows("columns", &sql, &params, |row| {
            let data_type: String = row.get(1)?;
            let (code, base_name) = duckdb_type_code(&data_type);
            let char_length = to_u32(row.get::<_, Option<i64>>(2)?);
            let precision = to_u32(row.get::<_, Option<i64>>(3)?);
            let scale = to_u32(row.get::<_, Option<i64>>(4)?);
            let is_nullable: String = row.get(5)?;

            let (column_size, decimal_digits) = match code {
                TypeCode::VarChar | TypeCode::Char => (char_length, 0),
                _ => (precision, scale),
            };

            Ok(ColumnRow {
                name: row.get(0)?,
                data_type: code.code(),
                type_name: Some(base_name),
                column_size,
                decimal_digits,
                char_octet_length: char_length,
                nullable: is_nullable.eq_ignore_ascii_case("yes"),
                unique: row.get(7)?,
                remarks: row
                    .get::<_, Option<String>>(6)?
                    .filter(|c| !c.is_empty()),
            })
        })
    }

    fn product_info(&self) -> Option<ProductInfo> {
        let version: Option<String> = self
            .conn
            .query_row("SELECT version()", [], |row| row.get(0))
            .ok();
        Some(ProductInfo {
            name: "DuckDB".to_string(),
            version,
        })
    }
}
