//! Schema introspection: reads catalog metadata and builds a [`Model`].
//!
//! The introspector works one schema at a time and one table at a time,
//! issuing a single blocking metadata query at a time:
//! - one `tables` query per schema (plus one `schemas` query when no schema
//!   is given)
//! - `primary_keys`, `imported_keys` and `columns` for every table that
//!   passes the name filter; filtered tables cost no further queries
//!
//! Tables are created through a run-scoped [`TableRegistry`], so a table that
//! is introspected directly and the same table reached only as a
//! foreign-key target resolve to one record.

mod dialect;

pub use dialect::{Dialect, DialectQuirks};

use crate::error::{IntrospectWarning, Result};
use crate::metadata::{MetadataSource, TableKind, TableRow};
use crate::schema::{synthesize_type, Column, ForeignKeyRef, Model, TableId, TableRegistry, TypeSpec};
use ahash::{AHashMap, AHashSet};
use regex::Regex;
use tracing::{debug, info, warn};

/// Relation kinds that are introspected
pub const TABLE_KINDS: [TableKind; 2] = [TableKind::Table, TableKind::View];

/// Introspect `source` and build a model.
///
/// With `schema` unset every schema reported by the source is processed and
/// the tables are merged into one model. `filter` is matched against local
/// table names (unanchored; use `^`/`$` to anchor).
pub fn retrieve<S: MetadataSource + ?Sized>(
    source: &S,
    dialect: Dialect,
    catalog: Option<&str>,
    schema: Option<&str>,
    filter: Option<&Regex>,
) -> Result<Model> {
    let mut introspector = Introspector::new(source, dialect);
    if let Some(filter) = filter {
        introspector = introspector.with_filter(filter.clone());
    }
    introspector.retrieve(catalog, schema)
}

/// Compile a table name filter, reporting an invalid pattern as a warning
pub fn compile_filter(pattern: &str) -> std::result::Result<Regex, IntrospectWarning> {
    Regex::new(pattern).map_err(|e| IntrospectWarning::InvalidFilterPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// One introspection run over a borrowed metadata source
pub struct Introspector<'a, S: MetadataSource + ?Sized> {
    source: &'a S,
    quirks: DialectQuirks,
    dialect: Dialect,
    filter: Option<Regex>,
    registry: TableRegistry,
    warnings: Vec<IntrospectWarning>,
}

impl<'a, S: MetadataSource + ?Sized> Introspector<'a, S> {
    pub fn new(source: &'a S, dialect: Dialect) -> Self {
        Self {
            source,
            quirks: dialect.quirks(),
            dialect,
            filter: None,
            registry: TableRegistry::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: Regex) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Use a textual filter pattern. An invalid pattern disables filtering
    /// for the run and is recorded as a warning.
    pub fn with_filter_pattern(mut self, pattern: &str) -> Self {
        match compile_filter(pattern) {
            Ok(regex) => {
                info!("Using filter pattern {}", pattern);
                self.filter = Some(regex);
            }
            Err(warning) => {
                warn!("{}", warning);
                self.filter = None;
                self.warnings.push(warning);
            }
        }
        self
    }

    /// Run the introspection and hand back the finished model
    pub fn retrieve(mut self, catalog: Option<&str>, schema: Option<&str>) -> Result<Model> {
        let scopes: Vec<(Option<String>, String)> = match schema {
            Some(schema) => vec![(catalog.map(str::to_string), schema.to_string())],
            None => self
                .source
                .schemas()?
                .into_iter()
                .filter(|row| match (catalog, row.catalog.as_deref()) {
                    (Some(wanted), Some(reported)) => wanted == reported,
                    _ => true,
                })
                .map(|row| (row.catalog.or_else(|| catalog.map(str::to_string)), row.schema))
                .collect(),
        };

        let mut table_list = Vec::new();
        for (scope_catalog, scope_schema) in &scopes {
            debug!(
                "Going to retrieve tables for catalog '{}' and schema '{}'",
                scope_catalog.as_deref().unwrap_or("-"),
                scope_schema
            );
            let ids = self.retrieve_schema(scope_catalog.as_deref(), scope_schema)?;
            table_list.extend(ids);
        }

        let product = self.source.product_info();
        let mut model = Model::new(self.registry, table_list);
        model.catalog = catalog.map(str::to_string);
        model.schema = schema.map(str::to_string);
        model.database_product = product.map(|p| p.to_string());
        model.filter = self.filter.as_ref().map(|f| f.as_str().to_string());
        model.warnings = self.warnings;

        info!(
            "Retrieved {} tables ({} dialect) from {} schema(s)",
            model.len(),
            self.dialect,
            scopes.len()
        );
        Ok(model)
    }

    fn retrieve_schema(&mut self, catalog: Option<&str>, schema: &str) -> Result<Vec<TableId>> {
        let rows = self.source.tables(catalog, Some(schema), &TABLE_KINDS)?;
        let mut ids = Vec::new();

        for row in rows {
            if let Some(filter) = &self.filter {
                if !filter.is_match(&row.name) {
                    debug!("Table '{}' does not match filter, skipping", row.name);
                    continue;
                }
            }
            debug!("Table: '{}' ({})", row.name, row.kind);
            ids.push(self.retrieve_table(catalog, schema, row)?);
        }
        Ok(ids)
    }

    fn retrieve_table(
        &mut self,
        catalog: Option<&str>,
        schema: &str,
        row: TableRow,
    ) -> Result<TableId> {
        let source = self.source;
        let name = row.name.as_str();

        let primary_keys: AHashSet<String> = source
            .primary_keys(catalog, Some(schema), name)?
            .into_iter()
            .collect();

        let mut foreign_keys: AHashMap<String, ForeignKeyRef> = AHashMap::new();
        for key in source.imported_keys(catalog, Some(schema), name)? {
            let pk_catalog = if self.quirks.suppress_foreign_key_catalog {
                None
            } else {
                key.pk_catalog
            };
            let target_catalog = pk_catalog.as_deref().or(catalog);
            let target_schema = key.pk_schema.as_deref().or(Some(schema));
            let target = self
                .registry
                .get_or_create(target_catalog, target_schema, &key.pk_table);
            debug!(
                "FK column '{}' -> '{}' (PK of referenced table: '{}')",
                key.fk_column,
                key.pk_table,
                key.pk_column.as_deref().unwrap_or("?")
            );
            foreign_keys.insert(
                key.fk_column,
                ForeignKeyRef {
                    table: target,
                    column: key.pk_column,
                },
            );
        }

        let mut columns = Vec::new();
        for col in source.columns(catalog, Some(schema), name)? {
            let spec = TypeSpec {
                code: col.data_type,
                type_name: col.type_name,
                size: col.column_size,
                decimal_digits: col.decimal_digits,
                char_octet_length: col.char_octet_length,
            };
            let synthesized = synthesize_type(&spec, self.quirks.zero_size_decimal_uses_octets);
            if synthesized.code.is_none() {
                let warning = IntrospectWarning::UnrecognizedTypeCode {
                    table: name.to_string(),
                    column: col.name.clone(),
                    code: col.data_type,
                };
                warn!("{}", warning);
                self.warnings.push(warning);
            }
            debug!("Column: '{}', Type: '{}'", col.name, synthesized.descriptor);

            let primary_key = primary_keys.contains(&col.name);
            let foreign_key = foreign_keys.get(&col.name).cloned();
            columns.push(Column {
                primary_key,
                unique: col.unique,
                not_null: !col.nullable,
                comment: col.remarks,
                foreign_key,
                type_descriptor: synthesized.descriptor,
                name: col.name,
            });
        }

        let id = self.registry.get_or_create(catalog, Some(schema), name);
        if let Some(table) = self.registry.table_mut(id) {
            table.set_columns(columns);
            table.set_comment(row.remarks);
        }
        Ok(id)
    }
}
