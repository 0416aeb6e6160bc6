//! Normalized entity-relationship model produced by introspection.
//!
//! This module provides:
//! - [`Model`], the root container that owns every [`Table`] in an arena
//! - [`Table`] and [`Column`] records with their constraint flags
//! - Index-based foreign-key references, so cyclic relationships need no
//!   shared ownership
//! - Type descriptor synthesis from numeric type codes ([`types`])

pub mod types;

pub use types::{synthesize_type, TypeCode, TypeSpec};

use ahash::AHashMap;
use std::fmt;

/// Unique identifier for a table within a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(pub u32);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableId({})", self.0)
    }
}

/// Build the identity key `catalog.schema.name`, omitting absent segments
pub fn qualified_key(catalog: Option<&str>, schema: Option<&str>, name: &str) -> String {
    let mut key = String::new();
    for segment in [catalog, schema].into_iter().flatten() {
        key.push_str(segment);
        key.push('.');
    }
    key.push_str(name);
    key
}

/// Target of a foreign-key column. Both parts are non-owning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRef {
    /// Referenced table
    pub table: TableId,
    /// Referenced column name, when the driver reported one
    pub column: Option<String>,
}

/// Column definition within a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Synthesized type descriptor, e.g. `VARCHAR(80)`
    pub type_descriptor: String,
    pub primary_key: bool,
    pub unique: bool,
    pub not_null: bool,
    pub comment: Option<String>,
    /// Set when this column references another table
    pub foreign_key: Option<ForeignKeyRef>,
}

impl Column {
    pub fn new(name: impl Into<String>, type_descriptor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_descriptor: type_descriptor.into(),
            primary_key: false,
            unique: false,
            not_null: false,
            comment: None,
            foreign_key: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn references(mut self, table: TableId, column: Option<&str>) -> Self {
        self.foreign_key = Some(ForeignKeyRef {
            table,
            column: column.map(str::to_string),
        });
        self
    }

    /// Referenced table, if this column is a foreign key
    pub fn foreign_key_table(&self) -> Option<TableId> {
        self.foreign_key.as_ref().map(|fk| fk.table)
    }

    pub fn is_foreign_key(&self) -> bool {
        self.foreign_key.is_some()
    }
}

/// Table record. The qualified key is its identity within a model.
#[derive(Debug, Clone)]
pub struct Table {
    id: TableId,
    key: String,
    name: String,
    comment: Option<String>,
    columns: Vec<Column>,
    foreign_key_relations: Vec<TableId>,
}

impl Table {
    fn new(id: TableId, key: String, name: String) -> Self {
        Self {
            id,
            key,
            name,
            comment: None,
            columns: Vec::new(),
            foreign_key_relations: Vec::new(),
        }
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    /// Qualified key, `catalog.schema.name` with absent segments omitted
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Short display name (the local table name)
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Replace the column list and recompute the derived relations
    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
        self.update_foreign_key_relations();
    }

    /// Distinct referenced tables, in order of first appearance among the columns
    pub fn foreign_key_relations(&self) -> &[TableId] {
        &self.foreign_key_relations
    }

    /// Get a column by name (case-insensitive)
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    fn update_foreign_key_relations(&mut self) {
        self.foreign_key_relations.clear();
        for target in self.columns.iter().filter_map(Column::foreign_key_table) {
            if !self.foreign_key_relations.contains(&target) {
                self.foreign_key_relations.push(target);
            }
        }
    }
}

/// Run-scoped arena of tables keyed by qualified key.
///
/// `get_or_create` is the identity factory: the first call for a key
/// constructs the table, later calls return the same id.
#[derive(Debug, Default)]
pub struct TableRegistry {
    by_key: AHashMap<String, TableId>,
    tables: Vec<Table>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(
        &mut self,
        catalog: Option<&str>,
        schema: Option<&str>,
        name: &str,
    ) -> TableId {
        let key = qualified_key(catalog, schema, name);
        if let Some(&id) = self.by_key.get(&key) {
            return id;
        }
        let id = TableId(self.tables.len() as u32);
        self.by_key.insert(key.clone(), id);
        self.tables.push(Table::new(id, key, name.to_string()));
        id
    }

    pub fn lookup(&self, key: &str) -> Option<TableId> {
        self.by_key.get(key).copied()
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(id.0 as usize)
    }

    pub fn table_mut(&mut self, id: TableId) -> Option<&mut Table> {
        self.tables.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Root container produced by one introspection run
#[derive(Debug)]
pub struct Model {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    /// Database product name and version, when the driver reports it
    pub database_product: Option<String>,
    /// Descriptor of the originating connection (path or URL)
    pub connection: Option<String>,
    /// Human-readable description of the name filter in effect
    pub filter: Option<String>,
    /// Non-fatal conditions raised during introspection
    pub warnings: Vec<crate::error::IntrospectWarning>,
    registry: TableRegistry,
    table_list: Vec<TableId>,
}

impl Model {
    /// Assemble a model from a registry and the ordered list of top-level tables
    pub fn new(registry: TableRegistry, table_list: Vec<TableId>) -> Self {
        Self {
            catalog: None,
            schema: None,
            database_product: None,
            connection: None,
            filter: None,
            warnings: Vec::new(),
            registry,
            table_list,
        }
    }

    /// Top-level tables, in introspection order
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.table_list
            .iter()
            .filter_map(|&id| self.registry.table(id))
    }

    pub fn table_ids(&self) -> &[TableId] {
        &self.table_list
    }

    /// Resolve any table in the registry, including foreign-key-only targets
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.registry.table(id)
    }

    /// Look a table up by its qualified key
    pub fn get_table(&self, key: &str) -> Option<&Table> {
        self.registry.lookup(key).and_then(|id| self.table(id))
    }

    /// Tables referenced by `table`, resolved through the registry
    pub fn relations<'a>(&'a self, table: &'a Table) -> impl Iterator<Item = &'a Table> + 'a {
        table
            .foreign_key_relations()
            .iter()
            .filter_map(move |&id| self.table(id))
    }

    pub fn len(&self) -> usize {
        self.table_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table_list.is_empty()
    }

    /// Number of tables materialized during the run, top-level or not
    pub fn registry_len(&self) -> usize {
        self.registry.len()
    }

    pub fn column_count(&self) -> usize {
        self.tables().map(|t| t.columns().len()).sum()
    }

    pub fn relationship_count(&self) -> usize {
        self.tables().map(|t| t.foreign_key_relations().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_key() {
        assert_eq!(qualified_key(Some("db"), Some("main"), "emp"), "db.main.emp");
        assert_eq!(qualified_key(None, Some("main"), "emp"), "main.emp");
        assert_eq!(qualified_key(Some("db"), None, "emp"), "db.emp");
        assert_eq!(qualified_key(None, None, "emp"), "emp");
    }

    #[test]
    fn test_registry_returns_same_id_for_same_key() {
        let mut registry = TableRegistry::new();
        let a = registry.get_or_create(None, Some("hr"), "EMP");
        let b = registry.get_or_create(None, Some("hr"), "EMP");
        let c = registry.get_or_create(None, Some("sales"), "EMP");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(registry.len(), 2);

        let table = registry.table(a).unwrap();
        assert_eq!(table.key(), "hr.EMP");
        assert_eq!(table.name(), "EMP");
    }

    #[test]
    fn test_relations_are_distinct_in_first_seen_order() {
        let mut registry = TableRegistry::new();
        let emp = registry.get_or_create(None, None, "EMP");
        let dept = registry.get_or_create(None, None, "DEPT");
        let site = registry.get_or_create(None, None, "SITE");

        let table = registry.table_mut(emp).unwrap();
        table.set_columns(vec![
            Column::new("ID", "INTEGER").primary_key(),
            Column::new("SITE_ID", "INTEGER").references(site, Some("ID")),
            Column::new("DEPT_ID", "INTEGER").references(dept, Some("ID")),
            Column::new("BACKUP_SITE_ID", "INTEGER").references(site, Some("ID")),
        ]);
        assert_eq!(table.foreign_key_relations(), &[site, dept]);

        // Reassigning recomputes from scratch
        table.set_columns(vec![Column::new("DEPT_ID", "INTEGER").references(dept, None)]);
        assert_eq!(table.foreign_key_relations(), &[dept]);
    }

    #[test]
    fn test_model_counts() {
        let mut registry = TableRegistry::new();
        let emp = registry.get_or_create(None, None, "EMP");
        let dept = registry.get_or_create(None, None, "DEPT");
        registry.table_mut(emp).unwrap().set_columns(vec![
            Column::new("ID", "INTEGER").primary_key(),
            Column::new("DEPT_ID", "INTEGER").references(dept, None),
        ]);
        registry
            .table_mut(dept)
            .unwrap()
            .set_columns(vec![Column::new("ID", "INTEGER").primary_key()]);

        let model = Model::new(registry, vec![emp, dept]);
        assert_eq!(model.len(), 2);
        assert_eq!(model.column_count(), 3);
        assert_eq!(model.relationship_count(), 1);
        assert_eq!(model.get_table("DEPT").map(Table::id), Some(dept));

        let emp_table = model.table(emp).unwrap();
        let names: Vec<&str> = model.relations(emp_table).map(Table::name).collect();
        assert_eq!(names, vec!["DEPT"]);
    }
}
