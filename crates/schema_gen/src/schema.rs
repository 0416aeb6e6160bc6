//! Schema model for defining tables, columns, and relationships.
//!
//! Tables render to DDL with the foreign keys either inline in
//! `CREATE TABLE` or as trailing `ALTER TABLE ... ADD FOREIGN KEY`
//! statements.

use std::collections::HashMap;
use std::fmt::Write as _;

/// SQL data types
#[derive(Debug, Clone, PartialEq)]
pub enum SqlType {
    Integer,
    BigInt,
    VarChar(u16),
    Text,
    Boolean,
    /// Decimal with precision and scale
    Decimal(u8, u8),
    Timestamp,
    Date,
}

impl SqlType {
    pub fn to_sql(&self) -> String {
        match self {
            SqlType::Integer => "INTEGER".to_string(),
            SqlType::BigInt => "BIGINT".to_string(),
            SqlType::VarChar(n) => format!("VARCHAR({})", n),
            SqlType::Text => "TEXT".to_string(),
            SqlType::Boolean => "BOOLEAN".to_string(),
            SqlType::Decimal(p, s) => format!("DECIMAL({},{})", p, s),
            SqlType::Timestamp => "TIMESTAMP".to_string(),
            SqlType::Date => "DATE".to_string(),
        }
    }
}

/// How foreign keys are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FkStyle {
    /// `FOREIGN KEY (..) REFERENCES ..` inside `CREATE TABLE`
    #[default]
    Inline,
    /// Separate `ALTER TABLE .. ADD CONSTRAINT .. FOREIGN KEY` statements
    AlterTable,
}

impl std::str::FromStr for FkStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inline" => Ok(FkStyle::Inline),
            "alter" | "alter-table" => Ok(FkStyle::AlterTable),
            _ => Err(format!("Unknown FK style: {}. Valid options: inline, alter", s)),
        }
    }
}

/// Foreign key constraint
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub to_table: String,
    pub to_column: String,
}

/// Column definition
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub sql_type: SqlType,
    pub not_null: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub foreign_key: Option<ForeignKey>,
}

impl Column {
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            not_null: false,
            primary_key: false,
            unique: false,
            foreign_key: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key = Some(ForeignKey {
            to_table: table.into(),
            to_column: column.into(),
        });
        self
    }
}

/// Table definition
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn column(mut self, col: Column) -> Self {
        self.columns.push(col);
        self
    }

    /// Get the primary key column name (assumes single-column PK)
    pub fn primary_key_column(&self) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.primary_key)
            .map(|c| c.name.as_str())
    }

    /// Get all foreign key relationships
    pub fn foreign_keys(&self) -> Vec<(&str, &ForeignKey)> {
        self.columns
            .iter()
            .filter_map(|c| c.foreign_key.as_ref().map(|fk| (c.name.as_str(), fk)))
            .collect()
    }

    /// `CREATE TABLE` statement; FK clauses only with [`FkStyle::Inline`]
    pub fn create_statement(&self, style: FkStyle) -> String {
        let mut lines: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                let mut line = format!("    {} {}", c.name, c.sql_type.to_sql());
                if c.primary_key {
                    line.push_str(" PRIMARY KEY");
                } else {
                    if c.not_null {
                        line.push_str(" NOT NULL");
                    }
                    if c.unique {
                        line.push_str(" UNIQUE");
                    }
                }
                line
            })
            .collect();

        if style == FkStyle::Inline {
            for (column, fk) in self.foreign_keys() {
                lines.push(format!(
                    "    FOREIGN KEY ({}) REFERENCES {} ({})",
                    column, fk.to_table, fk.to_column
                ));
            }
        }

        format!("CREATE TABLE {} (\n{}\n);\n", self.name, lines.join(",\n"))
    }

    /// `ALTER TABLE` statements adding each foreign key
    pub fn alter_statements(&self) -> Vec<String> {
        self.foreign_keys()
            .into_iter()
            .map(|(column, fk)| {
                format!(
                    "ALTER TABLE {} ADD CONSTRAINT fk_{}_{} FOREIGN KEY ({}) REFERENCES {} ({});\n",
                    self.name, self.name, column, column, fk.to_table, fk.to_column
                )
            })
            .collect()
    }
}

/// Complete schema definition
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub tables: Vec<Table>,
    table_index: HashMap<String, usize>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: Table) -> Self {
        self.push(table);
        self
    }

    pub fn push(&mut self, table: Table) {
        let idx = self.tables.len();
        self.table_index.insert(table.name.clone(), idx);
        self.tables.push(table);
    }

    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.table_index.get(name).map(|&idx| &self.tables[idx])
    }

    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    pub fn foreign_key_count(&self) -> usize {
        self.tables.iter().map(|t| t.foreign_keys().len()).sum()
    }

    /// Get tables in topological order (dependencies first)
    pub fn tables_in_order(&self) -> Vec<&Table> {
        let mut visited = vec![false; self.tables.len()];
        let mut result = Vec::with_capacity(self.tables.len());

        fn visit<'a>(
            idx: usize,
            tables: &'a [Table],
            table_index: &HashMap<String, usize>,
            visited: &mut [bool],
            result: &mut Vec<&'a Table>,
        ) {
            if visited[idx] {
                return;
            }
            visited[idx] = true;

            for (_, fk) in tables[idx].foreign_keys() {
                if let Some(&dep_idx) = table_index.get(&fk.to_table) {
                    visit(dep_idx, tables, table_index, visited, result);
                }
            }

            result.push(&tables[idx]);
        }

        for idx in 0..self.tables.len() {
            visit(
                idx,
                &self.tables,
                &self.table_index,
                &mut visited,
                &mut result,
            );
        }

        result
    }

    /// Full DDL script, referenced tables created first
    pub fn to_ddl(&self, style: FkStyle) -> String {
        let mut out = String::new();
        for table in self.tables_in_order() {
            out.push_str(&table.create_statement(style));
            out.push('\n');
        }
        if style == FkStyle::AlterTable {
            for table in &self.tables {
                for stmt in table.alter_statements() {
                    let _ = write!(out, "{}", stmt);
                }
            }
        }
        out
    }
}
