//! Random schema generator.
//!
//! Produces deterministic schemas for a given seed: every table has an
//! `id` primary key, a handful of attribute columns and foreign keys to
//! tables generated before it, so the result always loads in order.

use crate::schema::{Column, Schema, SqlType, Table};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Generation scale presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// 5 tables
    Small,
    /// 40 tables
    Medium,
    /// 250 tables
    Large,
}

impl Scale {
    pub fn tables(&self) -> usize {
        match self {
            Scale::Small => 5,
            Scale::Medium => 40,
            Scale::Large => 250,
        }
    }

    pub fn max_attributes(&self) -> usize {
        match self {
            Scale::Small => 4,
            Scale::Medium => 8,
            Scale::Large => 12,
        }
    }

    pub fn max_foreign_keys(&self) -> usize {
        match self {
            Scale::Small => 1,
            Scale::Medium => 3,
            Scale::Large => 4,
        }
    }
}

impl std::str::FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(Scale::Small),
            "medium" => Ok(Scale::Medium),
            "large" => Ok(Scale::Large),
            _ => Err(format!(
                "Unknown scale: {}. Valid options: small, medium, large",
                s
            )),
        }
    }
}

const TABLE_NOUNS: &[&str] = &[
    "account", "address", "invoice", "customer", "product", "category", "supplier", "shipment",
    "warehouse", "employee", "department", "project", "task", "review", "tag", "region",
    "payment", "contract", "vendor", "ticket",
];

const ATTRIBUTE_NAMES: &[&str] = &[
    "name", "title", "code", "status", "amount", "quantity", "description", "created_at",
    "due_date", "active", "priority", "email", "phone", "note", "score", "rating",
];

/// Deterministic schema generator
pub struct SchemaGenerator {
    rng: ChaCha8Rng,
    scale: Scale,
}

impl SchemaGenerator {
    pub fn new(seed: u64, scale: Scale) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            scale,
        }
    }

    /// Generate a schema with the preset's number of tables
    pub fn generate(&mut self) -> Schema {
        self.generate_tables(self.scale.tables())
    }

    /// Generate a schema with an explicit number of tables
    pub fn generate_tables(&mut self, count: usize) -> Schema {
        let mut schema = Schema::new();
        let mut names: Vec<String> = Vec::with_capacity(count);

        for i in 0..count {
            let noun = TABLE_NOUNS[i % TABLE_NOUNS.len()];
            let name = if i < TABLE_NOUNS.len() {
                noun.to_string()
            } else {
                format!("{}_{}", noun, i / TABLE_NOUNS.len())
            };

            let table = self.generate_table(&name, &names);
            schema.push(table);
            names.push(name);
        }

        schema
    }

    fn generate_table(&mut self, name: &str, earlier: &[String]) -> Table {
        let mut table = Table::new(name).column(Column::new("id", SqlType::Integer).primary_key());

        let attributes = self.rng.random_range(1..=self.scale.max_attributes());
        let offset = self.rng.random_range(0..ATTRIBUTE_NAMES.len());
        for i in 0..attributes {
            let attr = ATTRIBUTE_NAMES[(offset + i) % ATTRIBUTE_NAMES.len()];
            let col_name = if i < ATTRIBUTE_NAMES.len() {
                attr.to_string()
            } else {
                format!("{}_{}", attr, i)
            };
            let mut column = Column::new(col_name, self.random_type());
            if self.rng.random_bool(0.4) {
                column = column.not_null();
            }
            if self.rng.random_bool(0.1) {
                column = column.unique();
            }
            table = table.column(column);
        }

        if !earlier.is_empty() {
            let fks = self.rng.random_range(0..=self.scale.max_foreign_keys());
            let mut used: Vec<usize> = Vec::new();
            for _ in 0..fks {
                let target = self.rng.random_range(0..earlier.len());
                if used.contains(&target) {
                    continue;
                }
                used.push(target);
                let target_name = &earlier[target];
                let mut column = Column::new(format!("{}_id", target_name), SqlType::Integer)
                    .references(target_name.clone(), "id");
                if self.rng.random_bool(0.5) {
                    column = column.not_null();
                }
                table = table.column(column);
            }
        }

        table
    }

    fn random_type(&mut self) -> SqlType {
        match self.rng.random_range(0..8) {
            0 => SqlType::Integer,
            1 => SqlType::BigInt,
            2 => SqlType::VarChar([40, 80, 255][self.rng.random_range(0..3)]),
            3 => SqlType::Text,
            4 => SqlType::Boolean,
            5 => SqlType::Decimal(10, self.rng.random_range(0..=4)),
            6 => SqlType::Timestamp,
            _ => SqlType::Date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FkStyle;

    #[test]
    fn test_same_seed_same_schema() {
        let a = SchemaGenerator::new(42, Scale::Medium).generate();
        let b = SchemaGenerator::new(42, Scale::Medium).generate();
        assert_eq!(a.to_ddl(FkStyle::Inline), b.to_ddl(FkStyle::Inline));
    }

    #[test]
    fn test_table_count_and_names_unique() {
        let schema = SchemaGenerator::new(7, Scale::Large).generate();
        assert_eq!(schema.tables.len(), 250);

        let mut names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 250);
    }

    #[test]
    fn test_foreign_keys_point_backwards() {
        let schema = SchemaGenerator::new(99, Scale::Medium).generate();
        for (idx, table) in schema.tables.iter().enumerate() {
            assert_eq!(table.primary_key_column(), Some("id"));
            for (_, fk) in table.foreign_keys() {
                let target = schema
                    .tables
                    .iter()
                    .position(|t| t.name == fk.to_table)
                    .unwrap();
                assert!(target < idx, "{} -> {}", table.name, fk.to_table);
            }
        }
    }
}
