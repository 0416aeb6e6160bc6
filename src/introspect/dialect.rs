//! Database dialects and their metadata-reporting quirks.

use std::fmt;
use std::str::FromStr;

/// Named database engine the metadata comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    MySql,
    PostgreSql,
    H2,
    Oracle,
    Sqlite,
    #[default]
    DuckDb,
}

/// Per-dialect deviations from standard metadata reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DialectQuirks {
    /// The driver reports a catalog for foreign-key targets even when
    /// catalogs are unused; ignore it
    pub suppress_foreign_key_catalog: bool,
    /// Decimal types may report size 0; use the char-octet-length instead
    pub zero_size_decimal_uses_octets: bool,
}

const NO_QUIRKS: DialectQuirks = DialectQuirks {
    suppress_foreign_key_catalog: false,
    zero_size_decimal_uses_octets: false,
};

const QUIRKS: &[(Dialect, DialectQuirks)] = &[
    (
        Dialect::MySql,
        DialectQuirks {
            suppress_foreign_key_catalog: true,
            zero_size_decimal_uses_octets: false,
        },
    ),
    (
        Dialect::Oracle,
        DialectQuirks {
            suppress_foreign_key_catalog: false,
            zero_size_decimal_uses_octets: true,
        },
    ),
];

impl Dialect {
    pub const ALL: [Dialect; 6] = [
        Dialect::MySql,
        Dialect::PostgreSql,
        Dialect::H2,
        Dialect::Oracle,
        Dialect::Sqlite,
        Dialect::DuckDb,
    ];

    pub fn quirks(self) -> DialectQuirks {
        QUIRKS
            .iter()
            .find(|(d, _)| *d == self)
            .map(|(_, q)| *q)
            .unwrap_or(NO_QUIRKS)
    }

    /// Product name as the engine spells it
    pub fn product_name(self) -> &'static str {
        match self {
            Dialect::MySql => "MySQL",
            Dialect::PostgreSql => "PostgreSQL",
            Dialect::H2 => "H2",
            Dialect::Oracle => "Oracle",
            Dialect::Sqlite => "SQLite",
            Dialect::DuckDb => "DuckDB",
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "postgresql" | "postgres" | "pg" => Ok(Dialect::PostgreSql),
            "h2" => Ok(Dialect::H2),
            "oracle" => Ok(Dialect::Oracle),
            "sqlite" => Ok(Dialect::Sqlite),
            "duckdb" => Ok(Dialect::DuckDb),
            _ => Err(format!(
                "Unknown dialect: {}. Valid options: mysql, postgresql, h2, oracle, sqlite, duckdb",
                s
            )),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.product_name())
    }
}
