//! Error and warning types for schema introspection.
//!
//! Fatal conditions are [`DbvizError`] values and abort the current run.
//! Recoverable conditions are [`IntrospectWarning`] values: they are logged
//! when they happen and recorded on the resulting [`Model`](crate::schema::Model).

use std::fmt;
use thiserror::Error;

/// Fatal errors surfaced to the caller. There is no retry and no partial result.
#[derive(Error, Debug)]
pub enum DbvizError {
    /// No usable metadata handle could be obtained.
    #[error("cannot connect to {target}: {message}")]
    ConnectionFailure { target: String, message: String },

    /// A metadata query failed mid-run.
    #[error("metadata query '{operation}' failed: {message}")]
    MetadataQueryFailure {
        operation: &'static str,
        message: String,
    },
}

impl DbvizError {
    pub fn connection(target: impl Into<String>, err: impl fmt::Display) -> Self {
        DbvizError::ConnectionFailure {
            target: target.into(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbvizError>;

/// Non-fatal conditions. Only the textual type descriptor or the filtering
/// behaviour degrade; structural facts are never affected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntrospectWarning {
    /// The driver reported a type code outside the known enumeration.
    UnrecognizedTypeCode {
        table: String,
        column: String,
        code: i32,
    },
    /// The table name filter did not compile; filtering is disabled.
    InvalidFilterPattern { pattern: String, message: String },
}

impl fmt::Display for IntrospectWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntrospectWarning::UnrecognizedTypeCode {
                table,
                column,
                code,
            } => write!(
                f,
                "unrecognized type code {} for column {}.{}, using generic label",
                code, table, column
            ),
            IntrospectWarning::InvalidFilterPattern { pattern, message } => write!(
                f,
                "could not parse filter pattern '{}' ({}), no filter will be applied",
                pattern, message
            ),
        }
    }
}
