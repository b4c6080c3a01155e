use thiserror::Error;

use crate::schema::Country;

/// Errors surfaced by the record model.
///
/// Note that blank or non-numeric data cells are *not* an error anywhere in
/// this crate: they parse to zero under the lenient policy in [`crate::parse`].
#[derive(Debug, Error)]
pub enum CensusError {
    /// No schema is registered for the requested (table, country) pair.
    #[error("no schema registered for table `{table}` ({country})")]
    UnknownSchema { table: String, country: Country },

    /// The line's zone-code column was missing or too short to hold a
    /// 10-character zone code after the leading prefix character.
    #[error("malformed record ({reason}): {line:?}")]
    MalformedRecord { reason: String, line: String },

    /// A field name was requested that is not part of the record's schema.
    #[error("field `{field}` is not part of schema `{schema}`")]
    UnknownField { field: String, schema: String },

    /// Aggregation was attempted across records of different schemas.
    #[error("schema mismatch: `{left}` vs `{right}`")]
    SchemaMismatch { left: String, right: String },

    /// A schema descriptor was structurally invalid (duplicate field name,
    /// no fields, a field with no source columns).
    #[error("invalid schema `{table}`: {reason}")]
    InvalidSchema { table: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("schema descriptor error: {0}")]
    Descriptor(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CensusError>;
