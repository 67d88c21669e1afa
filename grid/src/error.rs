//! Errors raised while feeding data or configuration into the grid.
//!
//! Grid operations themselves never fail; bad cell data is reported through
//! the validation map instead. These errors only cover malformed input at the
//! boundary (JSON rows, column configs, engine settings).

/// Error returned when grid input cannot be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A column `type` string is not one of `string`, `number`, `boolean`, `date`.
    #[error("unknown column type: {0}")]
    UnknownColumnType(String),
    /// The row collection was not a JSON array.
    #[error("expected a JSON array of rows")]
    RowsNotArray,
    /// A row in the collection was not a JSON object.
    #[error("row {index} is not a JSON object")]
    RowNotObject { index: usize },
    /// A row id was neither a string nor a number.
    #[error("row id must be a string or number, got {0}")]
    InvalidRowId(String),
    /// The engine configuration is inconsistent.
    #[error("invalid grid config: {0}")]
    InvalidConfig(String),
    /// Input was not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
