use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "Cannot access field `{type_name}::{field}` of type {field_type} as {requested}: \
         expected the field type or a numeric type convertible to it"
    )]
    AccessorShape {
        type_name: &'static str,
        field: &'static str,
        field_type: &'static str,
        requested: &'static str,
    },

    #[error("Accessor for `{type_name}::{field}` called with a source that is not a {type_name}")]
    SourceType {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("Accessor for `{type_name}::{field}` called with a value that is not a {expected}")]
    ValueType {
        type_name: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    #[error("Service {0} is not initialized")]
    NotInitialized(&'static str),

    #[error("Service {0} is already initialized")]
    AlreadyInitialized(&'static str),

    #[error(
        "Mod '{module}' not found. The module name of a settings type must match an enabled pack name"
    )]
    PackNotFound { module: String },

    #[error("Invalid version string: {0:?}")]
    InvalidVersion(String),

    #[error("No counter entry to subtract from")]
    CounterMissing,

    #[error("Counter underflow: {current} - {amount} is below the limit {limit}")]
    CounterUnderflow { current: i32, amount: i32, limit: i32 },

    #[error("Counter overflow: {current} + {amount} does not fit in an i32")]
    CounterOverflow { current: i32, amount: i32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
