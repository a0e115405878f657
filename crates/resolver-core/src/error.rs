//! Error types for the parameter resolver
//!
//! All fallible operations return `Result<T, Error>`.
//! Definition-time variants come out of [`crate::Resolver::add_parameter`];
//! resolution-time variants are delivered through the result of
//! [`crate::Resolver::resolve`] and its adapters.

use thiserror::Error;

/// Resolver error kinds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Specification is not a structured value, or lacks `name`/`required`
    #[error("Resolver error: parameter not valid")]
    ParameterNotValid,

    /// Unrecognized type tag
    #[error("Resolver error: wrong type \"{0}\"")]
    InvalidType(String),

    /// Default supplied for a required parameter
    #[error("Resolver error: trying to set default value to required parameter")]
    DefaultOnRequired,

    /// Default value disagrees with the declared type
    #[error("Resolver error: default value doesn't match the param type")]
    DefaultTypeMismatch,

    #[error("Resolver error: available values is not an array")]
    ValuesNotArray,

    #[error("Resolver error: available values array is empty")]
    ValuesEmpty,

    /// `parent` present but blank (or not a string)
    #[error("Resolver error: parent name is empty")]
    EmptyParentName,

    /// Referenced parent already declared with a non-object type
    #[error("Resolver error: parent \"{parent}\" is declared with type \"{found}\"")]
    ParentTypeConflict { parent: String, found: String },

    /// `(name, parent)` pair already registered
    #[error("Resolver error: parameter \"{}\" already defined", qualified(.name, .parent.as_deref()))]
    DuplicateParameter {
        name: String,
        parent: Option<String>,
    },

    #[error("Resolver error: no parameters specified")]
    NoResolverParameters,

    #[error("Resolver error: empty data provided")]
    EmptyData,

    #[error("Resolver error: \"{0}\" required parameter not found")]
    NoRequiredParameter(String),

    #[error("Resolver error: \"{0}\" has wrong type")]
    ParameterWrongType(String),

    #[error("Resolver error: \"{0}\" has wrong value")]
    ParameterWrongValue(String),
}

fn qualified(name: &str, parent: Option<&str>) -> String {
    match parent {
        Some(p) => format!("{}.{}", p, name),
        None => name.to_string(),
    }
}

impl Error {
    /// Stable machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            Error::ParameterNotValid => "PARAMETER_NOT_VALID",
            Error::InvalidType(_) => "INVALID_TYPE",
            Error::DefaultOnRequired => "DEFAULT_ON_REQUIRED",
            Error::DefaultTypeMismatch => "DEFAULT_TYPE_MISMATCH",
            Error::ValuesNotArray => "VALUES_NOT_ARRAY",
            Error::ValuesEmpty => "VALUES_EMPTY",
            Error::EmptyParentName => "EMPTY_PARENT_NAME",
            Error::ParentTypeConflict { .. } => "PARENT_TYPE_CONFLICT",
            Error::DuplicateParameter { .. } => "DUPLICATE_PARAMETER",
            Error::NoResolverParameters => "NO_RESOLVER_PARAMETERS",
            Error::EmptyData => "EMPTY_DATA",
            Error::NoRequiredParameter(_) => "NO_REQUIRED_PARAMETER",
            Error::ParameterWrongType(_) => "PARAMETER_WRONG_TYPE",
            Error::ParameterWrongValue(_) => "PARAMETER_WRONG_VALUE",
        }
    }

    /// True for errors raised while building the schema, false for
    /// errors produced by resolving a record.
    pub fn is_definition_error(&self) -> bool {
        !matches!(
            self,
            Error::NoResolverParameters
                | Error::EmptyData
                | Error::NoRequiredParameter(_)
                | Error::ParameterWrongType(_)
                | Error::ParameterWrongValue(_)
        )
    }
}

/// Result type alias for resolver operations
pub type Result<T> = std::result::Result<T, Error>;
