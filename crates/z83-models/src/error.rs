//! Model validation errors.

use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("{field} is not accepted for {role} accounts")]
    UnexpectedIdentifier { field: &'static str, role: &'static str },

    #[error("Unknown application status: {0}")]
    UnknownStatus(String),

    #[error("Unknown document kind: {0}")]
    UnknownDocumentKind(String),
}
