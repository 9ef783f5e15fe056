//! The module contains the errors the list core can return.
//!
//! The errors are:
//!
//! - [`ListError`] returned synchronously when a caller misuses a controller
//!   or the orchestrator (empty sort field, zero page size, bulk action
//!   requested without a selection, ...).
//! - [`ServiceError`] produced by the external collaborators (data source and
//!   bulk-action handlers). Its message is meant to be shown to the user as is.
use thiserror::Error;

/// Errors raised by the list controllers and the orchestrator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("sort field must not be empty")]
    EmptySortField,
    #[error("page size must be greater than zero")]
    InvalidPageSize,
    #[error("no rows selected")]
    NoSelection,
    #[error("\"{0}\" bulk action not found")]
    UnknownAction(String),
    #[error("\"{0}\" bulk action is disabled")]
    ActionDisabled(String),
    #[error("{0}")]
    Validation(String),
    #[error("a bulk action is already being submitted")]
    BulkInProgress,
    #[error("no bulk action is waiting for confirmation")]
    NotConfirming,
}

/// Failure reported by a data source or a bulk-action handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for ServiceError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ServiceError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
