//! Error types for mealdesk-admin

use mealdesk_common::events::StoreOp;
use mealdesk_common::ValidationErrors;
use thiserror::Error;

use crate::remote::RemoteError;

/// Errors surfaced by List Controller operations
///
/// None of these are fatal; each is caught at the operation boundary and
/// converted into user-visible feedback.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Draft failed validation; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Remote call failed; local collection unchanged
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Controller was shut down while the operation was outstanding
    #[error("{0} result discarded after shutdown")]
    Discarded(StoreOp),

    /// Confirm was requested with no pending delete
    #[error("No delete is awaiting confirmation")]
    NothingPending,

    /// A delete for this record is already in flight
    #[error("Delete already in progress for {0}")]
    DeleteInFlight(String),

    /// Referenced record is not in the current collection
    #[error("Food not found: {0}")]
    NotFound(String),
}

impl AdminError {
    /// Per-field messages when this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            AdminError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Result type for controller operations
pub type AdminResult<T> = Result<T, AdminError>;
