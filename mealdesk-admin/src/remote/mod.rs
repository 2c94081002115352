//! Remote Store Client
//!
//! Every operation performs exactly one request against the food resource and
//! never retries. Responses are normalized before callers see them, so raw
//! payload shapes never leave this module.

pub mod http;
pub mod wire;

use async_trait::async_trait;
use mealdesk_common::events::StoreOp;
use mealdesk_common::{Food, ValidatedDraft};
use thiserror::Error;

pub use http::HttpFoodStore;

/// Underlying cause of a remote failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteErrorKind {
    /// Connection, timeout or other transport problem
    #[error("network error: {0}")]
    Network(String),

    /// Service answered with a non-2xx status
    #[error("HTTP {0}: {1}")]
    Status(u16, String),

    /// Body could not be read as JSON
    #[error("could not decode response: {0}")]
    Decode(String),
}

/// A failed remote operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{op} failed: {kind}")]
pub struct RemoteError {
    /// Operation that was attempted
    pub op: StoreOp,
    #[source]
    pub kind: RemoteErrorKind,
}

impl RemoteError {
    pub fn new(op: StoreOp, kind: RemoteErrorKind) -> Self {
        Self { op, kind }
    }
}

/// Access to the external food-record service
#[async_trait]
pub trait FoodStore: Send + Sync {
    /// Fetch records, optionally filtered by name on the server
    ///
    /// When [`supports_name_filter`](Self::supports_name_filter) is false the
    /// filter is ignored and the caller filters client-side.
    async fn list(&self, name_filter: Option<&str>) -> Result<Vec<Food>, RemoteError>;

    /// Persist a new record
    async fn create(&self, draft: &ValidatedDraft) -> Result<Food, RemoteError>;

    /// Replace an existing record, preserving its identifier
    async fn update(&self, id: &str, draft: &ValidatedDraft) -> Result<Food, RemoteError>;

    /// Remove a record
    async fn delete(&self, id: &str) -> Result<(), RemoteError>;

    /// Whether `list` honours its name filter
    fn supports_name_filter(&self) -> bool {
        false
    }
}
