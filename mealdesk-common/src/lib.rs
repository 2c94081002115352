//! # Mealdesk Common Library
//!
//! Shared code for the Mealdesk food administration tools:
//! - Canonical food record and draft types
//! - Record normalization of inconsistent service payloads
//! - Draft validation
//! - Outcome events (AdminEvent enum) and EventBus
//! - Configuration loading

pub mod config;
pub mod error;
pub mod events;
pub mod food;
pub mod normalize;
pub mod validate;

pub use error::{Error, Result};
pub use food::{Food, FoodDraft, RestaurantStatus, StatusSeverity, ValidatedDraft};
pub use normalize::normalize;
pub use validate::{validate, DraftField, ValidationErrors};
