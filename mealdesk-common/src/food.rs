//! Canonical food record, editable drafts and restaurant status types
//!
//! Every view and every mutation works on these shapes. Raw payloads from the
//! remote service are turned into [`Food`] by [`crate::normalize`]; user input is
//! collected in a [`FoodDraft`] and becomes a [`ValidatedDraft`] only through
//! [`crate::validate`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

// ========================================
// Canonical Record
// ========================================

/// A food entry ready for display or mutation
///
/// All fields are always populated; missing source values are replaced with the
/// defaults documented in [`crate::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    /// Server-assigned identifier, immutable once created
    pub id: String,
    /// Display name of the dish
    pub name: String,
    /// Rating, nominally 1-5 (0 when the source had none)
    pub rating: f64,
    /// Image URI (or the placeholder path)
    pub image: String,
    /// Name of the restaurant serving the dish
    pub restaurant_name: String,
    /// Restaurant logo URI (may be empty)
    pub restaurant_logo: String,
    /// Restaurant status exactly as the service reported it
    pub restaurant_status: String,
    /// Price (0 when absent)
    pub price: f64,
}

impl Food {
    /// Tag severity for the restaurant status
    pub fn severity(&self) -> StatusSeverity {
        StatusSeverity::classify(&self.restaurant_status)
    }

    /// Whether the restaurant is reported as closed
    pub fn is_closed(&self) -> bool {
        self.restaurant_status.trim().eq_ignore_ascii_case("closed")
    }

    /// Case-insensitive substring match on the display name
    ///
    /// An empty (or whitespace-only) term matches everything.
    pub fn matches_name(&self, term: &str) -> bool {
        let term = term.trim();
        term.is_empty() || self.name.to_lowercase().contains(&term.to_lowercase())
    }
}

/// Visual severity used when rendering a restaurant status tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusSeverity {
    Success,
    Danger,
    Warning,
    Info,
}

impl StatusSeverity {
    /// Classify a status string after upper-casing it
    ///
    /// `OPEN` / `OPEN NOW` → Success, `CLOSED` → Danger, `BUSY` → Warning,
    /// anything else → Info.
    pub fn classify(status: &str) -> Self {
        match status.trim().to_uppercase().as_str() {
            "OPEN" | "OPEN NOW" => StatusSeverity::Success,
            "CLOSED" => StatusSeverity::Danger,
            "BUSY" => StatusSeverity::Warning,
            _ => StatusSeverity::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusSeverity::Success => "success",
            StatusSeverity::Danger => "danger",
            StatusSeverity::Warning => "warning",
            StatusSeverity::Info => "info",
        }
    }
}

impl fmt::Display for StatusSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ========================================
// Restaurant Status
// ========================================

/// The statuses a user may assign when creating or editing a food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestaurantStatus {
    #[serde(rename = "Open Now")]
    OpenNow,
    #[serde(rename = "Closed")]
    Closed,
}

impl RestaurantStatus {
    /// All selectable values, in dropdown order
    pub const ALL: [RestaurantStatus; 2] = [RestaurantStatus::OpenNow, RestaurantStatus::Closed];

    /// Label shown to users and sent on the wire
    pub fn label(&self) -> &'static str {
        match self {
            RestaurantStatus::OpenNow => "Open Now",
            RestaurantStatus::Closed => "Closed",
        }
    }
}

impl RestaurantStatus {
    /// Map a status as reported by the service onto a selectable value
    ///
    /// Lenient: the search endpoint reports a bare `OPEN`, which maps to
    /// "Open Now". User input goes through `FromStr`, which accepts only the
    /// two labels.
    pub fn from_service(status: &str) -> Option<Self> {
        match status.trim().to_lowercase().as_str() {
            "open" => Some(RestaurantStatus::OpenNow),
            other => other.parse().ok(),
        }
    }
}

impl fmt::Display for RestaurantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RestaurantStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open now" => Ok(RestaurantStatus::OpenNow),
            "closed" => Ok(RestaurantStatus::Closed),
            other => Err(Error::InvalidInput(format!(
                "unknown restaurant status: {:?}",
                other
            ))),
        }
    }
}

// ========================================
// Drafts
// ========================================

/// Unpersisted, user-edited candidate record
///
/// Fields hold raw text exactly as entered so that validation can report on
/// every one of them. A fresh draft is entirely empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodDraft {
    pub name: String,
    pub rating: String,
    pub image: String,
    pub restaurant_name: String,
    pub restaurant_logo: String,
    pub restaurant_status: String,
    /// Optional; empty means "no price"
    pub price: String,
}

impl FoodDraft {
    /// Empty draft for the "add" flow
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft pre-filled from an existing record for the "edit" flow
    ///
    /// A status that is not one of the selectable values pre-fills as empty, so
    /// the user has to pick one explicitly.
    pub fn from_food(food: &Food) -> Self {
        let restaurant_status = RestaurantStatus::from_service(&food.restaurant_status)
            .map(|s| s.label().to_string())
            .unwrap_or_default();

        Self {
            name: food.name.clone(),
            rating: if food.rating > 0.0 {
                format_number(food.rating)
            } else {
                String::new()
            },
            image: food.image.clone(),
            restaurant_name: food.restaurant_name.clone(),
            restaurant_logo: food.restaurant_logo.clone(),
            restaurant_status,
            price: if food.price > 0.0 {
                format_number(food.price)
            } else {
                String::new()
            },
        }
    }
}

/// A draft that passed every validation rule
///
/// Only obtainable through [`crate::validate::validated`], which is why the
/// remote mutations accept nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDraft {
    pub name: String,
    pub rating: f64,
    /// Image URL exactly as entered (trimmed)
    pub image: String,
    pub restaurant_name: String,
    /// Logo URL exactly as entered (trimmed)
    pub restaurant_logo: String,
    pub restaurant_status: RestaurantStatus,
    pub price: Option<f64>,
}

/// Render a number for editing
///
/// `f64`'s `Display` never uses exponent notation and drops the `.0` of whole
/// values, so the text parses back to the same number.
fn format_number(value: f64) -> String {
    value.to_string()
}
