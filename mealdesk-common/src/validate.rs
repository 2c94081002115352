//! Draft validation
//!
//! Pure and synchronous: no I/O. Every rule runs on every call so a form can
//! show all violations at once rather than only the first.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

use crate::food::{FoodDraft, RestaurantStatus, ValidatedDraft};

/// Lowest accepted rating
pub const MIN_RATING: f64 = 1.0;
/// Highest accepted rating
pub const MAX_RATING: f64 = 5.0;

/// Draft fields that can carry a validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Name,
    Rating,
    Image,
    RestaurantName,
    RestaurantLogo,
    RestaurantStatus,
    Price,
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Name => "name",
            DraftField::Rating => "rating",
            DraftField::Image => "image",
            DraftField::RestaurantName => "restaurant_name",
            DraftField::RestaurantLogo => "restaurant_logo",
            DraftField::RestaurantStatus => "restaurant_status",
            DraftField::Price => "price",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field validation messages; empty means the draft is valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(BTreeMap<DraftField, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: DraftField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: DraftField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DraftField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: DraftField, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        f.write_str(&messages.join("; "))
    }
}

/// Check a draft against every field rule
///
/// # Examples
///
/// ```
/// use mealdesk_common::food::FoodDraft;
/// use mealdesk_common::validate::validate;
///
/// // An empty draft violates all six required-field rules
/// assert_eq!(validate(&FoodDraft::new()).len(), 6);
/// ```
pub fn validate(draft: &FoodDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if draft.name.trim().is_empty() {
        errors.insert(DraftField::Name, "Food Name is required");
    }

    if parse_rating(&draft.rating).is_none() {
        errors.insert(
            DraftField::Rating,
            "Food Rating must be a number between 1 and 5",
        );
    }

    if !is_web_url(&draft.image) {
        errors.insert(
            DraftField::Image,
            "Food Image URL is required and must be valid",
        );
    }

    if draft.restaurant_name.trim().is_empty() {
        errors.insert(DraftField::RestaurantName, "Restaurant Name is required");
    }

    if !is_web_url(&draft.restaurant_logo) {
        errors.insert(
            DraftField::RestaurantLogo,
            "Restaurant Logo URL is required and must be valid",
        );
    }

    if draft.restaurant_status.parse::<RestaurantStatus>().is_err() {
        errors.insert(
            DraftField::RestaurantStatus,
            "Restaurant Status must be 'Open Now' or 'Closed'",
        );
    }

    if !draft.price.trim().is_empty() && parse_price(&draft.price).is_none() {
        errors.insert(DraftField::Price, "Price must be a non-negative number");
    }

    errors
}

/// Validate and, on success, produce the typed draft used by remote mutations
pub fn validated(draft: &FoodDraft) -> Result<ValidatedDraft, ValidationErrors> {
    let errors = validate(draft);
    if !errors.is_empty() {
        return Err(errors);
    }

    // Every parse below already succeeded inside validate()
    // URLs are only checked; the entered text is what gets stored
    match (
        parse_rating(&draft.rating),
        draft.restaurant_status.parse::<RestaurantStatus>(),
    ) {
        (Some(rating), Ok(restaurant_status)) => {
            Ok(ValidatedDraft {
                name: draft.name.trim().to_string(),
                rating,
                image: draft.image.trim().to_string(),
                restaurant_name: draft.restaurant_name.trim().to_string(),
                restaurant_logo: draft.restaurant_logo.trim().to_string(),
                restaurant_status,
                price: parse_price(&draft.price),
            })
        }
        _ => Err(errors),
    }
}

fn parse_rating(input: &str) -> Option<f64> {
    let rating = input.trim().parse::<f64>().ok()?;
    (rating.is_finite() && (MIN_RATING..=MAX_RATING).contains(&rating)).then_some(rating)
}

fn parse_price(input: &str) -> Option<f64> {
    let price = input.trim().parse::<f64>().ok()?;
    (price.is_finite() && price >= 0.0).then_some(price)
}

/// Absolute http(s) URL with a non-empty host
fn is_web_url(input: &str) -> bool {
    Url::parse(input.trim()).map_or(false, |url| {
        matches!(url.scheme(), "http" | "https")
            && url.host_str().map_or(false, |h| !h.is_empty())
    })
}
