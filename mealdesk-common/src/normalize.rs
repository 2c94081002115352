//! Record normalization
//!
//! The remote service returns food objects under several inconsistent key
//! layouts. Everything that leaves this module is a fully populated [`Food`].
//!
//! # Resolution order
//!
//! Each field is resolved by walking its row of [`FIELD_TABLE`] and taking the
//! first candidate that yields a usable value. Empty or whitespace-only strings
//! count as absent. This table is the only place the order is defined.
//!
//! | Field             | Candidates                                                          | Default                          |
//! |-------------------|---------------------------------------------------------------------|----------------------------------|
//! | name              | `food_name`, `name`                                                 | `""`                             |
//! | image             | `food_image`, `image`, `logo`, `avatar`                             | `/layout/images/placeholder.png` |
//! | rating            | `food_rating`, `rating`                                             | `0`                              |
//! | restaurant name   | `restaurant_name`, `restaurant.name`, `restaurantName`              | `Unknown Restaurant`             |
//! | restaurant logo   | `restaurant_logo`, `restaurant.logo`, `restaurant_image`            | `""`                             |
//! | restaurant status | `restaurant_status`, `restaurant.status`, `status`, bool `open`     | `Unknown`                        |
//! | price             | `Price`, `price`                                                    | `0`                              |

use serde_json::Value;
use tracing::trace;

use crate::food::Food;

/// Image used when the payload carries no usable image reference
pub const PLACEHOLDER_IMAGE: &str = "/layout/images/placeholder.png";
/// Restaurant name used when the payload carries none
pub const UNKNOWN_RESTAURANT: &str = "Unknown Restaurant";
/// Restaurant status used when the payload carries none
pub const UNKNOWN_STATUS: &str = "Unknown";

/// A JSON path into a raw payload (`["restaurant", "name"]` = `raw.restaurant.name`)
type KeyPath = &'static [&'static str];

/// Canonical fields resolved from raw payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Image,
    Rating,
    RestaurantName,
    RestaurantLogo,
    RestaurantStatus,
    Price,
}

/// Per-field candidate keys, highest priority first
const FIELD_TABLE: &[(Field, &[KeyPath])] = &[
    (Field::Name, &[&["food_name"], &["name"]]),
    (Field::Image, &[&["food_image"], &["image"], &["logo"], &["avatar"]]),
    (Field::Rating, &[&["food_rating"], &["rating"]]),
    (
        Field::RestaurantName,
        &[&["restaurant_name"], &["restaurant", "name"], &["restaurantName"]],
    ),
    (
        Field::RestaurantLogo,
        &[&["restaurant_logo"], &["restaurant", "logo"], &["restaurant_image"]],
    ),
    (
        Field::RestaurantStatus,
        &[&["restaurant_status"], &["restaurant", "status"], &["status"]],
    ),
    (Field::Price, &[&["Price"], &["price"]]),
];

/// The raw payload layouts observed from the service
///
/// Only used for diagnostics; resolution always goes through [`FIELD_TABLE`]
/// regardless of the detected shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Flat `food_*` / `restaurant_*` keys (`GET /Food`)
    Prefixed,
    /// `name`/`rating`/`image` with a nested `restaurant` object (`POST /Food`)
    Nested,
    /// `name`/`rating`/`open`/`avatar` (`GET /Food?name=`)
    Search,
    /// Anything else, including non-objects
    Unrecognized,
}

impl PayloadShape {
    /// Classify a raw payload
    pub fn detect(raw: &Value) -> Self {
        let Some(obj) = raw.as_object() else {
            return PayloadShape::Unrecognized;
        };

        if obj.contains_key("food_name") || obj.contains_key("food_rating") {
            PayloadShape::Prefixed
        } else if obj.get("restaurant").map_or(false, Value::is_object) {
            PayloadShape::Nested
        } else if obj.get("open").map_or(false, Value::is_boolean) {
            PayloadShape::Search
        } else {
            PayloadShape::Unrecognized
        }
    }
}

/// Normalize an arbitrary raw payload into a canonical [`Food`]
///
/// Never fails: anything missing, mistyped or malformed degrades to the
/// documented defaults.
///
/// # Examples
///
/// ```
/// use mealdesk_common::normalize::normalize;
/// use serde_json::json;
///
/// let food = normalize(&json!({
///     "food_name": "Pizza",
///     "food_rating": "4",
///     "restaurant_status": "OPEN",
/// }));
/// assert_eq!(food.name, "Pizza");
/// assert_eq!(food.rating, 4.0);
/// assert_eq!(food.restaurant_status, "OPEN");
/// assert_eq!(food.restaurant_name, "Unknown Restaurant");
/// ```
pub fn normalize(raw: &Value) -> Food {
    trace!(shape = ?PayloadShape::detect(raw), "Normalizing food payload");

    let restaurant_status = resolve_text(raw, Field::RestaurantStatus)
        .or_else(|| status_from_open_flag(raw))
        .unwrap_or_else(|| UNKNOWN_STATUS.to_string());

    Food {
        id: resolve_id(raw),
        name: resolve_text(raw, Field::Name).unwrap_or_default(),
        rating: resolve_number(raw, Field::Rating).unwrap_or(0.0),
        image: resolve_text(raw, Field::Image).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        restaurant_name: resolve_text(raw, Field::RestaurantName)
            .unwrap_or_else(|| UNKNOWN_RESTAURANT.to_string()),
        restaurant_logo: resolve_text(raw, Field::RestaurantLogo).unwrap_or_default(),
        restaurant_status,
        price: resolve_number(raw, Field::Price).unwrap_or(0.0),
    }
}

/// Normalize every element of a list response
///
/// A body that is not an array is logged and treated as an empty list.
pub fn normalize_list(raw: &Value) -> Vec<Food> {
    match raw.as_array() {
        Some(items) => items.iter().map(normalize).collect(),
        None => {
            tracing::warn!(
                shape = ?PayloadShape::detect(raw),
                "Malformed list payload (expected array), treating as empty"
            );
            Vec::new()
        }
    }
}

fn candidates(field: Field) -> &'static [KeyPath] {
    FIELD_TABLE
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, paths)| *paths)
        .unwrap_or(&[])
}

fn lookup<'a>(raw: &'a Value, path: KeyPath) -> Option<&'a Value> {
    path.iter().try_fold(raw, |value, key| value.get(*key))
}

/// First candidate that is a non-blank string (numbers are stringified)
fn resolve_text(raw: &Value, field: Field) -> Option<String> {
    candidates(field)
        .iter()
        .filter_map(|path| lookup(raw, *path))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// First candidate that coerces to a finite number
fn resolve_number(raw: &Value, field: Field) -> Option<f64> {
    candidates(field)
        .iter()
        .filter_map(|path| lookup(raw, *path))
        .find_map(coerce_number)
}

fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn status_from_open_flag(raw: &Value) -> Option<String> {
    match raw.get("open")? {
        Value::Bool(true) => Some("OPEN".to_string()),
        Value::Bool(false) => Some("CLOSED".to_string()),
        _ => None,
    }
}

fn resolve_id(raw: &Value) -> String {
    match raw.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
