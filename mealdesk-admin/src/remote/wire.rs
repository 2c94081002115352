//! Request bodies sent to the food resource

use mealdesk_common::config::UpdateBodyFormat;
use mealdesk_common::{RestaurantStatus, ValidatedDraft};
use serde::Serialize;

/// `POST /Food` body
#[derive(Debug, Serialize)]
pub struct CreateBody<'a> {
    pub name: &'a str,
    pub rating: f64,
    pub image: &'a str,
    pub restaurant: RestaurantBody<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct RestaurantBody<'a> {
    pub name: &'a str,
    pub logo: &'a str,
    pub status: RestaurantStatus,
}

impl<'a> From<&'a ValidatedDraft> for CreateBody<'a> {
    fn from(draft: &'a ValidatedDraft) -> Self {
        Self {
            name: &draft.name,
            rating: draft.rating,
            image: &draft.image,
            restaurant: RestaurantBody {
                name: &draft.restaurant_name,
                logo: &draft.restaurant_logo,
                status: draft.restaurant_status,
            },
            price: draft.price,
        }
    }
}

/// `PUT /Food/:id` body in one of the two observed layouts
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UpdateBody<'a> {
    Prefixed {
        food_name: &'a str,
        food_rating: f64,
        food_image: &'a str,
        restaurant_name: &'a str,
        restaurant_logo: &'a str,
        restaurant_status: RestaurantStatus,
        #[serde(rename = "Price", skip_serializing_if = "Option::is_none")]
        price: Option<f64>,
    },
    Mixed {
        name: &'a str,
        rating: f64,
        image: &'a str,
        #[serde(rename = "restaurantName")]
        restaurant_name: &'a str,
        restaurant_logo: &'a str,
        restaurant_status: RestaurantStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        price: Option<f64>,
    },
}

impl<'a> UpdateBody<'a> {
    pub fn new(format: UpdateBodyFormat, draft: &'a ValidatedDraft) -> Self {
        match format {
            UpdateBodyFormat::Prefixed => UpdateBody::Prefixed {
                food_name: &draft.name,
                food_rating: draft.rating,
                food_image: &draft.image,
                restaurant_name: &draft.restaurant_name,
                restaurant_logo: &draft.restaurant_logo,
                restaurant_status: draft.restaurant_status,
                price: draft.price,
            },
            UpdateBodyFormat::Mixed => UpdateBody::Mixed {
                name: &draft.name,
                rating: draft.rating,
                image: &draft.image,
                restaurant_name: &draft.restaurant_name,
                restaurant_logo: &draft.restaurant_logo,
                restaurant_status: draft.restaurant_status,
                price: draft.price,
            },
        }
    }
}
