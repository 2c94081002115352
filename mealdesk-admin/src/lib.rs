//! mealdesk-admin library - food record administration
//!
//! Record synchronization for the restaurant food admin: the remote store
//! client, the list controller that owns the collection, transient
//! interaction state, pagination and terminal rendering.

use mealdesk_common::config::ClientSettings;
use mealdesk_common::events::EventBus;
use std::sync::Arc;

pub mod controller;
pub mod error;
pub mod interaction;
pub mod pagination;
pub mod remote;
pub mod render;

pub use controller::{ListController, PageView};
pub use error::{AdminError, AdminResult};
pub use interaction::{InteractionState, LayoutMode};
pub use remote::{FoodStore, HttpFoodStore, RemoteError, RemoteErrorKind};

/// Event channel capacity for a single admin session
pub const EVENT_CAPACITY: usize = 100;

/// Build a controller talking HTTP to the configured service
pub fn build_controller(settings: &ClientSettings) -> Result<ListController, RemoteError> {
    let store = HttpFoodStore::from_settings(settings)?;
    Ok(ListController::with_page_size(
        Arc::new(store),
        EventBus::new(EVENT_CAPACITY),
        settings.page_size,
    ))
}
