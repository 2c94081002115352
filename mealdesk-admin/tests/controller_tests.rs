//! Integration tests for the list controller
//!
//! Tests cover:
//! - Reconciliation: a full refresh after every successful mutation
//! - Failed mutations leave the collection untouched and emit a failure event
//! - Validation happens before any I/O
//! - Case-insensitive local search and server-side search
//! - Two-phase delete protocol and in-flight markers
//! - Discarding results after shutdown

use async_trait::async_trait;
use mealdesk_admin::remote::{FoodStore, RemoteError, RemoteErrorKind};
use mealdesk_admin::{AdminError, LayoutMode, ListController};
use mealdesk_common::events::{AdminEvent, EventBus, StoreOp};
use mealdesk_common::{Food, FoodDraft, ValidatedDraft};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, Notify};

// =============================================================================
// Stub store
// =============================================================================

/// In-memory food store that counts calls and can be told to fail or stall
#[derive(Default)]
struct StubStore {
    foods: Mutex<Vec<Food>>,
    next_id: AtomicUsize,
    list_calls: AtomicUsize,
    mutation_calls: AtomicUsize,
    fail_mutations: AtomicBool,
    fail_lists: AtomicBool,
    stall_lists: AtomicBool,
    name_filter: bool,
    /// When set, deletes wait for a notification before completing
    delete_gate: Option<Arc<Notify>>,
}

impl StubStore {
    fn with_foods(names: &[&str]) -> Self {
        let store = StubStore::default();
        for name in names {
            store.insert(name);
        }
        store
    }

    fn insert(&self, name: &str) -> Food {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let food = food(&id.to_string(), name);
        self.foods.lock().unwrap().push(food.clone());
        food
    }

    fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    fn check_mutation(&self, op: StoreOp) -> Result<(), RemoteError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(RemoteError::new(
                op,
                RemoteErrorKind::Status(500, "boom".to_string()),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl FoodStore for StubStore {
    async fn list(&self, name_filter: Option<&str>) -> Result<Vec<Food>, RemoteError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.stall_lists.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(RemoteError::new(
                StoreOp::List,
                RemoteErrorKind::Network("connection refused".to_string()),
            ));
        }

        let foods = self.foods.lock().unwrap().clone();
        Ok(match name_filter.filter(|_| self.name_filter) {
            Some(term) => foods.into_iter().filter(|f| f.matches_name(term)).collect(),
            None => foods,
        })
    }

    async fn create(&self, draft: &ValidatedDraft) -> Result<Food, RemoteError> {
        self.check_mutation(StoreOp::Create)?;
        Ok(self.insert(&draft.name))
    }

    async fn update(&self, id: &str, draft: &ValidatedDraft) -> Result<Food, RemoteError> {
        self.check_mutation(StoreOp::Update)?;
        let mut foods = self.foods.lock().unwrap();
        let existing = foods
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| RemoteError::new(StoreOp::Update, RemoteErrorKind::Status(404, String::new())))?;
        existing.name = draft.name.clone();
        existing.rating = draft.rating;
        existing.restaurant_status = draft.restaurant_status.to_string();
        Ok(existing.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        if let Some(gate) = &self.delete_gate {
            gate.notified().await;
        }
        self.check_mutation(StoreOp::Delete)?;
        self.foods.lock().unwrap().retain(|f| f.id != id);
        Ok(())
    }

    fn supports_name_filter(&self) -> bool {
        self.name_filter
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn food(id: &str, name: &str) -> Food {
    Food {
        id: id.to_string(),
        name: name.to_string(),
        rating: 4.0,
        image: "https://img.example/food.png".to_string(),
        restaurant_name: "Corner Bistro".to_string(),
        restaurant_logo: "https://img.example/logo.png".to_string(),
        restaurant_status: "Open Now".to_string(),
        price: 9.5,
    }
}

fn valid_draft(name: &str) -> FoodDraft {
    FoodDraft {
        name: name.to_string(),
        rating: "4".to_string(),
        image: "https://img.example/food.png".to_string(),
        restaurant_name: "Corner Bistro".to_string(),
        restaurant_logo: "https://img.example/logo.png".to_string(),
        restaurant_status: "Open Now".to_string(),
        price: String::new(),
    }
}

fn setup(store: StubStore) -> (Arc<StubStore>, ListController) {
    let store = Arc::new(store);
    let controller = ListController::new(store.clone(), EventBus::new(32));
    (store, controller)
}

fn drain(rx: &mut broadcast::Receiver<AdminEvent>) -> Vec<AdminEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn ids(foods: &[Food]) -> Vec<&str> {
    foods.iter().map(|f| f.id.as_str()).collect()
}

// =============================================================================
// Refresh and search
// =============================================================================

#[tokio::test]
async fn test_refresh_replaces_collection() {
    let (store, controller) = setup(StubStore::with_foods(&["Pizza", "Ramen"]));

    assert_eq!(controller.refresh().await.unwrap(), 2);
    store.insert("Tacos");
    assert_eq!(controller.refresh().await.unwrap(), 3);

    assert_eq!(ids(&controller.foods().await), vec!["1", "2", "3"]);
    assert_eq!(store.list_calls(), 2);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_collection() {
    let (store, controller) = setup(StubStore::with_foods(&["Pizza"]));
    controller.refresh().await.unwrap();

    store.fail_lists.store(true, Ordering::SeqCst);
    let mut rx = controller.events().subscribe();
    let err = controller.refresh().await.unwrap_err();

    assert!(matches!(err, AdminError::Remote(ref e) if e.op == StoreOp::List));
    assert_eq!(controller.foods().await.len(), 1);
    let events = drain(&mut rx);
    assert!(matches!(events.as_slice(), [AdminEvent::Failed { op: StoreOp::List, .. }]));
}

#[tokio::test]
async fn test_apply_search_is_case_insensitive() {
    let (_store, controller) = setup(StubStore::with_foods(&["Pizza", "Ramen", "PIZZA Bianca"]));
    controller.refresh().await.unwrap();

    let matches = controller.apply_search("piz").await;
    assert_eq!(ids(&matches), vec!["1", "3"]);
    assert_eq!(controller.search_term().await, "piz");

    // Canonical collection untouched
    assert_eq!(controller.foods().await.len(), 3);

    let everything = controller.apply_search("").await;
    assert_eq!(everything.len(), 3);
}

#[tokio::test]
async fn test_search_survives_refresh() {
    let (store, controller) = setup(StubStore::with_foods(&["Pizza", "Ramen"]));
    controller.refresh().await.unwrap();
    controller.apply_search("ramen").await;

    store.insert("Ramen Deluxe");
    controller.refresh().await.unwrap();

    assert_eq!(ids(&controller.filtered().await), vec!["2", "3"]);
}

#[tokio::test]
async fn test_search_remote_uses_server_filter() {
    let mut store = StubStore::with_foods(&["Pizza", "Ramen"]);
    store.name_filter = true;
    let (store, controller) = setup(store);

    let matches = controller.search_remote("RAM").await.unwrap();

    assert_eq!(ids(&matches), vec!["2"]);
    assert_eq!(ids(&controller.filtered().await), vec!["2"]);
    assert_eq!(store.list_calls(), 1);
}

#[tokio::test]
async fn test_search_remote_falls_back_to_local_filter() {
    let (_store, controller) = setup(StubStore::with_foods(&["Pizza", "Ramen"]));

    let matches = controller.search_remote("pizza").await.unwrap();

    assert_eq!(ids(&matches), vec!["1"]);
    assert_eq!(controller.foods().await.len(), 2);
}

#[tokio::test]
async fn test_paging_over_filtered_view() {
    let names: Vec<String> = (1..=8).map(|i| format!("Dish {}", i)).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let (_store, controller) = setup(StubStore::with_foods(&names));
    controller.refresh().await.unwrap();

    let first = controller.page(1).await;
    assert_eq!(first.items.len(), 6);
    assert_eq!(first.pagination.total_pages, 2);
    assert_eq!(first.total_results, 8);

    let second = controller.page(2).await;
    assert_eq!(ids(&second.items), vec!["7", "8"]);

    // Out-of-range pages clamp to the last page
    assert_eq!(controller.page(9).await.pagination.page, 2);
}

// =============================================================================
// Create and update
// =============================================================================

#[tokio::test]
async fn test_create_refreshes_once_and_record_appears() {
    let (store, controller) = setup(StubStore::with_foods(&["Pizza"]));
    controller.refresh().await.unwrap();
    let mut rx = controller.events().subscribe();

    let created = controller.create(&valid_draft("Sushi")).await.unwrap();

    assert_eq!(created.name, "Sushi");
    assert_eq!(store.list_calls(), 2);
    assert!(controller.get(&created.id).await.is_some());

    let notifications: Vec<String> = drain(&mut rx)
        .iter()
        .filter_map(AdminEvent::notification)
        .map(|n| n.detail)
        .collect();
    assert_eq!(notifications, vec!["Food added successfully!"]);
}

#[tokio::test]
async fn test_invalid_draft_makes_no_request() {
    let (store, controller) = setup(StubStore::with_foods(&["Pizza"]));
    controller.refresh().await.unwrap();

    let mut draft = valid_draft("");
    draft.rating = "7".to_string();
    let err = controller.create(&draft).await.unwrap_err();

    let errors = err.validation_errors().expect("validation failure");
    assert_eq!(errors.len(), 2);
    assert_eq!(store.mutation_calls(), 0);
    assert_eq!(store.list_calls(), 1);
}

#[tokio::test]
async fn test_failed_create_leaves_collection_unchanged() {
    let (store, controller) = setup(StubStore::with_foods(&["Pizza"]));
    controller.refresh().await.unwrap();
    store.fail_mutations.store(true, Ordering::SeqCst);
    let mut rx = controller.events().subscribe();

    let err = controller.create(&valid_draft("Sushi")).await.unwrap_err();

    assert!(matches!(err, AdminError::Remote(_)));
    assert_eq!(ids(&controller.foods().await), vec!["1"]);
    assert_eq!(store.list_calls(), 1);

    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    let notification = events[0].notification().unwrap();
    assert_eq!(notification.detail, "Failed to add food.");
}

#[tokio::test]
async fn test_create_succeeds_when_follow_up_refresh_fails() {
    let (store, controller) = setup(StubStore::with_foods(&["Pizza"]));
    controller.refresh().await.unwrap();
    store.fail_lists.store(true, Ordering::SeqCst);
    let mut rx = controller.events().subscribe();

    let created = controller.create(&valid_draft("Sushi")).await.unwrap();

    assert_eq!(created.name, "Sushi");
    assert_eq!(store.mutation_calls(), 1);
    assert_eq!(store.list_calls(), 2);
    // The stale collection is kept until a refresh succeeds
    assert_eq!(ids(&controller.foods().await), vec!["1"]);

    let events = drain(&mut rx);
    assert!(matches!(
        events.as_slice(),
        [
            AdminEvent::Succeeded { op: StoreOp::Create, .. },
            AdminEvent::Failed { op: StoreOp::List, .. },
        ]
    ));
}

#[tokio::test]
async fn test_update_preserves_id_and_refreshes() {
    let (store, controller) = setup(StubStore::with_foods(&["Pizza", "Ramen"]));
    controller.refresh().await.unwrap();

    let existing = controller.get("2").await.unwrap();
    let mut draft = FoodDraft::from_food(&existing);
    draft.name = "Spicy Ramen".to_string();
    draft.restaurant_status = "Closed".to_string();

    let updated = controller.update("2", &draft).await.unwrap();

    assert_eq!(updated.id, "2");
    assert_eq!(store.list_calls(), 2);
    let refreshed = controller.get("2").await.unwrap();
    assert_eq!(refreshed.name, "Spicy Ramen");
    assert!(refreshed.is_closed());
}

#[tokio::test]
async fn test_update_requires_id() {
    let (store, controller) = setup(StubStore::default());

    let err = controller.update("", &valid_draft("Pizza")).await.unwrap_err();

    assert!(matches!(err, AdminError::NotFound(_)));
    assert_eq!(store.mutation_calls(), 0);
}

// =============================================================================
// Delete protocol
// =============================================================================

#[tokio::test]
async fn test_confirmed_delete_removes_record() {
    let (store, controller) = setup(StubStore::with_foods(&["Pizza", "Ramen"]));
    controller.refresh().await.unwrap();

    controller.request_delete("1").await.unwrap();
    assert_eq!(controller.interaction().await.pending_delete(), Some("1"));

    let deleted = controller.confirm_delete().await.unwrap();

    assert_eq!(deleted, "1");
    assert!(controller.get("1").await.is_none());
    assert!(!controller.is_deleting("1").await);
    assert_eq!(controller.interaction().await.pending_delete(), None);
    assert_eq!(store.list_calls(), 2);
}

#[tokio::test]
async fn test_failed_delete_clears_marker() {
    let (store, controller) = setup(StubStore::with_foods(&["Pizza"]));
    controller.refresh().await.unwrap();
    store.fail_mutations.store(true, Ordering::SeqCst);

    controller.request_delete("1").await.unwrap();
    let err = controller.confirm_delete().await.unwrap_err();

    assert!(matches!(err, AdminError::Remote(ref e) if e.op == StoreOp::Delete));
    assert!(!controller.is_deleting("1").await);
    assert!(controller.get("1").await.is_some());
}

#[tokio::test]
async fn test_rejected_delete_makes_no_request() {
    let (store, controller) = setup(StubStore::with_foods(&["Pizza"]));
    controller.refresh().await.unwrap();

    controller.request_delete("1").await.unwrap();
    assert_eq!(controller.reject_delete().await.as_deref(), Some("1"));

    assert!(matches!(
        controller.confirm_delete().await,
        Err(AdminError::NothingPending)
    ));
    assert_eq!(store.mutation_calls(), 0);
}

#[tokio::test]
async fn test_request_delete_unknown_record() {
    let (_store, controller) = setup(StubStore::with_foods(&["Pizza"]));
    controller.refresh().await.unwrap();

    assert!(matches!(
        controller.request_delete("99").await,
        Err(AdminError::NotFound(id)) if id == "99"
    ));
}

#[tokio::test]
async fn test_duplicate_delete_rejected_while_in_flight() {
    let gate = Arc::new(Notify::new());
    let mut store = StubStore::with_foods(&["Pizza", "Ramen"]);
    store.delete_gate = Some(gate.clone());
    let (store, controller) = setup(store);
    let controller = Arc::new(controller);
    controller.refresh().await.unwrap();

    controller.request_delete("1").await.unwrap();
    let first = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.confirm_delete().await })
    };
    while !controller.is_deleting("1").await {
        tokio::task::yield_now().await;
    }

    controller.request_delete("1").await.unwrap();
    assert!(matches!(
        controller.confirm_delete().await,
        Err(AdminError::DeleteInFlight(id)) if id == "1"
    ));

    gate.notify_one();
    assert_eq!(first.await.unwrap().unwrap(), "1");
    assert!(!controller.is_deleting("1").await);
    assert_eq!(store.mutation_calls(), 1);
}

// =============================================================================
// Interaction state
// =============================================================================

#[tokio::test]
async fn test_expanded_toggle_and_refresh_reset() {
    let (_store, controller) = setup(StubStore::with_foods(&["Pizza", "Ramen"]));
    controller.refresh().await.unwrap();

    controller.toggle_expanded("1").await;
    controller.toggle_expanded("2").await;
    assert_eq!(controller.interaction().await.expanded(), Some("2"));

    controller.toggle_expanded("2").await;
    assert_eq!(controller.interaction().await.expanded(), None);

    controller.toggle_expanded("1").await;
    controller.set_layout(LayoutMode::List).await;
    controller.refresh().await.unwrap();

    let state = controller.interaction().await;
    assert_eq!(state.expanded(), None);
    assert_eq!(state.layout(), LayoutMode::List);
}

// =============================================================================
// Teardown
// =============================================================================

#[tokio::test]
async fn test_shutdown_discards_outstanding_fetch() {
    let store = StubStore::with_foods(&["Pizza"]);
    store.stall_lists.store(true, Ordering::SeqCst);
    let (store, controller) = setup(store);
    let controller = Arc::new(controller);

    let pending = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.refresh().await })
    };
    while store.list_calls() == 0 {
        tokio::task::yield_now().await;
    }

    controller.shutdown();

    let result = tokio::time::timeout(Duration::from_secs(5), pending)
        .await
        .expect("refresh should finish after shutdown")
        .unwrap();
    assert!(matches!(result, Err(AdminError::Discarded(StoreOp::List))));
    assert!(controller.foods().await.is_empty());
}

#[tokio::test]
async fn test_operations_after_shutdown_are_discarded() {
    let (store, controller) = setup(StubStore::with_foods(&["Pizza"]));
    controller.shutdown();

    assert!(controller.is_shut_down());
    assert!(matches!(
        controller.create(&valid_draft("Sushi")).await,
        Err(AdminError::Discarded(StoreOp::Create))
    ));
    assert_eq!(store.mutation_calls(), 0);
}
