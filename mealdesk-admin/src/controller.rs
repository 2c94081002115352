//! List Controller
//!
//! Owns the canonical food collection and its derived, search-filtered view.
//! No other component mutates the collection.
//!
//! # Reconciliation
//!
//! After every successful create, update or delete the controller re-fetches
//! the whole collection instead of patching it locally. The service has no
//! versioning or ETag mechanism, so a full refresh is the only way to stay
//! consistent with it. Failed mutations leave the collection untouched.
//!
//! # Concurrency
//!
//! Methods take `&self` so independent operations can run from separate
//! tasks. The collection is replaced wholesale under a lock when a fetch
//! resolves; if two fetches overlap, the later response wins.
//!
//! # Teardown
//!
//! [`ListController::shutdown`] cancels every outstanding operation. Their
//! results are discarded and never applied.

use mealdesk_common::config::DEFAULT_PAGE_SIZE;
use mealdesk_common::events::{AdminEvent, EventBus, StoreOp};
use mealdesk_common::validate::validated;
use mealdesk_common::{Food, FoodDraft};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{AdminError, AdminResult};
use crate::interaction::{InteractionState, LayoutMode};
use crate::pagination::{calculate_pagination, Pagination};
use crate::remote::{FoodStore, RemoteError};

/// Canonical collection plus its filtered view
#[derive(Debug, Default)]
struct Collection {
    foods: Vec<Food>,
    search_term: String,
    filtered: Vec<Food>,
}

impl Collection {
    fn replace(&mut self, foods: Vec<Food>) {
        self.foods = foods;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.filtered = filter_by_name(&self.foods, &self.search_term);
    }
}

/// One page of the filtered view
#[derive(Debug, Clone)]
pub struct PageView {
    pub pagination: Pagination,
    pub items: Vec<Food>,
    /// Size of the filtered view across all pages
    pub total_results: usize,
}

/// Owner of the food collection and the session's interaction state
pub struct ListController {
    store: Arc<dyn FoodStore>,
    events: EventBus,
    collection: RwLock<Collection>,
    interaction: Mutex<InteractionState>,
    cancel: CancellationToken,
    page_size: usize,
}

impl ListController {
    pub fn new(store: Arc<dyn FoodStore>, events: EventBus) -> Self {
        Self::with_page_size(store, events, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(store: Arc<dyn FoodStore>, events: EventBus, page_size: usize) -> Self {
        Self {
            store,
            events,
            collection: RwLock::new(Collection::default()),
            interaction: Mutex::new(InteractionState::new()),
            cancel: CancellationToken::new(),
            page_size: page_size.max(1),
        }
    }

    /// Event bus outcome events are emitted on
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ========================================
    // Collection
    // ========================================

    /// Replace the collection with a fresh fetch of every record
    ///
    /// Idempotent; safe to call repeatedly. Returns the number of records held.
    pub async fn refresh(&self) -> AdminResult<usize> {
        let foods = self
            .guarded(StoreOp::List, None, self.store.list(None))
            .await?;
        Ok(self.apply_fetch(foods).await)
    }

    async fn apply_fetch(&self, foods: Vec<Food>) -> usize {
        let count = foods.len();
        self.collection.write().await.replace(foods);
        self.interaction.lock().await.reset_for_refresh();

        info!(count, "Collection refreshed");
        self.events.emit_lossy(AdminEvent::refreshed(count));
        count
    }

    /// Recompute the filtered view by case-insensitive substring match on name
    ///
    /// Does not touch the canonical collection. An empty term restores the full
    /// collection.
    pub async fn apply_search(&self, term: &str) -> Vec<Food> {
        let mut collection = self.collection.write().await;
        collection.search_term = term.trim().to_string();
        collection.recompute();
        debug!(term = %collection.search_term, matches = collection.filtered.len(), "Search applied");
        collection.filtered.clone()
    }

    /// Search using the service's name filter when it has one
    ///
    /// Without server-side filtering this fetches everything, replaces the
    /// collection and filters locally.
    pub async fn search_remote(&self, term: &str) -> AdminResult<Vec<Food>> {
        let term = term.trim();
        if term.is_empty() || !self.store.supports_name_filter() {
            self.refresh().await?;
            return Ok(self.apply_search(term).await);
        }

        let matches = self
            .guarded(StoreOp::List, None, self.store.list(Some(term)))
            .await?;
        let matches = filter_by_name(&matches, term);

        let mut collection = self.collection.write().await;
        collection.search_term = term.to_string();
        collection.filtered = matches.clone();
        Ok(matches)
    }

    /// Snapshot of the canonical collection
    pub async fn foods(&self) -> Vec<Food> {
        self.collection.read().await.foods.clone()
    }

    /// Snapshot of the filtered view
    pub async fn filtered(&self) -> Vec<Food> {
        self.collection.read().await.filtered.clone()
    }

    pub async fn search_term(&self) -> String {
        self.collection.read().await.search_term.clone()
    }

    /// Look up a record in the canonical collection
    pub async fn get(&self, id: &str) -> Option<Food> {
        self.collection
            .read()
            .await
            .foods
            .iter()
            .find(|f| f.id == id)
            .cloned()
    }

    /// One page of the filtered view (1-indexed, clamped)
    pub async fn page(&self, page: usize) -> PageView {
        let collection = self.collection.read().await;
        let pagination = calculate_pagination(collection.filtered.len(), page, self.page_size);
        PageView {
            pagination,
            items: pagination.slice(&collection.filtered).to_vec(),
            total_results: collection.filtered.len(),
        }
    }

    // ========================================
    // Mutations
    // ========================================

    /// Validate and persist a new record, then reconcile
    pub async fn create(&self, draft: &FoodDraft) -> AdminResult<Food> {
        let draft = validated(draft).map_err(AdminError::Validation)?;

        let created = self
            .guarded(StoreOp::Create, None, self.store.create(&draft))
            .await?;
        self.events
            .emit_lossy(AdminEvent::succeeded(StoreOp::Create, Some(created.id.clone())));

        self.reconcile(self.after_create()).await;
        Ok(created)
    }

    /// Validate and persist changes to an existing record, then reconcile
    pub async fn update(&self, id: &str, draft: &FoodDraft) -> AdminResult<Food> {
        if id.trim().is_empty() {
            return Err(AdminError::NotFound(id.to_string()));
        }
        let draft = validated(draft).map_err(AdminError::Validation)?;

        let updated = self
            .guarded(
                StoreOp::Update,
                Some(id),
                self.store.update(id, &draft),
            )
            .await?;
        self.events
            .emit_lossy(AdminEvent::succeeded(StoreOp::Update, Some(id.to_string())));

        self.reconcile(self.after_update()).await;
        Ok(updated)
    }

    /// First step of the delete protocol: ask for confirmation
    pub async fn request_delete(&self, id: &str) -> AdminResult<()> {
        if self.get(id).await.is_none() {
            return Err(AdminError::NotFound(id.to_string()));
        }
        self.interaction.lock().await.request_delete(id);
        debug!(id = %id, "Delete awaiting confirmation");
        Ok(())
    }

    /// Reject the pending delete; returns the id that was pending
    pub async fn reject_delete(&self) -> Option<String> {
        let rejected = self.interaction.lock().await.reject_delete();
        if let Some(id) = &rejected {
            debug!(id = %id, "Delete rejected");
        }
        rejected
    }

    /// Confirm the pending delete and perform it; returns the deleted id
    pub async fn confirm_delete(&self) -> AdminResult<String> {
        let id = self
            .interaction
            .lock()
            .await
            .take_pending_delete()
            .ok_or(AdminError::NothingPending)?;

        self.delete_confirmed(&id).await?;
        Ok(id)
    }

    async fn delete_confirmed(&self, id: &str) -> AdminResult<()> {
        if !self.interaction.lock().await.begin_delete(id) {
            return Err(AdminError::DeleteInFlight(id.to_string()));
        }

        let result = self
            .guarded(StoreOp::Delete, Some(id), self.store.delete(id))
            .await;

        // Cleared whether the delete succeeded or not
        self.interaction.lock().await.finish_delete(id);

        result?;
        self.events
            .emit_lossy(AdminEvent::succeeded(StoreOp::Delete, Some(id.to_string())));

        self.reconcile(self.after_delete()).await;
        Ok(())
    }

    /// Reconciliation hook after a successful create
    pub async fn after_create(&self) -> AdminResult<usize> {
        self.refresh().await
    }

    /// Reconciliation hook after a successful update
    pub async fn after_update(&self) -> AdminResult<usize> {
        self.refresh().await
    }

    /// Reconciliation hook after a successful delete
    pub async fn after_delete(&self) -> AdminResult<usize> {
        self.refresh().await
    }

    /// Run a reconciliation refresh; its failure does not undo the mutation
    async fn reconcile(&self, refresh: impl Future<Output = AdminResult<usize>>) {
        if let Err(e) = refresh.await {
            warn!("Refresh after mutation failed: {}", e);
        }
    }

    // ========================================
    // Interaction state
    // ========================================

    /// Snapshot of the interaction state
    pub async fn interaction(&self) -> InteractionState {
        self.interaction.lock().await.clone()
    }

    /// Toggle the expanded record (at most one is expanded)
    pub async fn toggle_expanded(&self, id: &str) {
        self.interaction.lock().await.toggle_expanded(id);
    }

    pub async fn set_layout(&self, layout: LayoutMode) {
        self.interaction.lock().await.set_layout(layout);
    }

    pub async fn is_deleting(&self, id: &str) -> bool {
        self.interaction.lock().await.is_deleting(id)
    }

    // ========================================
    // Teardown
    // ========================================

    /// Abandon every outstanding operation; later results are discarded
    pub fn shutdown(&self) {
        info!("List controller shutting down");
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Await a remote call unless the controller is shut down first
    ///
    /// Failures are reported on the event bus before being returned.
    async fn guarded<T>(
        &self,
        op: StoreOp,
        record_id: Option<&str>,
        call: impl Future<Output = Result<T, RemoteError>>,
    ) -> AdminResult<T> {
        if self.cancel.is_cancelled() {
            return Err(AdminError::Discarded(op));
        }

        let result = tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!(%op, "Operation abandoned on shutdown");
                return Err(AdminError::Discarded(op));
            }
            result = call => result,
        };

        if self.cancel.is_cancelled() {
            return Err(AdminError::Discarded(op));
        }

        result.map_err(|e| {
            warn!(%op, error = %e, "Remote operation failed");
            self.events.emit_lossy(AdminEvent::failed(
                op,
                record_id.map(str::to_string),
                e.to_string(),
            ));
            AdminError::Remote(e)
        })
    }
}

fn filter_by_name(foods: &[Food], term: &str) -> Vec<Food> {
    foods
        .iter()
        .filter(|f| f.matches_name(term))
        .cloned()
        .collect()
}
