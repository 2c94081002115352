//! HTTP client for the `Food` resource

use async_trait::async_trait;
use mealdesk_common::config::{ClientSettings, UpdateBodyFormat};
use mealdesk_common::events::StoreOp;
use mealdesk_common::normalize::{normalize, normalize_list};
use mealdesk_common::{Food, ValidatedDraft};
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::wire::{CreateBody, UpdateBody};
use super::{FoodStore, RemoteError, RemoteErrorKind};

const USER_AGENT: &str = concat!("mealdesk-admin/", env!("CARGO_PKG_VERSION"));
const RESOURCE: &str = "Food";

/// REST client for the remote food service
pub struct HttpFoodStore {
    http_client: reqwest::Client,
    resource_url: String,
    update_body: UpdateBodyFormat,
}

impl HttpFoodStore {
    /// Build a client for `base_url` (the `/Food` path is appended)
    pub fn new(
        base_url: &str,
        timeout: Duration,
        update_body: UpdateBodyFormat,
    ) -> Result<Self, RemoteError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::new(StoreOp::List, RemoteErrorKind::Network(e.to_string())))?;

        Ok(Self {
            http_client,
            resource_url: format!("{}/{}", base_url.trim_end_matches('/'), RESOURCE),
            update_body,
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, RemoteError> {
        Self::new(&settings.base_url, settings.timeout, settings.update_body)
    }

    /// Full URL of the resource collection
    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.resource_url, id)
    }

    fn no_cache() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers
    }

    /// Send a request and return the body of a 2xx response as JSON
    async fn execute(&self, op: StoreOp, request: RequestBuilder) -> Result<Value, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::new(op, RemoteErrorKind::Network(e.to_string())))?;

        let response = check_status(op, response).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RemoteError::new(op, RemoteErrorKind::Network(e.to_string())))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| RemoteError::new(op, RemoteErrorKind::Decode(e.to_string())))
    }
}

async fn check_status(op: StoreOp, response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    warn!(%op, status = status.as_u16(), "Food service returned error status");
    Err(RemoteError::new(
        op,
        RemoteErrorKind::Status(status.as_u16(), error_text),
    ))
}

#[async_trait]
impl FoodStore for HttpFoodStore {
    async fn list(&self, name_filter: Option<&str>) -> Result<Vec<Food>, RemoteError> {
        let mut request = self
            .http_client
            .get(&self.resource_url)
            .headers(Self::no_cache());

        let term = name_filter.map(str::trim).filter(|t| !t.is_empty());
        if let Some(term) = term {
            request = request.query(&[("name", term)]);
        }

        debug!(url = %self.resource_url, filter = ?name_filter, "Fetching foods");

        let body = match self.execute(StoreOp::List, request).await {
            // The service may answer a filter with no matches as 404
            Err(RemoteError {
                kind: RemoteErrorKind::Status(404, _),
                ..
            }) if term.is_some() => Value::Array(Vec::new()),
            other => other?,
        };

        let foods = normalize_list(&body);
        info!(count = foods.len(), "Fetched foods");
        Ok(foods)
    }

    async fn create(&self, draft: &ValidatedDraft) -> Result<Food, RemoteError> {
        debug!(name = %draft.name, "Creating food");

        let request = self
            .http_client
            .post(&self.resource_url)
            .json(&CreateBody::from(draft));
        let body = self.execute(StoreOp::Create, request).await?;

        let food = normalize(&body);
        info!(id = %food.id, name = %food.name, "Created food");
        Ok(food)
    }

    async fn update(&self, id: &str, draft: &ValidatedDraft) -> Result<Food, RemoteError> {
        let url = self.item_url(id);
        debug!(id = %id, url = %url, format = ?self.update_body, "Updating food");

        let request = self
            .http_client
            .put(&url)
            .json(&UpdateBody::new(self.update_body, draft));
        let body = self.execute(StoreOp::Update, request).await?;

        let mut food = normalize(&body);
        if food.id.is_empty() {
            food.id = id.to_string();
        }
        info!(id = %food.id, "Updated food");
        Ok(food)
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        let url = self.item_url(id);
        debug!(id = %id, url = %url, "Deleting food");

        let response = self
            .http_client
            .delete(&url)
            .send()
            .await
            .map_err(|e| RemoteError::new(StoreOp::Delete, RemoteErrorKind::Network(e.to_string())))?;
        check_status(StoreOp::Delete, response).await?;

        info!(id = %id, "Deleted food");
        Ok(())
    }

    fn supports_name_filter(&self) -> bool {
        true
    }
}
