//! Client for the headless content store that owns order documents.
//!
//! The admin surface never creates orders; it reads them, patches the
//! `status` field, or deletes whole records. All three operations go through
//! the store's query/mutate HTTP API with a bearer token that must carry
//! write and delete permission.

use std::env;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use shared::{
    domain::{Order, OrderId, OrderStatus},
    protocol::{MutateResponse, QueryResponse},
};
use thiserror::Error;
use tracing::{debug, info};

/// Pinned store API version; mutations behave differently across versions.
pub const API_VERSION: &str = "2024-02-07";

/// Read-all projection for the dashboard: every scalar order field plus
/// dereferenced cart line items.
const ORDERS_QUERY: &str = r#"*[_type == "order"]{
  _id,
  firstName,
  lastName,
  phone,
  email,
  address,
  city,
  zipCode,
  total,
  discount,
  orderDate,
  status,
  cartItems[]->{
    productName,
    image
  }
}"#;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub project_id: String,
    pub dataset: String,
    pub token: String,
    /// Overrides the project-derived base URL; used by tests to point the
    /// client at a loopback stub.
    pub api_base: Option<String>,
}

impl StoreConfig {
    pub fn new(
        project_id: impl Into<String>,
        dataset: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
            token: token.into(),
            api_base: None,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn from_env() -> Result<Self> {
        let project_id = env::var("CONTENT_STORE_PROJECT_ID")
            .context("CONTENT_STORE_PROJECT_ID is not set")?;
        let dataset =
            env::var("CONTENT_STORE_DATASET").context("CONTENT_STORE_DATASET is not set")?;
        let token =
            env::var("CONTENT_STORE_API_TOKEN").context("CONTENT_STORE_API_TOKEN is not set")?;
        let api_base = env::var("CONTENT_STORE_API_BASE").ok();
        Ok(Self {
            project_id,
            dataset,
            token,
            api_base,
        })
    }

    fn base_url(&self) -> String {
        self.api_base
            .clone()
            .unwrap_or_else(|| format!("https://{}.api.sanity.io", self.project_id))
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("content store request failed during {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("content store rejected {operation} with status {status}: {message}")]
    Rejected {
        operation: &'static str,
        status: StatusCode,
        message: String,
    },
}

/// Store operations the admin surface depends on. Object-safe so the
/// controller and the delete service can run against test doubles.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn fetch_orders(&self) -> Result<Vec<Order>>;
    async fn set_order_status(&self, order_id: &OrderId, status: OrderStatus) -> Result<()>;
    async fn delete_order(&self, order_id: &OrderId) -> Result<MutateResponse>;
}

pub struct ContentStoreClient {
    http: Client,
    config: StoreConfig,
}

impl ContentStoreClient {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn query_url(&self) -> String {
        format!(
            "{}/v{}/data/query/{}",
            self.config.base_url(),
            API_VERSION,
            self.config.dataset
        )
    }

    fn mutate_url(&self) -> String {
        format!(
            "{}/v{}/data/mutate/{}",
            self.config.base_url(),
            API_VERSION,
            self.config.dataset
        )
    }

    pub async fn fetch_orders(&self) -> Result<Vec<Order>, StoreError> {
        let operation = "fetch_orders";
        let response = self
            .http
            .get(self.query_url())
            .bearer_auth(&self.config.token)
            .query(&[("query", ORDERS_QUERY)])
            .send()
            .await
            .map_err(|source| StoreError::Transport { operation, source })?;
        let response = reject_error_status(response, operation).await?;
        let envelope: QueryResponse<Vec<Order>> = response
            .json()
            .await
            .map_err(|source| StoreError::Transport { operation, source })?;
        debug!(count = envelope.result.len(), "fetched order documents");
        Ok(envelope.result)
    }

    pub async fn set_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), StoreError> {
        let mutations = json!({
            "mutations": [{
                "patch": {
                    "id": order_id.as_str(),
                    "set": { "status": status.as_str() }
                }
            }]
        });
        let result = self.commit(mutations, "set_order_status").await?;
        info!(
            order_id = %order_id,
            status = %status,
            transaction_id = %result.transaction_id,
            "patched order status"
        );
        Ok(())
    }

    pub async fn delete_order(&self, order_id: &OrderId) -> Result<MutateResponse, StoreError> {
        let mutations = json!({
            "mutations": [{
                "delete": { "id": order_id.as_str() }
            }]
        });
        let result = self.commit(mutations, "delete_order").await?;
        info!(
            order_id = %order_id,
            transaction_id = %result.transaction_id,
            "deleted order document"
        );
        Ok(result)
    }

    async fn commit(
        &self,
        mutations: serde_json::Value,
        operation: &'static str,
    ) -> Result<MutateResponse, StoreError> {
        let response = self
            .http
            .post(self.mutate_url())
            .bearer_auth(&self.config.token)
            .json(&mutations)
            .send()
            .await
            .map_err(|source| StoreError::Transport { operation, source })?;
        let response = reject_error_status(response, operation).await?;
        response
            .json()
            .await
            .map_err(|source| StoreError::Transport { operation, source })
    }
}

async fn reject_error_status(
    response: reqwest::Response,
    operation: &'static str,
) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        operation,
        status,
        message,
    })
}

#[async_trait]
impl OrderStore for ContentStoreClient {
    async fn fetch_orders(&self) -> Result<Vec<Order>> {
        Ok(ContentStoreClient::fetch_orders(self).await?)
    }

    async fn set_order_status(&self, order_id: &OrderId, status: OrderStatus) -> Result<()> {
        Ok(ContentStoreClient::set_order_status(self, order_id, status).await?)
    }

    async fn delete_order(&self, order_id: &OrderId) -> Result<MutateResponse> {
        Ok(ContentStoreClient::delete_order(self, order_id).await?)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
