//! HTTP client for the catalog's action API
//!
//! Calls `GET {base}/api/3/action/{action}?id=...` and unwraps the
//! `{ "success": ..., "result": ..., "error": ... }` envelope.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{
    CatalogError, CatalogLookup, CatalogResult, DatasetSummary, OrganizationSummary, UserSummary,
};

/// Default timeout for catalog calls in seconds
pub const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct ActionEnvelope<T> {
    success: bool,
    result: Option<T>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

pub struct HttpCatalog {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> CatalogResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn action_url(&self, action: &str) -> String {
        format!("{}/api/3/action/{}", self.base_url, action)
    }

    #[tracing::instrument(skip(self), fields(action = %action))]
    async fn call<T: DeserializeOwned>(&self, action: &str, kind: &'static str, id: &str) -> CatalogResult<T> {
        let mut request = self.client.get(self.action_url(action)).query(&[("id", id)]);
        if let Some(ref key) = self.api_key {
            request = request.header(reqwest::header::AUTHORIZATION, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::not_found(kind, id));
        }
        if status.is_server_error() {
            return Err(CatalogError::Unavailable(format!("{} returned {}", action, status)));
        }

        let envelope: ActionEnvelope<T> = response.json().await?;
        match (envelope.success, envelope.result) {
            (true, Some(result)) => Ok(result),
            (true, None) => Err(CatalogError::InvalidResponse(format!(
                "{} succeeded without a result",
                action
            ))),
            (false, _) => {
                let message = envelope
                    .error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "no error detail".to_string());
                tracing::debug!(error = %message, "Catalog action failed");
                Err(CatalogError::InvalidResponse(message))
            }
        }
    }
}

#[async_trait]
impl CatalogLookup for HttpCatalog {
    async fn get_user(&self, id_or_name: &str) -> CatalogResult<UserSummary> {
        self.call("user_show", "User", id_or_name).await
    }

    async fn get_organization(&self, id_or_name: &str) -> CatalogResult<OrganizationSummary> {
        self.call("organization_show", "Organization", id_or_name).await
    }

    async fn get_package(&self, id_or_name: &str) -> CatalogResult<DatasetSummary> {
        self.call("package_show", "Dataset", id_or_name).await
    }
}
