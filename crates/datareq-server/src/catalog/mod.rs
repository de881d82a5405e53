//! Lookups against the data catalog
//!
//! Users, organizations and datasets live in the catalog, not in this
//! service. Handlers resolve them through [`CatalogLookup`] to canonicalize
//! filter values, validate references and enrich responses.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod cache;
pub mod http;
pub mod memory;

pub use cache::{CachedCatalog, UserCache};
pub use http::HttpCatalog;
pub use memory::StaticCatalog;

/// User as shown next to requests, comments and votes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl OrganizationSummary {
    /// Label for facets: display name, then title, then machine name
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{kind} '{id}' not found in catalog")]
    NotFound { kind: &'static str, id: String },

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected catalog response: {0}")]
    InvalidResponse(String),
}

impl CatalogError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Resolve catalog entities by id or by name
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn get_user(&self, id_or_name: &str) -> CatalogResult<UserSummary>;

    async fn get_organization(&self, id_or_name: &str) -> CatalogResult<OrganizationSummary>;

    async fn get_package(&self, id_or_name: &str) -> CatalogResult<DatasetSummary>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_label_fallbacks() {
        let mut org = OrganizationSummary {
            id: "o1".to_string(),
            name: "city-council".to_string(),
            display_name: None,
            title: None,
        };
        assert_eq!(org.label(), "city-council");

        org.title = Some("City Council".to_string());
        assert_eq!(org.label(), "City Council");

        org.display_name = Some("The Council".to_string());
        assert_eq!(org.label(), "The Council");
    }

    #[test]
    fn test_user_summary_ignores_unknown_fields() {
        let user: UserSummary = serde_json::from_str(
            r#"{"id": "u1", "name": "alice", "display_name": "Alice", "email_hash": "x"}"#,
        )
        .unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Alice"));
    }
}
