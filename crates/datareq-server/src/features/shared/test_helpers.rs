//! Test fixtures for handler tests
//!
//! Wires [`FeatureState`] with an in-memory store and a fixed catalog so
//! handlers can be exercised without PostgreSQL or a catalog instance.
//!
//! # Examples
//!
//! ```rust,ignore
//! let ctx = TestContext::new();
//! let created = ctx.seed_request("owner", "Traffic data").await;
//! let response = show::handle(&ctx.state, &Caller::anonymous(), query).await?;
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use datareq_common::types::{Caller, Comment, DataRequest};

use crate::access::{AccessPolicy, DefaultAccessPolicy};
use crate::catalog::StaticCatalog;
use crate::config::CallerConfig;
use crate::features::shared::validator::CatalogValidator;
use crate::features::{FeatureState, DATAREQUESTS_PER_PAGE};
use crate::store::{DataRequestStore, MemoryStore};

pub const OWNER: &str = "u-owner";
pub const OTHER: &str = "u-other";
pub const ADMIN: &str = "u-admin";
pub const ORG: &str = "org-1";
pub const OTHER_ORG: &str = "org-2";
pub const DATASET: &str = "pkg-1";

pub fn owner() -> Caller {
    Caller::user(OWNER)
}

pub fn other() -> Caller {
    Caller::user(OTHER)
}

pub fn admin() -> Caller {
    Caller::sysadmin(ADMIN)
}

pub fn catalog() -> StaticCatalog {
    StaticCatalog::new()
        .with_user(OWNER, "alice")
        .with_user(OTHER, "bob")
        .with_user(ADMIN, "root")
        .with_organization(ORG, "council", Some("City Council"))
        .with_organization(OTHER_ORG, "transport", None)
        .with_dataset(DATASET, "traffic-counts")
}

pub struct TestContext {
    pub state: FeatureState,
    pub store: Arc<MemoryStore>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_catalog(catalog())
    }

    pub fn with_catalog(catalog: StaticCatalog) -> Self {
        let store = Arc::new(MemoryStore::new());
        let access = Arc::new(DefaultAccessPolicy::new(store.clone()));
        Self::build(store, access, catalog)
    }

    pub fn with_access(access: Arc<dyn AccessPolicy>) -> Self {
        Self::build(Arc::new(MemoryStore::new()), access, catalog())
    }

    fn build(store: Arc<MemoryStore>, access: Arc<dyn AccessPolicy>, catalog: StaticCatalog) -> Self {
        let catalog = Arc::new(catalog);
        let validator = Arc::new(CatalogValidator::new(store.clone(), catalog.clone()));
        let state = FeatureState {
            store: store.clone(),
            access,
            validator,
            catalog,
            page_size: DATAREQUESTS_PER_PAGE,
            callers: CallerConfig::default(),
        };
        Self { state, store }
    }

    /// Insert an open request directly into the store
    pub async fn seed_request(&self, user_id: &str, title: &str) -> DataRequest {
        self.seed_request_at(user_id, title, Utc::now()).await
    }

    pub async fn seed_request_at(&self, user_id: &str, title: &str, at: DateTime<Utc>) -> DataRequest {
        let request = DataRequest::open_at(user_id, title, at);
        self.store
            .insert_datarequest(&request)
            .await
            .expect("seed request");
        request
    }

    pub async fn seed_comment(&self, request: &DataRequest, user_id: &str, text: &str) -> Comment {
        let comment = Comment::new(request.id, user_id, text);
        self.store.insert_comment(&comment).await.expect("seed comment");
        comment
    }

    pub async fn stored(&self, request: &DataRequest) -> Option<DataRequest> {
        self.store
            .get_datarequest(request.id)
            .await
            .expect("read request")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
