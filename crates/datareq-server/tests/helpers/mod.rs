//! Test helpers for data request server integration tests
//!
//! Builds the full axum application on top of the in-memory store and a
//! fixed catalog, and wraps `oneshot` calls with caller headers.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use datareq_server::{
    access::DefaultAccessPolicy,
    api,
    catalog::StaticCatalog,
    config::{CallerConfig, CorsConfig},
    features::{shared::CatalogValidator, FeatureState, DATAREQUESTS_PER_PAGE},
    store::MemoryStore,
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

pub const OWNER: &str = "u-owner";
pub const OTHER: &str = "u-other";
pub const ADMIN: &str = "u-admin";
pub const ORG: &str = "org-1";
pub const DATASET: &str = "pkg-1";

/// Who sends a request
#[derive(Debug, Clone, Copy)]
pub enum As {
    Anonymous,
    User(&'static str),
    Sysadmin(&'static str),
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    /// Sent as `x-catalog-proxy-secret` on every request when set
    pub proxy_secret: Option<&'static str>,
}

pub fn catalog() -> StaticCatalog {
    StaticCatalog::new()
        .with_user(OWNER, "alice")
        .with_user(OTHER, "bob")
        .with_user(ADMIN, "root")
        .with_organization(ORG, "council", Some("City Council"))
        .with_organization("org-2", "transport", None)
        .with_dataset(DATASET, "traffic-counts")
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(catalog())
}

pub fn setup_test_app_with(catalog: StaticCatalog) -> TestApp {
    setup_test_app_trusting(
        catalog,
        CallerConfig {
            proxy_secret: None,
            trust_sysadmin_header: true,
        },
    )
}

pub fn setup_test_app_trusting(catalog: StaticCatalog, callers: CallerConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let catalog = Arc::new(catalog);
    let state = FeatureState {
        store: store.clone(),
        access: Arc::new(DefaultAccessPolicy::new(store.clone())),
        validator: Arc::new(CatalogValidator::new(store.clone(), catalog.clone())),
        catalog,
        page_size: DATAREQUESTS_PER_PAGE,
        callers,
    };
    let cors = CorsConfig {
        allowed_origins: vec!["*".to_string()],
        allow_credentials: false,
    };

    TestApp {
        router: api::create_router(state, &cors),
        store,
        proxy_secret: None,
    }
}

impl TestApp {
    /// Send one request and decode the JSON body
    pub async fn send(&self, method: Method, uri: &str, who: As, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        builder = match who {
            As::Anonymous => builder,
            As::User(id) => builder.header("x-catalog-user", id),
            As::Sysadmin(id) => builder
                .header("x-catalog-user", id)
                .header("x-catalog-sysadmin", "true"),
        };
        if let Some(secret) = self.proxy_secret {
            builder = builder.header("x-catalog-proxy-secret", secret);
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, who: As) -> (StatusCode, Value) {
        self.send(Method::GET, uri, who, None).await
    }

    pub async fn post(&self, uri: &str, who: As, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, who, Some(body)).await
    }

    pub async fn put(&self, uri: &str, who: As, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, who, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, who: As) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, who, None).await
    }

    /// Create a request through the API and return its id
    pub async fn create_request(&self, who: As, title: &str) -> String {
        let (status, json) = self
            .post(
                "/api/v1/datarequests",
                who,
                serde_json::json!({ "title": title, "description": "Needed for a report" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);
        json["data"]["id"].as_str().unwrap().to_string()
    }
}
