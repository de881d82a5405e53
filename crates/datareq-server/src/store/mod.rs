//! Persistence seam for data requests, comments and votes
//!
//! The action layer only talks to [`DataRequestStore`]. Two implementations
//! ship with the crate:
//!
//! - [`PgStore`]: PostgreSQL through sqlx, schema created by embedded migrations
//! - [`MemoryStore`]: process-local maps, used by tests and local experiments
//!
//! Every write method is one transaction: a failed call leaves nothing behind.

use async_trait::async_trait;
use datareq_common::types::{Comment, DataRequest, SortOrder, Vote};
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Schema migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A write targeted a row that no longer exists
    #[error("{entity} '{id}' does not exist")]
    Missing { entity: &'static str, id: Uuid },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Filters for listing data requests
///
/// All filters are conjunctive; `None` means "don't filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataRequestFilter {
    /// Canonical organization id
    pub organization_id: Option<String>,
    /// Canonical owner id
    pub user_id: Option<String>,
    pub closed: Option<bool>,
    /// Case-insensitive substring matched against title and description
    pub q: Option<String>,
    /// Ordering by open time
    pub sort: SortOrder,
}

impl DataRequestFilter {
    /// In-memory evaluation of the filter, mirroring the SQL predicate
    pub fn matches(&self, request: &DataRequest) -> bool {
        if let Some(ref org) = self.organization_id {
            if request.organization_id.as_deref() != Some(org.as_str()) {
                return false;
            }
        }
        if let Some(ref user) = self.user_id {
            if &request.user_id != user {
                return false;
            }
        }
        if let Some(closed) = self.closed {
            if request.closed != closed {
                return false;
            }
        }
        if let Some(ref q) = self.q {
            let needle = q.to_lowercase();
            let in_title = request.title.to_lowercase().contains(&needle);
            let in_description = request
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !in_title && !in_description {
                return false;
            }
        }
        true
    }
}

#[async_trait]
pub trait DataRequestStore: Send + Sync {
    /// Make sure the schema exists. Idempotent and cheap after the first call.
    async fn init(&self) -> StoreResult<()>;

    /// Round-trip to the backing store
    async fn health_check(&self) -> StoreResult<()>;

    async fn get_datarequest(&self, id: Uuid) -> StoreResult<Option<DataRequest>>;

    /// Case-insensitive exact title match
    async fn find_datarequest_by_title(&self, title: &str) -> StoreResult<Option<DataRequest>>;

    /// Every request matching `filter`, ordered by open time
    async fn list_datarequests(&self, filter: &DataRequestFilter) -> StoreResult<Vec<DataRequest>>;

    async fn insert_datarequest(&self, request: &DataRequest) -> StoreResult<()>;

    async fn update_datarequest(&self, request: &DataRequest) -> StoreResult<()>;

    /// Delete a request together with its comments and votes.
    /// Returns whether a row was removed.
    async fn delete_datarequest(&self, id: Uuid) -> StoreResult<bool>;

    async fn get_comment(&self, id: Uuid) -> StoreResult<Option<Comment>>;

    /// Comments of one request, ordered by creation time
    async fn list_comments(&self, datarequest_id: Uuid, sort: SortOrder) -> StoreResult<Vec<Comment>>;

    async fn insert_comment(&self, comment: &Comment) -> StoreResult<()>;

    async fn update_comment(&self, comment: &Comment) -> StoreResult<()>;

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool>;

    async fn insert_vote(&self, vote: &Vote) -> StoreResult<()>;

    async fn list_votes(&self, datarequest_id: Uuid) -> StoreResult<Vec<Vote>>;
}
