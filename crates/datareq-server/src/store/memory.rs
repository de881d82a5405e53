//! In-memory implementation of [`DataRequestStore`]
//!
//! Mirrors the PostgreSQL store closely enough for the handlers' tests:
//! same ordering, same cascade on request deletion.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use datareq_common::types::{Comment, DataRequest, SortOrder, Vote};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DataRequestFilter, DataRequestStore, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    datarequests: HashMap<Uuid, DataRequest>,
    comments: HashMap<Uuid, Comment>,
    votes: Vec<Vote>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    init_calls: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `init` was called
    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    /// How many mutating calls reached the store
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DataRequestStore for MemoryStore {
    async fn init(&self) -> StoreResult<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn get_datarequest(&self, id: Uuid) -> StoreResult<Option<DataRequest>> {
        Ok(self.tables.read().await.datarequests.get(&id).cloned())
    }

    async fn find_datarequest_by_title(&self, title: &str) -> StoreResult<Option<DataRequest>> {
        let needle = title.to_lowercase();
        Ok(self
            .tables
            .read()
            .await
            .datarequests
            .values()
            .find(|r| r.title.to_lowercase() == needle)
            .cloned())
    }

    async fn list_datarequests(&self, filter: &DataRequestFilter) -> StoreResult<Vec<DataRequest>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<DataRequest> = tables
            .datarequests
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();

        rows.sort_by(|a, b| a.open_time.cmp(&b.open_time).then(a.id.cmp(&b.id)));
        if filter.sort.is_desc() {
            rows.reverse();
        }
        Ok(rows)
    }

    async fn insert_datarequest(&self, request: &DataRequest) -> StoreResult<()> {
        self.record_write();
        self.tables
            .write()
            .await
            .datarequests
            .insert(request.id, request.clone());
        Ok(())
    }

    async fn update_datarequest(&self, request: &DataRequest) -> StoreResult<()> {
        self.record_write();
        let mut tables = self.tables.write().await;
        match tables.datarequests.get_mut(&request.id) {
            Some(existing) => {
                *existing = request.clone();
                Ok(())
            }
            None => Err(StoreError::Missing {
                entity: "Data request",
                id: request.id,
            }),
        }
    }

    async fn delete_datarequest(&self, id: Uuid) -> StoreResult<bool> {
        self.record_write();
        let mut tables = self.tables.write().await;
        let removed = tables.datarequests.remove(&id).is_some();
        if removed {
            tables.comments.retain(|_, c| c.datarequest_id != id);
            tables.votes.retain(|v| v.datarequest_id != id);
        }
        Ok(removed)
    }

    async fn get_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn list_comments(&self, datarequest_id: Uuid, sort: SortOrder) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.datarequest_id == datarequest_id)
            .cloned()
            .collect();

        rows.sort_by(|a, b| a.time.cmp(&b.time).then(a.id.cmp(&b.id)));
        if sort.is_desc() {
            rows.reverse();
        }
        Ok(rows)
    }

    async fn insert_comment(&self, comment: &Comment) -> StoreResult<()> {
        self.record_write();
        self.tables
            .write()
            .await
            .comments
            .insert(comment.id, comment.clone());
        Ok(())
    }

    async fn update_comment(&self, comment: &Comment) -> StoreResult<()> {
        self.record_write();
        let mut tables = self.tables.write().await;
        match tables.comments.get_mut(&comment.id) {
            Some(existing) => {
                existing.comment = comment.comment.clone();
                Ok(())
            }
            None => Err(StoreError::Missing {
                entity: "Comment",
                id: comment.id,
            }),
        }
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool> {
        self.record_write();
        Ok(self.tables.write().await.comments.remove(&id).is_some())
    }

    async fn insert_vote(&self, vote: &Vote) -> StoreResult<()> {
        self.record_write();
        self.tables.write().await.votes.push(vote.clone());
        Ok(())
    }

    async fn list_votes(&self, datarequest_id: Uuid) -> StoreResult<Vec<Vote>> {
        Ok(self
            .tables
            .read()
            .await
            .votes
            .iter()
            .filter(|v| v.datarequest_id == datarequest_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_list_orders_by_open_time() {
        let store = MemoryStore::new();
        let base = Utc::now();
        let first = DataRequest::open_at("u1", "First", base);
        let second = DataRequest::open_at("u1", "Second", base + Duration::seconds(1));
        let third = DataRequest::open_at("u1", "Third", base + Duration::seconds(2));
        for r in [&second, &third, &first] {
            store.insert_datarequest(r).await.unwrap();
        }

        let asc = store
            .list_datarequests(&DataRequestFilter::default())
            .await
            .unwrap();
        let titles: Vec<_> = asc.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);

        let desc = store
            .list_datarequests(&DataRequestFilter {
                sort: SortOrder::Desc,
                ..Default::default()
            })
            .await
            .unwrap();
        let titles: Vec<_> = desc.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_comments_and_votes() {
        let store = MemoryStore::new();
        let request = DataRequest::open("u1", "Cascade");
        let other = DataRequest::open("u1", "Other");
        store.insert_datarequest(&request).await.unwrap();
        store.insert_datarequest(&other).await.unwrap();

        let comment = Comment::new(request.id, "u2", "hello");
        let kept = Comment::new(other.id, "u2", "still here");
        store.insert_comment(&comment).await.unwrap();
        store.insert_comment(&kept).await.unwrap();
        store.insert_vote(&Vote::new(request.id, "u2", 1)).await.unwrap();

        assert!(store.delete_datarequest(request.id).await.unwrap());
        assert!(store.get_comment(comment.id).await.unwrap().is_none());
        assert!(store.get_comment(kept.id).await.unwrap().is_some());
        assert!(store.list_votes(request.id).await.unwrap().is_empty());
        assert!(!store.delete_datarequest(request.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_title_lookup_is_case_insensitive() {
        let store = MemoryStore::new();
        store
            .insert_datarequest(&DataRequest::open("u1", "Traffic Data"))
            .await
            .unwrap();
        assert!(store
            .find_datarequest_by_title("traffic data")
            .await
            .unwrap()
            .is_some());
        assert!(store.find_datarequest_by_title("traffic").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_request_fails() {
        let store = MemoryStore::new();
        let err = store
            .update_datarequest(&DataRequest::open("u1", "Ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Missing { .. }));
    }
}
