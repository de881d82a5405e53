//! Entity to response conversion
//!
//! Responses carry every persisted field plus display data joined from the
//! catalog. Joined data is best-effort: a failed lookup is logged and shows
//! up as `null`, it never fails the action.

use chrono::{DateTime, Utc};
use datareq_common::types::{Comment, DataRequest, Vote};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::catalog::{
    CatalogLookup, CatalogResult, DatasetSummary, OrganizationSummary, UserSummary,
};

/// Outcome of a best-effort catalog join
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment<T> {
    Present(T),
    /// Nothing to look up: the reference is empty
    Absent,
    /// The lookup failed
    Unavailable { reason: String },
}

impl<T> Enrichment<T> {
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Enrichment::Present(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Enrichment::Present(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Enrichment::Unavailable { .. })
    }

    fn from_lookup(kind: &'static str, id: &str, result: CatalogResult<T>) -> Self {
        match result {
            Ok(value) => Enrichment::Present(value),
            Err(e) => {
                tracing::warn!(kind, id = %id, error = %e, "Enrichment lookup failed");
                Enrichment::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }
}

impl<T: Serialize> Serialize for Enrichment<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Enrichment<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Enrichment::Present(value),
            None => Enrichment::Absent,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

async fn user(catalog: &dyn CatalogLookup, user_id: &str) -> Enrichment<UserSummary> {
    match non_empty(Some(user_id)) {
        Some(id) => Enrichment::from_lookup("user", id, catalog.get_user(id).await),
        None => Enrichment::Absent,
    }
}

async fn organization(
    catalog: &dyn CatalogLookup,
    organization_id: Option<&str>,
) -> Enrichment<OrganizationSummary> {
    match non_empty(organization_id) {
        Some(id) => Enrichment::from_lookup("organization", id, catalog.get_organization(id).await),
        None => Enrichment::Absent,
    }
}

async fn dataset(catalog: &dyn CatalogLookup, dataset_id: Option<&str>) -> Enrichment<DatasetSummary> {
    match non_empty(dataset_id) {
        Some(id) => Enrichment::from_lookup("dataset", id, catalog.get_package(id).await),
        None => Enrichment::Absent,
    }
}

/// A data request as returned by every request action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataRequestResponse {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub organization_id: Option<String>,
    pub open_time: DateTime<Utc>,
    pub accepted_dataset_id: Option<String>,
    pub close_time: Option<DateTime<Utc>>,
    pub closed: bool,
    pub user: Enrichment<UserSummary>,
    pub organization: Enrichment<OrganizationSummary>,
    pub accepted_dataset: Enrichment<DatasetSummary>,
}

pub async fn dictize_datarequest(catalog: &dyn CatalogLookup, request: DataRequest) -> DataRequestResponse {
    let (user, organization, accepted_dataset) = tokio::join!(
        user(catalog, &request.user_id),
        organization(catalog, request.organization_id.as_deref()),
        dataset(catalog, request.accepted_dataset_id.as_deref()),
    );

    DataRequestResponse {
        id: request.id,
        user_id: request.user_id,
        title: request.title,
        description: request.description,
        organization_id: request.organization_id,
        open_time: request.open_time,
        accepted_dataset_id: request.accepted_dataset_id,
        close_time: request.close_time,
        closed: request.closed,
        user,
        organization,
        accepted_dataset,
    }
}

/// Dictize a page of requests, preserving order
pub async fn dictize_datarequests(
    catalog: &dyn CatalogLookup,
    requests: impl IntoIterator<Item = DataRequest>,
) -> Vec<DataRequestResponse> {
    let mut out = Vec::new();
    for request in requests {
        out.push(dictize_datarequest(catalog, request).await);
    }
    out
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub datarequest_id: Uuid,
    pub user_id: String,
    pub comment: String,
    pub time: DateTime<Utc>,
    pub user: Enrichment<UserSummary>,
}

pub async fn dictize_comment(catalog: &dyn CatalogLookup, comment: Comment) -> CommentResponse {
    let user = user(catalog, &comment.user_id).await;
    CommentResponse {
        id: comment.id,
        datarequest_id: comment.datarequest_id,
        user_id: comment.user_id,
        comment: comment.comment,
        time: comment.time,
        user,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteResponse {
    pub id: Uuid,
    pub datarequest_id: Uuid,
    pub user_id: String,
    pub vote: i16,
    pub user: Enrichment<UserSummary>,
}

pub async fn dictize_vote(catalog: &dyn CatalogLookup, vote: Vote) -> VoteResponse {
    let user = user(catalog, &vote.user_id).await;
    VoteResponse {
        id: vote.id,
        datarequest_id: vote.datarequest_id,
        user_id: vote.user_id,
        vote: vote.vote,
        user,
    }
}

/// The user-editable part of a data request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRequestFields {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
}

/// Copy editable fields onto `request`; an empty organization becomes `None`
///
/// Identity, ownership, timestamps and closing state are left alone.
pub fn apply_editable_fields(request: &mut DataRequest, fields: &DataRequestFields) {
    request.title = fields.title.clone();
    request.description = fields.description.clone();
    request.organization_id = non_empty(fields.organization_id.as_deref()).map(str::to_string);
}
