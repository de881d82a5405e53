//! Every comment on one request, oldest first unless `sort=desc`
//!
//! No pagination: threads are short and are always rendered whole.

use datareq_common::types::{Caller, SortOrder};
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::access::{AccessTarget, Action};
use crate::cqrs::middleware::{authorize_query, Query};
use crate::error::ActionResult;
use crate::features::shared::{dictize_comment, parse_id, require_id, CommentResponse};
use crate::features::FeatureState;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListCommentsQuery {
    /// Taken from the path
    #[serde(default)]
    pub datarequest_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
}

impl Request<ActionResult<Vec<CommentResponse>>> for ListCommentsQuery {}

impl Query for ListCommentsQuery {
    const ACTION: Action = Action::CommentList;
}

#[tracing::instrument(skip(state, caller, query), fields(datarequest_id = %query.datarequest_id, sort = ?query.sort))]
pub async fn handle(
    state: &FeatureState,
    caller: &Caller,
    query: ListCommentsQuery,
) -> ActionResult<Vec<CommentResponse>> {
    require_id("Data Request", &query.datarequest_id)?;
    state.store.init().await?;

    let datarequest_id = parse_id("Data Request", &query.datarequest_id)?;
    authorize_query::<ListCommentsQuery>(
        state.access.as_ref(),
        caller,
        AccessTarget::DataRequest(datarequest_id),
    )
    .await?;

    let comments = state
        .store
        .list_comments(datarequest_id, query.sort.unwrap_or_default())
        .await?;

    let mut result = Vec::with_capacity(comments.len());
    for comment in comments {
        result.push(dictize_comment(state.catalog.as_ref(), comment).await);
    }

    tracing::debug!(count = result.len(), "Listed comments");

    Ok(result)
}
