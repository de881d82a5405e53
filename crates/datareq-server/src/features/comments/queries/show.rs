//! Show one comment

use datareq_common::types::Caller;
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::access::{AccessTarget, Action};
use crate::cqrs::middleware::{authorize_query, Query};
use crate::error::{ActionError, ActionResult};
use crate::features::shared::{dictize_comment, parse_id, require_id, CommentResponse};
use crate::features::FeatureState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowCommentQuery {
    pub id: String,
}

impl Request<ActionResult<CommentResponse>> for ShowCommentQuery {}

impl Query for ShowCommentQuery {
    const ACTION: Action = Action::CommentShow;
}

#[tracing::instrument(skip(state, caller, query), fields(comment_id = %query.id))]
pub async fn handle(
    state: &FeatureState,
    caller: &Caller,
    query: ShowCommentQuery,
) -> ActionResult<CommentResponse> {
    require_id("Comment", &query.id)?;
    state.store.init().await?;

    let id = parse_id("Comment", &query.id)?;
    authorize_query::<ShowCommentQuery>(state.access.as_ref(), caller, AccessTarget::Comment(id)).await?;

    let comment = state
        .store
        .get_comment(id)
        .await?
        .ok_or_else(|| ActionError::not_found("Comment", id))?;

    Ok(dictize_comment(state.catalog.as_ref(), comment).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::features::shared::test_helpers::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_show_is_public() {
        let ctx = TestContext::new();
        let request = ctx.seed_request(OWNER, "Traffic").await;
        let comment = ctx.seed_comment(&request, OTHER, "hello").await;

        let response = handle(
            &ctx.state,
            &Caller::anonymous(),
            ShowCommentQuery {
                id: comment.id.to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(response.comment, "hello");
        assert_eq!(response.user.as_option().unwrap().name, "bob");
    }

    #[tokio::test]
    async fn test_author_lookup_failure_degrades() {
        let ctx = TestContext::with_catalog(StaticCatalog::new().with_unavailable(OTHER));
        let request = ctx.seed_request(OWNER, "Traffic").await;
        let comment = ctx.seed_comment(&request, OTHER, "hello").await;

        let response = handle(
            &ctx.state,
            &Caller::anonymous(),
            ShowCommentQuery {
                id: comment.id.to_string(),
            },
        )
        .await
        .unwrap();
        assert!(response.user.is_unavailable());
        assert_eq!(serde_json::to_value(&response).unwrap()["user"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_unknown_comment() {
        let ctx = TestContext::new();
        let err = handle(
            &ctx.state,
            &owner(),
            ShowCommentQuery {
                id: Uuid::new_v4().to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ActionError::NotFound { entity: "Comment", .. }));
        assert!(err.to_string().ends_with("not found in the data base"));
    }
}
