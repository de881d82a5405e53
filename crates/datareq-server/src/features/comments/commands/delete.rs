//! Delete comment command

use datareq_common::types::Caller;
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::access::{AccessTarget, Action};
use crate::cqrs::middleware::{authorize_command, Command};
use crate::error::{ActionError, ActionResult};
use crate::features::shared::{dictize_comment, parse_id, require_id, CommentResponse};
use crate::features::FeatureState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCommentCommand {
    pub id: String,
}

impl Request<ActionResult<CommentResponse>> for DeleteCommentCommand {}

impl Command for DeleteCommentCommand {
    const ACTION: Action = Action::CommentDelete;
}

/// Delete a comment and answer with what was removed
#[tracing::instrument(skip(state, caller, command), fields(comment_id = %command.id))]
pub async fn handle(
    state: &FeatureState,
    caller: &Caller,
    command: DeleteCommentCommand,
) -> ActionResult<CommentResponse> {
    require_id("Comment", &command.id)?;
    state.store.init().await?;

    let id = parse_id("Comment", &command.id)?;
    authorize_command::<DeleteCommentCommand>(state.access.as_ref(), caller, AccessTarget::Comment(id)).await?;

    let comment = state
        .store
        .get_comment(id)
        .await?
        .ok_or_else(|| ActionError::not_found("Comment", id))?;

    if !state.store.delete_comment(id).await? {
        return Err(ActionError::not_found("Comment", id));
    }

    tracing::info!("Comment deleted");

    Ok(dictize_comment(state.catalog.as_ref(), comment).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::*;
    use crate::store::DataRequestStore;

    fn command(id: impl ToString) -> DeleteCommentCommand {
        DeleteCommentCommand { id: id.to_string() }
    }

    #[tokio::test]
    async fn test_delete_leaves_request_alone() {
        let ctx = TestContext::new();
        let request = ctx.seed_request(OWNER, "Traffic").await;
        let comment = ctx.seed_comment(&request, OTHER, "bye").await;

        let response = handle(&ctx.state, &other(), command(comment.id)).await.unwrap();
        assert_eq!(response.id, comment.id);
        assert_eq!(response.comment, "bye");

        assert!(ctx.store.get_comment(comment.id).await.unwrap().is_none());
        assert!(ctx.stored(&request).await.is_some());

        let err = handle(&ctx.state, &other(), command(comment.id)).await.unwrap_err();
        assert!(matches!(err, ActionError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_stranger_cannot_delete() {
        let ctx = TestContext::new();
        let request = ctx.seed_request(OWNER, "Traffic").await;
        let comment = ctx.seed_comment(&request, OWNER, "mine").await;

        let err = handle(&ctx.state, &other(), command(comment.id)).await.unwrap_err();
        assert!(matches!(err, ActionError::NotAuthorized(_)));
        assert!(ctx.store.get_comment(comment.id).await.unwrap().is_some());
    }
}
