//! Rewrite the body of a comment
//!
//! Author, parent and time are kept; only the text changes.

use datareq_common::types::Caller;
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::access::{AccessTarget, Action};
use crate::cqrs::middleware::{authorize_command, Command};
use crate::error::{ActionError, ActionResult};
use crate::features::shared::{dictize_comment, escape_html, parse_id, require_id, CommentResponse};
use crate::features::FeatureState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCommentCommand {
    /// Taken from the path
    #[serde(default)]
    pub id: String,

    pub comment: String,
}

impl Request<ActionResult<CommentResponse>> for UpdateCommentCommand {}

impl Command for UpdateCommentCommand {
    const ACTION: Action = Action::CommentUpdate;
}

#[tracing::instrument(skip(state, caller, command), fields(comment_id = %command.id))]
pub async fn handle(
    state: &FeatureState,
    caller: &Caller,
    command: UpdateCommentCommand,
) -> ActionResult<CommentResponse> {
    require_id("Comment", &command.id)?;
    state.store.init().await?;

    let id = parse_id("Comment", &command.id)?;
    authorize_command::<UpdateCommentCommand>(state.access.as_ref(), caller, AccessTarget::Comment(id)).await?;

    let mut comment = state
        .store
        .get_comment(id)
        .await?
        .ok_or_else(|| ActionError::not_found("Comment", id))?;

    state
        .validator
        .validate_comment(&comment.datarequest_id.to_string(), &command.comment)
        .await?;

    comment.comment = escape_html(&command.comment);
    state.store.update_comment(&comment).await?;

    tracing::info!("Comment updated");

    Ok(dictize_comment(state.catalog.as_ref(), comment).await)
}
