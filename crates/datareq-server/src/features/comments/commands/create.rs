//! Comment on a data request
//!
//! The caller becomes the author. The parent request must exist; that is
//! a validation rule rather than a not-found, so a bad parent id shows up
//! next to any problem with the body.

use datareq_common::types::{Caller, Comment};
use mediator::Request;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::{AccessTarget, Action};
use crate::cqrs::middleware::{authorize_command, Command};
use crate::error::{ActionError, ActionResult};
use crate::features::shared::{dictize_comment, escape_html, parse_id, require_id, CommentResponse};
use crate::features::FeatureState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentCommand {
    /// Taken from the path
    #[serde(default)]
    pub datarequest_id: String,

    pub comment: String,
}

impl Request<ActionResult<CommentResponse>> for CreateCommentCommand {}

impl Command for CreateCommentCommand {
    const ACTION: Action = Action::CommentCreate;
}

#[tracing::instrument(skip(state, caller, command), fields(datarequest_id = %command.datarequest_id))]
pub async fn handle(
    state: &FeatureState,
    caller: &Caller,
    command: CreateCommentCommand,
) -> ActionResult<CommentResponse> {
    require_id("Data Request", &command.datarequest_id)?;
    state.store.init().await?;

    let target = Uuid::parse_str(command.datarequest_id.trim())
        .map(AccessTarget::DataRequest)
        .unwrap_or(AccessTarget::Collection);
    authorize_command::<CreateCommentCommand>(state.access.as_ref(), caller, target).await?;

    let Some(user_id) = caller.user_id.clone() else {
        return Err(ActionError::Unauthenticated(
            "You must be logged in to comment on a data request".to_string(),
        ));
    };

    state
        .validator
        .validate_comment(command.datarequest_id.trim(), &command.comment)
        .await?;

    let datarequest_id = parse_id("Data Request", &command.datarequest_id)?;
    let comment = Comment::new(datarequest_id, user_id, escape_html(&command.comment));
    state.store.insert_comment(&comment).await?;

    tracing::info!(comment_id = %comment.id, "Comment created");

    Ok(dictize_comment(state.catalog.as_ref(), comment).await)
}
