//! Up or down vote on a data request
//!
//! Votes are not deduplicated: every call records a new vote. The parent
//! request must exist, which the validator reports as a field error.

use datareq_common::types::{parse_vote, Caller, Vote};
use mediator::Request;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::{AccessTarget, Action};
use crate::cqrs::middleware::{authorize_command, Command};
use crate::error::{ActionError, ActionResult};
use crate::features::shared::{dictize_vote, parse_id, require_id, VoteResponse};
use crate::features::FeatureState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVoteCommand {
    /// Taken from the path
    #[serde(default)]
    pub datarequest_id: String,

    /// +1 or -1
    pub vote: i64,
}

impl Request<ActionResult<VoteResponse>> for CreateVoteCommand {}

impl Command for CreateVoteCommand {
    const ACTION: Action = Action::VoteCreate;
}

/// Record a vote by the caller on a request
#[tracing::instrument(skip(state, caller, command), fields(datarequest_id = %command.datarequest_id, vote = command.vote))]
pub async fn handle(
    state: &FeatureState,
    caller: &Caller,
    command: CreateVoteCommand,
) -> ActionResult<VoteResponse> {
    require_id("Data Request", &command.datarequest_id)?;
    state.store.init().await?;

    let target = Uuid::parse_str(command.datarequest_id.trim())
        .map(AccessTarget::DataRequest)
        .unwrap_or(AccessTarget::Collection);
    authorize_command::<CreateVoteCommand>(state.access.as_ref(), caller, target).await?;

    let Some(user_id) = caller.user_id.clone() else {
        return Err(ActionError::Unauthenticated(
            "You must be logged in to vote on a data request".to_string(),
        ));
    };

    state
        .validator
        .validate_vote(command.datarequest_id.trim(), command.vote)
        .await?;

    let datarequest_id = parse_id("Data Request", &command.datarequest_id)?;
    let vote = Vote::new(datarequest_id, user_id, parse_vote(command.vote)?);
    state.store.insert_vote(&vote).await?;

    tracing::info!(vote_id = %vote.id, "Vote recorded");

    Ok(dictize_vote(state.catalog.as_ref(), vote).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::*;
    use crate::store::DataRequestStore;

    fn command(datarequest_id: impl ToString, vote: i64) -> CreateVoteCommand {
        CreateVoteCommand {
            datarequest_id: datarequest_id.to_string(),
            vote,
        }
    }

    #[tokio::test]
    async fn test_up_and_down_votes() {
        let ctx = TestContext::new();
        let request = ctx.seed_request(OWNER, "Traffic").await;

        let up = handle(&ctx.state, &other(), command(request.id, 1)).await.unwrap();
        assert_eq!(up.vote, 1);
        assert_eq!(up.user_id, OTHER);
        assert_eq!(up.user.as_option().unwrap().name, "bob");

        let down = handle(&ctx.state, &owner(), command(request.id, -1)).await.unwrap();
        assert_eq!(down.vote, -1);

        let votes = ctx.store.list_votes(request.id).await.unwrap();
        assert_eq!(votes.iter().map(|v| v.vote as i64).sum::<i64>(), 0);
    }

    #[tokio::test]
    async fn test_repeat_votes_are_kept() {
        let ctx = TestContext::new();
        let request = ctx.seed_request(OWNER, "Traffic").await;
        handle(&ctx.state, &other(), command(request.id, 1)).await.unwrap();
        handle(&ctx.state, &other(), command(request.id, 1)).await.unwrap();
        assert_eq!(ctx.store.list_votes(request.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_out_of_range_vote() {
        let ctx = TestContext::new();
        let request = ctx.seed_request(OWNER, "Traffic").await;
        for value in [0, 2, -5] {
            let err = handle(&ctx.state, &other(), command(request.id, value))
                .await
                .unwrap_err();
            assert!(matches!(err, ActionError::Validation(ref e) if e.contains("vote")));
        }
        assert!(ctx.store.list_votes(request.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_vote_on_missing_request() {
        let ctx = TestContext::new();
        let err = handle(&ctx.state, &other(), command(Uuid::new_v4(), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Validation(ref e) if e.contains("datarequest_id")));
    }

    #[tokio::test]
    async fn test_anonymous_and_missing_id() {
        let ctx = TestContext::new();
        let request = ctx.seed_request(OWNER, "Traffic").await;
        assert!(matches!(
            handle(&ctx.state, &Caller::anonymous(), command(request.id, 1)).await.unwrap_err(),
            ActionError::Unauthenticated(_)
        ));
        assert!(matches!(
            handle(&ctx.state, &other(), command(" ", 1)).await.unwrap_err(),
            ActionError::MissingId { .. }
        ));
    }
}
