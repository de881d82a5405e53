//! Delete data request command
//!
//! Removes the request together with its comments and votes and answers
//! with a snapshot of what was deleted.

use datareq_common::types::Caller;
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::access::{AccessTarget, Action};
use crate::cqrs::middleware::{authorize_command, Command};
use crate::error::{ActionError, ActionResult};
use crate::features::shared::{dictize_datarequest, parse_id, require_id, DataRequestResponse};
use crate::features::FeatureState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDataRequestCommand {
    pub id: String,
}

impl Request<ActionResult<DataRequestResponse>> for DeleteDataRequestCommand {}

impl Command for DeleteDataRequestCommand {
    const ACTION: Action = Action::DataRequestDelete;
}

#[tracing::instrument(skip(state, caller, command), fields(datarequest_id = %command.id))]
pub async fn handle(
    state: &FeatureState,
    caller: &Caller,
    command: DeleteDataRequestCommand,
) -> ActionResult<DataRequestResponse> {
    require_id("Data Request", &command.id)?;
    state.store.init().await?;

    let id = parse_id("Data Request", &command.id)?;
    authorize_command::<DeleteDataRequestCommand>(state.access.as_ref(), caller, AccessTarget::DataRequest(id))
        .await?;

    let request = state
        .store
        .get_datarequest(id)
        .await?
        .ok_or_else(|| ActionError::not_found("Data Request", id))?;

    // Gone between the lookup and the delete: report it like any other miss
    if !state.store.delete_datarequest(id).await? {
        return Err(ActionError::not_found("Data Request", id));
    }

    tracing::info!("Data request deleted");

    Ok(dictize_datarequest(state.catalog.as_ref(), request).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::*;
    use crate::store::DataRequestStore;
    use uuid::Uuid;

    fn command(id: impl ToString) -> DeleteDataRequestCommand {
        DeleteDataRequestCommand { id: id.to_string() }
    }

    #[tokio::test]
    async fn test_delete_returns_snapshot_and_removes_row() {
        let ctx = TestContext::new();
        let seeded = ctx.seed_request(OWNER, "Short lived").await;
        let comment = ctx.seed_comment(&seeded, OTHER, "bye").await;

        let response = handle(&ctx.state, &owner(), command(seeded.id)).await.unwrap();
        assert_eq!(response.id, seeded.id);
        assert_eq!(response.title, "Short lived");

        assert!(ctx.stored(&seeded).await.is_none());
        assert!(ctx.store.get_comment(comment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_second_delete_is_not_found() {
        let ctx = TestContext::new();
        let seeded = ctx.seed_request(OWNER, "Once").await;
        handle(&ctx.state, &owner(), command(seeded.id)).await.unwrap();
        let err = handle(&ctx.state, &owner(), command(seeded.id)).await.unwrap_err();
        assert!(matches!(err, ActionError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_stranger_cannot_delete() {
        let ctx = TestContext::new();
        let seeded = ctx.seed_request(OWNER, "Mine").await;
        let err = handle(&ctx.state, &other(), command(seeded.id)).await.unwrap_err();
        assert!(matches!(err, ActionError::NotAuthorized(_)));
        assert!(ctx.stored(&seeded).await.is_some());
    }

    #[tokio::test]
    async fn test_missing_and_unknown_ids() {
        let ctx = TestContext::new();
        assert!(matches!(
            handle(&ctx.state, &owner(), command("")).await.unwrap_err(),
            ActionError::MissingId { .. }
        ));
        assert!(matches!(
            handle(&ctx.state, &owner(), command(Uuid::new_v4())).await.unwrap_err(),
            ActionError::NotFound { .. }
        ));
    }
}
