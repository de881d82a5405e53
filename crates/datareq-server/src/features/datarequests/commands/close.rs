//! Close data request command
//!
//! One-way transition from open to closed. An optional accepted dataset is
//! recorded as the answer to the request. Closing twice is a conflict no
//! matter what the second payload says.

use chrono::Utc;
use datareq_common::types::Caller;
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::access::{AccessTarget, Action};
use crate::cqrs::middleware::{authorize_command, Command};
use crate::error::{ActionError, ActionResult};
use crate::features::shared::{dictize_datarequest, parse_id, require_id, DataRequestResponse};
use crate::features::FeatureState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseDataRequestCommand {
    /// Taken from the path
    #[serde(default)]
    pub id: String,

    /// Dataset id or name that fulfils the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_dataset_id: Option<String>,
}

impl Request<ActionResult<DataRequestResponse>> for CloseDataRequestCommand {}

impl Command for CloseDataRequestCommand {
    const ACTION: Action = Action::DataRequestClose;
}

#[tracing::instrument(
    skip(state, caller, command),
    fields(datarequest_id = %command.id, accepted_dataset_id = ?command.accepted_dataset_id)
)]
pub async fn handle(
    state: &FeatureState,
    caller: &Caller,
    command: CloseDataRequestCommand,
) -> ActionResult<DataRequestResponse> {
    require_id("Data Request", &command.id)?;
    state.store.init().await?;

    let id = parse_id("Data Request", &command.id)?;
    authorize_command::<CloseDataRequestCommand>(state.access.as_ref(), caller, AccessTarget::DataRequest(id))
        .await?;

    let mut request = state
        .store
        .get_datarequest(id)
        .await?
        .ok_or_else(|| ActionError::not_found("Data Request", id))?;

    if request.closed {
        return Err(ActionError::AlreadyClosed(id));
    }

    state
        .validator
        .validate_close(command.accepted_dataset_id.as_deref())
        .await?;

    request.close(command.accepted_dataset_id, Utc::now())?;
    state.store.update_datarequest(&request).await?;

    tracing::info!("Data request closed");

    Ok(dictize_datarequest(state.catalog.as_ref(), request).await)
}
