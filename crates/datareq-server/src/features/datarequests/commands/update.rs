//! Update data request command
//!
//! Only title, description and organization change. Owner, timestamps and
//! closing state stay as they are, whether the request is open or closed.

use datareq_common::types::Caller;
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::access::{AccessTarget, Action};
use crate::cqrs::middleware::{authorize_command, Command};
use crate::error::{ActionError, ActionResult};
use crate::features::shared::{
    apply_editable_fields, dictize_datarequest, parse_id, require_id, DataRequestFields,
    DataRequestResponse,
};
use crate::features::FeatureState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDataRequestCommand {
    /// Taken from the path
    #[serde(default)]
    pub id: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
}

impl Request<ActionResult<DataRequestResponse>> for UpdateDataRequestCommand {}

impl Command for UpdateDataRequestCommand {
    const ACTION: Action = Action::DataRequestUpdate;
}

impl UpdateDataRequestCommand {
    fn fields(&self) -> DataRequestFields {
        DataRequestFields {
            title: self.title.clone(),
            description: self.description.clone(),
            organization_id: self.organization_id.clone(),
        }
    }
}

#[tracing::instrument(skip(state, caller, command), fields(datarequest_id = %command.id))]
pub async fn handle(
    state: &FeatureState,
    caller: &Caller,
    command: UpdateDataRequestCommand,
) -> ActionResult<DataRequestResponse> {
    require_id("Data Request", &command.id)?;
    state.store.init().await?;

    let id = parse_id("Data Request", &command.id)?;
    authorize_command::<UpdateDataRequestCommand>(state.access.as_ref(), caller, AccessTarget::DataRequest(id))
        .await?;

    let mut request = state
        .store
        .get_datarequest(id)
        .await?
        .ok_or_else(|| ActionError::not_found("Data Request", id))?;

    // The request may keep its own title, in any casing
    let fields = state
        .validator
        .validate_datarequest(&command.fields(), Some(request.id))
        .await?;

    apply_editable_fields(&mut request, &fields);
    state.store.update_datarequest(&request).await?;

    tracing::info!("Data request updated");

    Ok(dictize_datarequest(state.catalog.as_ref(), request).await)
}
