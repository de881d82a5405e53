//! Show one data request, enriched with its owner, organization and
//! accepted dataset

use datareq_common::types::Caller;
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::access::{AccessTarget, Action};
use crate::cqrs::middleware::{authorize_query, Query};
use crate::error::{ActionError, ActionResult};
use crate::features::shared::{dictize_datarequest, parse_id, require_id, DataRequestResponse};
use crate::features::FeatureState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowDataRequestQuery {
    pub id: String,
}

impl Request<ActionResult<DataRequestResponse>> for ShowDataRequestQuery {}

impl Query for ShowDataRequestQuery {
    const ACTION: Action = Action::DataRequestShow;
}

#[tracing::instrument(skip(state, caller, query), fields(datarequest_id = %query.id))]
pub async fn handle(
    state: &FeatureState,
    caller: &Caller,
    query: ShowDataRequestQuery,
) -> ActionResult<DataRequestResponse> {
    require_id("Data Request", &query.id)?;
    state.store.init().await?;

    let id = parse_id("Data Request", &query.id)?;
    authorize_query::<ShowDataRequestQuery>(state.access.as_ref(), caller, AccessTarget::DataRequest(id)).await?;

    let request = state
        .store
        .get_datarequest(id)
        .await?
        .ok_or_else(|| ActionError::not_found("Data Request", id))?;

    Ok(dictize_datarequest(state.catalog.as_ref(), request).await)
}
