//! Vote API routes
//!
//! - `POST /api/v1/datarequests/:id/votes` - Body `{"vote": 1}` or `{"vote": -1}`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use super::commands::CreateVoteCommand;
use crate::api::extract::ApiJson;
use crate::api::response::ApiResponse;
use crate::error::ActionError;
use crate::features::FeatureState;
use crate::middleware::CallerIdentity;

/// Routes nested under `/datarequests`
pub fn votes_routes() -> Router<FeatureState> {
    Router::new().route("/:id/votes", post(create_vote))
}

#[derive(Debug, Deserialize)]
struct VoteBody {
    vote: i64,
}

#[tracing::instrument(skip(state, caller, body), fields(datarequest_id = %datarequest_id))]
async fn create_vote(
    State(state): State<FeatureState>,
    CallerIdentity(caller): CallerIdentity,
    Path(datarequest_id): Path<String>,
    ApiJson(body): ApiJson<VoteBody>,
) -> Result<Response, ActionError> {
    let command = CreateVoteCommand {
        datarequest_id,
        vote: body.vote,
    };

    let response = super::commands::create::handle(&state, &caller, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}
