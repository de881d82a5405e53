//! Data request API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/datarequests` - Open a new data request
//! - `GET /api/v1/datarequests` - Index with filters, facets and pagination
//! - `GET /api/v1/datarequests/:id` - Show one request
//! - `PUT /api/v1/datarequests/:id` - Update title, description, organization
//! - `DELETE /api/v1/datarequests/:id` - Delete a request with its comments and votes
//! - `POST /api/v1/datarequests/:id/close` - Close a request
//!
//! The caller is taken from the `X-Catalog-User` and `X-Catalog-Sysadmin`
//! headers; see [`CallerIdentity`].

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::commands::{
    CloseDataRequestCommand, CreateDataRequestCommand, DeleteDataRequestCommand,
    UpdateDataRequestCommand,
};
use super::queries::{ListDataRequestsQuery, ShowDataRequestQuery};
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::response::ApiResponse;
use crate::error::ActionError;
use crate::features::FeatureState;
use crate::middleware::CallerIdentity;

pub fn datarequests_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(create_datarequest).get(list_datarequests))
        .route(
            "/:id",
            get(show_datarequest)
                .put(update_datarequest)
                .delete(delete_datarequest),
        )
        .route("/:id/close", post(close_datarequest))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// `POST /api/v1/datarequests`
///
/// - `201 Created` - Request opened
/// - `401 Unauthorized` - Anonymous caller
/// - `422 Unprocessable Entity` - Field errors in `error.details`
#[tracing::instrument(skip(state, caller, command))]
async fn create_datarequest(
    State(state): State<FeatureState>,
    CallerIdentity(caller): CallerIdentity,
    ApiJson(command): ApiJson<CreateDataRequestCommand>,
) -> Result<Response, ActionError> {
    let response = super::commands::create::handle(&state, &caller, command).await?;

    tracing::info!(datarequest_id = %response.id, "Data request created via API");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

/// `PUT /api/v1/datarequests/:id`
#[tracing::instrument(skip(state, caller, command), fields(datarequest_id = %id))]
async fn update_datarequest(
    State(state): State<FeatureState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<String>,
    ApiJson(mut command): ApiJson<UpdateDataRequestCommand>,
) -> Result<Response, ActionError> {
    command.id = id;

    let response = super::commands::update::handle(&state, &caller, command).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// `DELETE /api/v1/datarequests/:id`
///
/// Answers with the request as it was before deletion.
#[tracing::instrument(skip(state, caller), fields(datarequest_id = %id))]
async fn delete_datarequest(
    State(state): State<FeatureState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<String>,
) -> Result<Response, ActionError> {
    let command = DeleteDataRequestCommand { id };

    let response = super::commands::delete::handle(&state, &caller, command).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// `POST /api/v1/datarequests/:id/close`
///
/// Body is optional: `{"accepted_dataset_id": "..."}`.
///
/// - `409 Conflict` - Request is already closed
#[tracing::instrument(skip(state, caller, command), fields(datarequest_id = %id))]
async fn close_datarequest(
    State(state): State<FeatureState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<String>,
    command: Option<Json<CloseDataRequestCommand>>,
) -> Result<Response, ActionError> {
    let mut command = command.map(|Json(c)| c).unwrap_or(CloseDataRequestCommand {
        id: String::new(),
        accepted_dataset_id: None,
    });
    command.id = id;

    let response = super::commands::close::handle(&state, &caller, command).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// `GET /api/v1/datarequests/:id`
#[tracing::instrument(skip(state, caller), fields(datarequest_id = %id))]
async fn show_datarequest(
    State(state): State<FeatureState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<String>,
) -> Result<Response, ActionError> {
    let query = ShowDataRequestQuery { id };

    let response = super::queries::show::handle(&state, &caller, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// `GET /api/v1/datarequests?organization_id=council&closed=false&sort=desc&offset=0&limit=10`
///
/// `data` holds `{count, result, facets}`; `meta.pagination` describes the
/// window that was returned.
#[tracing::instrument(skip(state, caller, query), fields(offset = ?query.offset, limit = ?query.limit))]
async fn list_datarequests(
    State(state): State<FeatureState>,
    CallerIdentity(caller): CallerIdentity,
    ApiQuery(query): ApiQuery<ListDataRequestsQuery>,
) -> Result<Response, ActionError> {
    let page = query.page();
    let response = super::queries::list::handle(&state, &caller, query).await?;

    tracing::debug!(
        count = response.count,
        returned = response.result.len(),
        "Data requests listed via API"
    );

    let meta = json!({
        "pagination": response.metadata(page, state.page_size)
    });

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(response, meta))).into_response())
}
