//! Comment API routes
//!
//! # Route Structure
//!
//! - `GET /api/v1/datarequests/:id/comments?sort=desc` - Whole thread of a request
//! - `POST /api/v1/datarequests/:id/comments` - Comment on a request
//! - `GET /api/v1/comments/:id` - Show one comment
//! - `PUT /api/v1/comments/:id` - Rewrite a comment
//! - `DELETE /api/v1/comments/:id` - Delete a comment

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use datareq_common::types::SortOrder;
use serde::Deserialize;

use super::commands::{CreateCommentCommand, DeleteCommentCommand, UpdateCommentCommand};
use super::queries::{ListCommentsQuery, ShowCommentQuery};
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::response::ApiResponse;
use crate::error::ActionError;
use crate::features::FeatureState;
use crate::middleware::CallerIdentity;

/// Routes nested under `/datarequests`
pub fn datarequest_comments_routes() -> Router<FeatureState> {
    Router::new().route("/:id/comments", get(list_comments).post(create_comment))
}

/// Routes nested under `/comments`
pub fn comments_routes() -> Router<FeatureState> {
    Router::new().route(
        "/:id",
        get(show_comment).put(update_comment).delete(delete_comment),
    )
}

#[derive(Debug, Deserialize)]
struct SortParams {
    #[serde(default)]
    sort: Option<SortOrder>,
}

#[derive(Debug, Deserialize)]
struct CommentBody {
    comment: String,
}

/// `POST /api/v1/datarequests/:id/comments`
///
/// Body: `{"comment": "..."}`
#[tracing::instrument(skip(state, caller, body), fields(datarequest_id = %datarequest_id))]
async fn create_comment(
    State(state): State<FeatureState>,
    CallerIdentity(caller): CallerIdentity,
    Path(datarequest_id): Path<String>,
    ApiJson(body): ApiJson<CommentBody>,
) -> Result<Response, ActionError> {
    let command = CreateCommentCommand {
        datarequest_id,
        comment: body.comment,
    };

    let response = super::commands::create::handle(&state, &caller, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, caller, body), fields(comment_id = %id))]
async fn update_comment(
    State(state): State<FeatureState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<CommentBody>,
) -> Result<Response, ActionError> {
    let command = UpdateCommentCommand {
        id,
        comment: body.comment,
    };

    let response = super::commands::update::handle(&state, &caller, command).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, caller), fields(comment_id = %id))]
async fn delete_comment(
    State(state): State<FeatureState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<String>,
) -> Result<Response, ActionError> {
    let response =
        super::commands::delete::handle(&state, &caller, DeleteCommentCommand { id }).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, caller), fields(comment_id = %id))]
async fn show_comment(
    State(state): State<FeatureState>,
    CallerIdentity(caller): CallerIdentity,
    Path(id): Path<String>,
) -> Result<Response, ActionError> {
    let response = super::queries::show::handle(&state, &caller, ShowCommentQuery { id }).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// `GET /api/v1/datarequests/:id/comments`
#[tracing::instrument(skip(state, caller, params), fields(datarequest_id = %datarequest_id))]
async fn list_comments(
    State(state): State<FeatureState>,
    CallerIdentity(caller): CallerIdentity,
    Path(datarequest_id): Path<String>,
    ApiQuery(params): ApiQuery<SortParams>,
) -> Result<Response, ActionError> {
    let query = ListCommentsQuery {
        datarequest_id,
        sort: params.sort,
    };

    let response = super::queries::list::handle(&state, &caller, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}
