//! Request extractors that reject with the error envelope
//!
//! A malformed query string or JSON body becomes an
//! [`ActionError::InvalidRequest`] instead of axum's plain-text rejection.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ActionError;

/// JSON body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ActionError))]
pub struct ApiJson<T>(pub T);

/// Query string
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ActionError))]
pub struct ApiQuery<T>(pub T);
