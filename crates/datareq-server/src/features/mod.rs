//! Feature modules implementing the data request API
//!
//! Each feature is a vertical slice following the CQRS split: commands
//! mutate, queries read, and `routes.rs` maps HTTP onto both.
//!
//! # Features
//!
//! - **datarequests**: create, show, update, delete, close and the faceted index
//! - **comments**: comment threads attached to a request
//! - **votes**: up/down votes on a request
//!
//! # Handler shape
//!
//! Every handler is `handle(&FeatureState, &Caller, input)` and runs the same
//! steps: required id, storage init, access check, lookup, validation,
//! mutation in one transaction, dictization.

pub mod comments;
pub mod datarequests;
pub mod shared;
pub mod votes;

use std::sync::Arc;

use axum::{extract::FromRef, Router};

use crate::access::AccessPolicy;
use crate::catalog::CatalogLookup;
use crate::config::CallerConfig;
use crate::features::shared::validator::Validator;
use crate::store::DataRequestStore;

/// Default number of requests per index page
pub const DATAREQUESTS_PER_PAGE: usize = 10;

/// Collaborators shared by every handler
#[derive(Clone)]
pub struct FeatureState {
    pub store: Arc<dyn DataRequestStore>,
    pub access: Arc<dyn AccessPolicy>,
    pub validator: Arc<dyn Validator>,
    pub catalog: Arc<dyn CatalogLookup>,
    /// Index page size when the caller gives no limit
    pub page_size: usize,
    pub callers: CallerConfig,
}

impl FromRef<FeatureState> for CallerConfig {
    fn from_ref(state: &FeatureState) -> Self {
        state.callers.clone()
    }
}

/// Creates the API router with all feature routes mounted
///
/// - `/datarequests` - requests, plus their comments and votes
/// - `/comments` - single comments by id
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest(
            "/datarequests",
            datarequests::datarequests_routes()
                .merge(comments::datarequest_comments_routes())
                .merge(votes::votes_routes()),
        )
        .nest("/comments", comments::comments_routes())
        .with_state(state)
}
