//! Data request index
//!
//! Filters, facets and one page of results. Organization and user filters
//! accept either ids or names; both are resolved through the catalog before
//! the store is queried.

use datareq_common::types::{Caller, SortOrder};
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::access::{AccessTarget, Action};
use crate::catalog::CatalogError;
use crate::cqrs::middleware::{authorize_query, Query};
use crate::error::{ActionError, ActionResult};
use crate::features::datarequests::facets::{build_facets, FacetCounts, Facets};
use crate::features::shared::{dictize_datarequests, DataRequestResponse, OffsetParams, PageMetadata};
use crate::features::FeatureState;
use crate::store::DataRequestFilter;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListDataRequestsQuery {
    /// Organization id or name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    /// Owner id or name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,

    /// Free text matched against title and description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Request<ActionResult<ListDataRequestsResponse>> for ListDataRequestsQuery {}

impl Query for ListDataRequestsQuery {
    const ACTION: Action = Action::DataRequestIndex;
}

impl ListDataRequestsQuery {
    pub fn page(&self) -> OffsetParams {
        OffsetParams::new(self.offset, self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListDataRequestsResponse {
    /// Size of the whole matching set, not of this page
    pub count: usize,
    pub result: Vec<DataRequestResponse>,
    pub facets: Facets,
}

impl ListDataRequestsResponse {
    pub fn metadata(&self, page: OffsetParams, default_limit: usize) -> PageMetadata {
        page.metadata(self.count, default_limit)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn resolve_error(entity: &'static str, raw: &str, err: CatalogError) -> ActionError {
    if err.is_not_found() {
        ActionError::not_found(entity, raw)
    } else {
        ActionError::Catalog(err)
    }
}

#[tracing::instrument(skip(state, caller, query), fields(organization = ?query.organization_id, user = ?query.user_id))]
pub async fn handle(
    state: &FeatureState,
    caller: &Caller,
    query: ListDataRequestsQuery,
) -> ActionResult<ListDataRequestsResponse> {
    state.store.init().await?;
    authorize_query::<ListDataRequestsQuery>(state.access.as_ref(), caller, AccessTarget::Collection).await?;

    let mut filter = DataRequestFilter {
        closed: query.closed,
        q: non_blank(&query.q).map(str::to_string),
        sort: query.sort.unwrap_or_default(),
        ..Default::default()
    };

    if let Some(raw) = non_blank(&query.organization_id) {
        let org = state
            .catalog
            .get_organization(raw)
            .await
            .map_err(|e| resolve_error("Organization", raw, e))?;
        filter.organization_id = Some(org.id);
    }

    if let Some(raw) = non_blank(&query.user_id) {
        let user = state
            .catalog
            .get_user(raw)
            .await
            .map_err(|e| resolve_error("User", raw, e))?;
        filter.user_id = Some(user.id);
    }

    let matching = state.store.list_datarequests(&filter).await?;
    let facets = build_facets(state.catalog.as_ref(), &FacetCounts::tally(&matching)).await;

    let page = query.page();
    let window = page.window(matching.len(), state.page_size);
    let count = matching.len();
    let result = dictize_datarequests(
        state.catalog.as_ref(),
        matching.into_iter().skip(window.start).take(window.len()),
    )
    .await;

    tracing::debug!(count, returned = result.len(), "Listed data requests");

    Ok(ListDataRequestsResponse { count, result, facets })
}
