//! Facet aggregation for the data request index
//!
//! Facets are counted over the whole filtered set before the page is cut,
//! so they describe everything that matched rather than what is on screen.

use datareq_common::types::{DataRequest, RequestState};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogLookup;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetItem {
    pub name: String,
    pub display_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetGroup {
    pub items: Vec<FacetItem>,
}

/// Facet categories; a category without items is left out entirely
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<FacetGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<FacetGroup>,
}

/// Raw counts before organizations are resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetCounts {
    /// Organization id and count, in order of first appearance
    pub organizations: Vec<(String, usize)>,
    pub open: usize,
    pub closed: usize,
}

impl FacetCounts {
    pub fn tally(requests: &[DataRequest]) -> Self {
        let mut counts = FacetCounts::default();
        for request in requests {
            if let Some(org) = request.organization_id.as_deref().filter(|o| !o.is_empty()) {
                match counts.organizations.iter_mut().find(|(id, _)| id == org) {
                    Some((_, n)) => *n += 1,
                    None => counts.organizations.push((org.to_string(), 1)),
                }
            }
            match request.state() {
                RequestState::Open => counts.open += 1,
                RequestState::Closed => counts.closed += 1,
            }
        }
        counts
    }

    fn state_items(&self) -> Vec<FacetItem> {
        [(RequestState::Open, self.open), (RequestState::Closed, self.closed)]
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(state, count)| FacetItem {
                name: state.name().to_string(),
                display_name: state.display_name().to_string(),
                count,
            })
            .collect()
    }
}

fn group(items: Vec<FacetItem>) -> Option<FacetGroup> {
    if items.is_empty() {
        None
    } else {
        Some(FacetGroup { items })
    }
}

/// Resolve organization ids for display and assemble the facet groups
///
/// Organizations the catalog cannot resolve are dropped from the facet.
pub async fn build_facets(catalog: &dyn CatalogLookup, counts: &FacetCounts) -> Facets {
    let mut organization_items = Vec::with_capacity(counts.organizations.len());
    for (id, count) in &counts.organizations {
        match catalog.get_organization(id).await {
            Ok(org) => organization_items.push(FacetItem {
                display_name: org.label().to_string(),
                name: org.name,
                count: *count,
            }),
            Err(e) => {
                tracing::debug!(organization_id = %id, error = %e, "Dropping unresolvable organization facet");
            }
        }
    }

    Facets {
        organization: group(organization_items),
        state: group(counts.state_items()),
    }
}
