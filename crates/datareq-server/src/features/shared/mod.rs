//! Shared utilities and types for feature modules
//!
//! # Contents
//!
//! - **dictize**: entity to response conversion with catalog enrichment
//! - **pagination**: offset/limit windows over listed results
//! - **validation**: field rules, collected field errors, HTML escaping
//! - **validator**: payload validation that needs the store or the catalog
//! - **test_helpers**: in-memory fixtures (test-only)

pub mod dictize;
pub mod pagination;
pub mod validation;
pub mod validator;

#[cfg(test)]
pub mod test_helpers;

// Re-export commonly used types
pub use dictize::{
    apply_editable_fields, dictize_comment, dictize_datarequest, dictize_datarequests, dictize_vote,
    CommentResponse, DataRequestFields, DataRequestResponse, Enrichment, VoteResponse,
};
pub use pagination::{OffsetParams, PageMetadata};
pub use validation::{escape_html, ValidationErrors};
pub use validator::{CatalogValidator, ValidationError, Validator};

/// Parse an entity id, treating anything that is not a UUID as unknown
pub(crate) fn parse_id(entity: &'static str, raw: &str) -> Result<uuid::Uuid, crate::error::ActionError> {
    uuid::Uuid::parse_str(raw.trim()).map_err(|_| crate::error::ActionError::not_found(entity, raw))
}

/// Reject an empty identifier before anything else happens
pub(crate) fn require_id(entity: &'static str, raw: &str) -> Result<(), crate::error::ActionError> {
    if raw.trim().is_empty() {
        return Err(crate::error::ActionError::MissingId { entity });
    }
    Ok(())
}
