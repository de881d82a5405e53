//! Domain validation of action payloads
//!
//! Rules that need the store or the catalog (title uniqueness, references to
//! organizations and datasets, parent requests) live behind [`Validator`] so
//! handlers stay oblivious to where the answers come from.

use std::sync::Arc;

use async_trait::async_trait;
use datareq_common::types::parse_vote;
use thiserror::Error;
use uuid::Uuid;

use super::dictize::DataRequestFields;
use super::validation::{
    validate_text, ValidationErrors, COMMENT_MAX_LENGTH, DESCRIPTION_MAX_LENGTH, TITLE_MAX_LENGTH,
};
use crate::catalog::{CatalogError, CatalogLookup};
use crate::store::{DataRequestStore, StoreError};

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Validation failed: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("Validation could not read the store: {0}")]
    Store(#[from] StoreError),

    #[error("Validation could not reach the catalog: {0}")]
    Catalog(#[from] CatalogError),
}

#[async_trait]
pub trait Validator: Send + Sync {
    /// Create and update payloads
    ///
    /// `current` is the request being updated; a title held by that same
    /// request does not count as taken. On success the payload comes back
    /// with the organization replaced by its catalog id.
    async fn validate_datarequest(
        &self,
        fields: &DataRequestFields,
        current: Option<Uuid>,
    ) -> Result<DataRequestFields, ValidationError>;

    async fn validate_close(&self, accepted_dataset_id: Option<&str>) -> Result<(), ValidationError>;

    async fn validate_comment(&self, datarequest_id: &str, comment: &str) -> Result<(), ValidationError>;

    async fn validate_vote(&self, datarequest_id: &str, vote: i64) -> Result<(), ValidationError>;
}

/// Validator backed by the request store and the catalog
pub struct CatalogValidator {
    store: Arc<dyn DataRequestStore>,
    catalog: Arc<dyn CatalogLookup>,
}

impl CatalogValidator {
    pub fn new(store: Arc<dyn DataRequestStore>, catalog: Arc<dyn CatalogLookup>) -> Self {
        Self { store, catalog }
    }

    async fn check_parent(&self, errors: &mut ValidationErrors, datarequest_id: &str) -> Result<(), StoreError> {
        let exists = match Uuid::parse_str(datarequest_id) {
            Ok(id) => self.store.get_datarequest(id).await?.is_some(),
            Err(_) => false,
        };
        if !exists {
            errors.add("datarequest_id", format!("Data Request not found: {}", datarequest_id));
        }
        Ok(())
    }
}

#[async_trait]
impl Validator for CatalogValidator {
    #[tracing::instrument(skip(self, payload), fields(title = %payload.title, current = ?current))]
    async fn validate_datarequest(
        &self,
        payload: &DataRequestFields,
        current: Option<Uuid>,
    ) -> Result<DataRequestFields, ValidationError> {
        let mut errors = ValidationErrors::new();
        let mut normalized = payload.clone();

        match validate_text(&payload.title, TITLE_MAX_LENGTH, true) {
            Err(e) => errors.add("title", e.to_string()),
            Ok(()) => {
                let holder = self.store.find_datarequest_by_title(&payload.title).await?;
                if holder.is_some_and(|existing| Some(existing.id) != current) {
                    errors.add("title", "That title is already in use");
                }
            }
        }

        if let Some(ref description) = payload.description {
            if let Err(e) = validate_text(description, DESCRIPTION_MAX_LENGTH, false) {
                errors.add("description", e.to_string());
            }
        }

        if let Some(org) = payload.organization_id.as_deref().filter(|o| !o.is_empty()) {
            match self.catalog.get_organization(org).await {
                Ok(found) => normalized.organization_id = Some(found.id),
                Err(e) if e.is_not_found() => {
                    errors.add("organization_id", format!("Organization '{}' not found", org));
                }
                Err(e) => return Err(e.into()),
            }
        }

        errors.into_result()?;
        tracing::debug!("Data request payload is valid");
        Ok(normalized)
    }

    async fn validate_close(&self, accepted_dataset_id: Option<&str>) -> Result<(), ValidationError> {
        let Some(dataset) = accepted_dataset_id.filter(|d| !d.is_empty()) else {
            return Ok(());
        };

        match self.catalog.get_package(dataset).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Err(ValidationErrors::single(
                "accepted_dataset_id",
                format!("Dataset '{}' not found", dataset),
            )
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    async fn validate_comment(&self, datarequest_id: &str, comment: &str) -> Result<(), ValidationError> {
        let mut errors = ValidationErrors::new();
        self.check_parent(&mut errors, datarequest_id).await?;
        if let Err(e) = validate_text(comment, COMMENT_MAX_LENGTH, true) {
            errors.add("comment", e.to_string());
        }
        errors.into_result()?;
        Ok(())
    }

    async fn validate_vote(&self, datarequest_id: &str, vote: i64) -> Result<(), ValidationError> {
        let mut errors = ValidationErrors::new();
        self.check_parent(&mut errors, datarequest_id).await?;
        if let Err(e) = parse_vote(vote) {
            errors.add("vote", e.to_string());
        }
        errors.into_result()?;
        Ok(())
    }
}
