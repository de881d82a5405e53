//! Fixed in-process catalog
//!
//! Backs tests and local runs without a catalog instance. Entities resolve
//! by id or by name.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::{
    CatalogError, CatalogLookup, CatalogResult, DatasetSummary, OrganizationSummary, UserSummary,
};

#[derive(Debug, Default)]
pub struct StaticCatalog {
    users: Vec<UserSummary>,
    organizations: Vec<OrganizationSummary>,
    datasets: Vec<DatasetSummary>,
    broken: HashSet<String>,
    user_lookups: Arc<AtomicUsize>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: &str, name: &str) -> Self {
        self.users.push(UserSummary {
            id: id.to_string(),
            name: name.to_string(),
            display_name: None,
        });
        self
    }

    pub fn with_organization(mut self, id: &str, name: &str, display_name: Option<&str>) -> Self {
        self.organizations.push(OrganizationSummary {
            id: id.to_string(),
            name: name.to_string(),
            display_name: display_name.map(str::to_string),
            title: None,
        });
        self
    }

    pub fn with_dataset(mut self, id: &str, name: &str) -> Self {
        self.datasets.push(DatasetSummary {
            id: id.to_string(),
            name: name.to_string(),
            title: None,
        });
        self
    }

    /// Any lookup for `id` fails as if the catalog were down
    pub fn with_unavailable(mut self, id: &str) -> Self {
        self.broken.insert(id.to_string());
        self
    }

    /// Counter of `get_user` calls that reached this catalog
    pub fn user_lookups(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.user_lookups)
    }

    fn check_available(&self, id: &str) -> CatalogResult<()> {
        if self.broken.contains(id) {
            return Err(CatalogError::Unavailable(format!("lookup of '{}' failed", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogLookup for StaticCatalog {
    async fn get_user(&self, id_or_name: &str) -> CatalogResult<UserSummary> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available(id_or_name)?;
        self.users
            .iter()
            .find(|u| u.id == id_or_name || u.name == id_or_name)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("User", id_or_name))
    }

    async fn get_organization(&self, id_or_name: &str) -> CatalogResult<OrganizationSummary> {
        self.check_available(id_or_name)?;
        self.organizations
            .iter()
            .find(|o| o.id == id_or_name || o.name == id_or_name)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("Organization", id_or_name))
    }

    async fn get_package(&self, id_or_name: &str) -> CatalogResult<DatasetSummary> {
        self.check_available(id_or_name)?;
        self.datasets
            .iter()
            .find(|d| d.id == id_or_name || d.name == id_or_name)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("Dataset", id_or_name))
    }
}
