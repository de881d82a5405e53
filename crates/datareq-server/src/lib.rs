//! Data Request Server Library
//!
//! HTTP service that lets catalog users ask for datasets they need, discuss
//! those requests and vote on them.
//!
//! # Architecture
//!
//! The server follows a **CQRS** split inside vertical feature slices:
//!
//! - **Commands** (write operations): create, update, delete and close
//!   requests; create, update and delete comments; create votes
//! - **Queries** (read operations): show and index requests, show and list
//!   comments
//!
//! Every handler receives the caller explicitly and talks to its
//! collaborators through traits:
//!
//! - [`store::DataRequestStore`]: persistence (PostgreSQL or in-memory)
//! - [`access::AccessPolicy`]: who may run which action
//! - [`features::shared::Validator`]: payload rules
//! - [`catalog::CatalogLookup`]: users, organizations and datasets
//!
//! ## Framework Stack
//!
//! - **Axum**: HTTP routing and extractors
//! - **SQLx**: PostgreSQL access and embedded migrations
//! - **Tower**: Middleware and service abstractions
//! - **Reqwest**: Catalog API client
//!
//! # Example
//!
//! ```no_run
//! use datareq_server::{api, config::Config};
//!
//! # fn state() -> datareq_server::features::FeatureState { unimplemented!() }
//! let config = Config::default();
//! let app = api::create_router(state(), &config.cors);
//! ```

pub mod access;
pub mod api;
pub mod catalog;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use error::{ActionError, ActionResult};
