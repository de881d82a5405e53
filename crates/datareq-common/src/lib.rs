//! Datareq Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared domain types, error handling and logging for the datareq workspace.
//!
//! # Overview
//!
//! - **Types**: the data request, comment and vote entities plus the caller
//!   identity every action receives explicitly
//! - **Error Handling**: common error and result types
//! - **Logging**: `tracing` subscriber setup shared by binaries
//!
//! # Example
//!
//! ```no_run
//! use datareq_common::types::{Caller, DataRequest};
//!
//! let caller = Caller::user("user-1");
//! let request = DataRequest::open("user-1", "Need traffic data");
//! assert_eq!(request.user_id, caller.user_id.unwrap_or_default());
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{DataReqError, Result};
