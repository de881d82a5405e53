//! Command/query split for the action layer
//!
//! Commands mutate state, queries read it. Both kinds carry the [`Action`]
//! they are gated by, so handlers authorize through one code path. Each one
//! is also a `mediator::Request` over the `ActionResult` its handler returns.
//!
//! [`Action`]: crate::access::Action

pub mod middleware;

pub use middleware::{authorize_command, authorize_query, Command, Query};
