//! Up and down votes on data requests
//!
//! Votes are only ever created; a user may vote more than once.

pub mod commands;
pub mod routes;

pub use commands::CreateVoteCommand;

pub use routes::votes_routes;
