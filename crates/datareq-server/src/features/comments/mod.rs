//! Comment threads on data requests
//!
//! Comments have no lifecycle of their own: they exist until deleted,
//! directly or together with their request. Bodies are HTML-escaped before
//! they are stored.

pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{CreateCommentCommand, DeleteCommentCommand, UpdateCommentCommand};
pub use queries::{ListCommentsQuery, ShowCommentQuery};

pub use routes::{comments_routes, datarequest_comments_routes};
