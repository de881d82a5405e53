pub mod list;
pub mod show;

pub use list::{ListDataRequestsQuery, ListDataRequestsResponse};
pub use show::ShowDataRequestQuery;
