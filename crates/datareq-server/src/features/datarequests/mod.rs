pub mod commands;
pub mod facets;
pub mod queries;
pub mod routes;

pub use commands::{
    CloseDataRequestCommand, CreateDataRequestCommand, DeleteDataRequestCommand,
    UpdateDataRequestCommand,
};
pub use facets::{FacetGroup, FacetItem, Facets};
pub use queries::{ListDataRequestsQuery, ListDataRequestsResponse, ShowDataRequestQuery};

pub use routes::datarequests_routes;
