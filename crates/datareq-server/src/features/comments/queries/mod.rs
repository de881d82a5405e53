pub mod list;
pub mod show;

pub use list::ListCommentsQuery;
pub use show::ShowCommentQuery;
