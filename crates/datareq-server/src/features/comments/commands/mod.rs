pub mod create;
pub mod delete;
pub mod update;

pub use create::CreateCommentCommand;
pub use delete::DeleteCommentCommand;
pub use update::UpdateCommentCommand;
