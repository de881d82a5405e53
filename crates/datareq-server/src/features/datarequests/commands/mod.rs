pub mod close;
pub mod create;
pub mod delete;
pub mod update;

pub use close::CloseDataRequestCommand;
pub use create::CreateDataRequestCommand;
pub use delete::DeleteDataRequestCommand;
pub use update::UpdateDataRequestCommand;
