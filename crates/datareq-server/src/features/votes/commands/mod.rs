pub mod create;

pub use create::CreateVoteCommand;
