pub mod args;
pub mod keys;
pub mod meeting;

pub use args::{Cli, CliCommand};
pub use keys::handle_keys_command;
pub use meeting::handle_meeting_command;
