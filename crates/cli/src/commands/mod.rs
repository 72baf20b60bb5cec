pub mod decide;
pub mod inspect;
pub mod serve;
pub mod tools;

/// Result type shared by every command.
pub type CommandResult = Result<std::process::ExitCode, Box<dyn std::error::Error>>;
