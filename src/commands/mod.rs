pub mod analyze;
pub mod fetch;

// Shared command result type
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

pub use analyze::AnalyzeCommand;
