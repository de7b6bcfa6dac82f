//! Command handlers for the Yellow CLI.

pub mod ask;
pub mod prompts;

pub use ask::AskCommand;
pub use prompts::PromptsCommand;
