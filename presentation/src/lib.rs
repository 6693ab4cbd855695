//! Presentation layer for rasa-bridge
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive chat loop.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, ProgressMode, RunError, TurnRunner};
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::{ConsoleFormatter, ConsolePrinter};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
