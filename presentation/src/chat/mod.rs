//! Interactive chat module
//!
//! Runs turns from positional messages or from standard input lines.

mod repl;
mod runner;

pub use repl::ChatRepl;
pub use runner::{ProgressMode, RunError, TurnRunner};
