//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for deliveries
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// One JSON object per delivery
    Json,
}

impl From<OutputFormat> for rasa_bridge_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => rasa_bridge_domain::OutputFormat::Text,
            OutputFormat::Json => rasa_bridge_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for rasa-bridge
#[derive(Parser, Debug)]
#[command(name = "rasa-bridge")]
#[command(author, version, about = "Send test turns to a Rasa server and see the merged reply")]
#[command(long_about = r#"
rasa-bridge sends each message to the Rasa dialogue endpoint and/or the NLU
parse endpoint and prints one merged reply per message.

Modes:
  both                 dialogue + NLU, merged (default; alias dialog_and_nlu)
  response_only        dialogue only (alias rest_input)
  understanding_only   NLU only (alias nlu_input)

Extra messages a bot sends for one turn are printed after the turn's reply.

Configuration is loaded from (in priority order):
1. Command-line flags
2. RASA_BRIDGE_<SECTION>__<KEY> environment variables
3. --config <path>          Explicit config file
4. ./rasa-bridge.toml       Project-level config
5. ~/.config/rasa-bridge/config.toml   Global config

Example:
  rasa-bridge --endpoint http://localhost:5005 "hello" "book a flight"
  rasa-bridge --mode nlu_input --output json "I want to fly to Paris"
  rasa-bridge --chat
"#)]
pub struct Cli {
    /// Messages to send, one turn each (not required in chat mode)
    pub messages: Vec<String>,

    /// Read messages line by line from standard input
    #[arg(short, long)]
    pub chat: bool,

    /// Channels to use: both, response_only or understanding_only
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Base URL of the Rasa server
    #[arg(short, long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Token sent as `?token=` query parameter
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// JWT sent as `Authorization: Bearer` header
    #[arg(long, value_name = "JWT")]
    pub jwt: Option<String>,

    /// Conversation id (generated when omitted)
    #[arg(long, value_name = "ID")]
    pub sender: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// How long to wait for a turn's replies, in seconds (defaults to the request timeout)
    #[arg(long, value_name = "SECONDS")]
    pub wait: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write a JSONL transcript of every turn
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Write diagnostics to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}
