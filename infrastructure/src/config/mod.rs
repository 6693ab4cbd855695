//! Configuration file loading for rasa-bridge
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `RASA_BRIDGE_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./rasa-bridge.toml` or `./.rasa-bridge.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/rasa-bridge/config.toml`
//! 5. Default values
//!
//! Command-line flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileEndpointConfig, FileLoggingConfig, FileOutputConfig, FileSessionConfig,
};
pub use loader::ConfigLoader;
