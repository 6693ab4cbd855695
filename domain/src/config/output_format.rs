//! Output format value object

use serde::{Deserialize, Serialize};

/// How deliveries are rendered by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable console output (default)
    #[default]
    Text,
    /// One JSON object per delivery
    Json,
}
