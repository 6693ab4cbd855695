//! Configuration issues.
//!
//! Config loading never aborts on the first problem: every detected issue is
//! collected with a severity so the driver can print warnings and stop only
//! on errors.
//!
//! # Examples
//!
//! ```
//! use rasa_bridge_domain::config::validation::{ConfigIssue, Severity};
//!
//! let issues: Vec<ConfigIssue> = Vec::new();
//! assert!(!ConfigIssue::has_errors(&issues));
//! ```

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// No endpoint URL configured.
    MissingEndpoint,
    /// A string field does not parse into its enum.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A timeout of zero would fail every request.
    ZeroTimeout,
    /// Both a query token and a JWT are set; both are sent.
    DuplicateAuth,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Check whether any issues are errors (i.e. fatal).
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}
