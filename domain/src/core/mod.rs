//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] - configuration, lifecycle and correlation errors

pub mod error;
