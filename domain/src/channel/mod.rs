//! Backend channel domain
//!
//! A channel is one independent asynchronous backend (the dialogue
//! `Response` channel or the NLU `Understanding` channel).
//!
//! - [`kind::ChannelKind`] - channel identity and its fixed merge position
//! - [`config::ChannelConfig`] - immutable transport configuration
//! - [`lifecycle::LifecycleState`] - configure → build → start → stop → release

pub mod config;
pub mod kind;
pub mod lifecycle;
