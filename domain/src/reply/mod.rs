//! Message shapes exchanged with channels
//!
//! - [`entities::OutboundMessage`] - one user turn sent to every active channel
//! - [`entities::BotReply`] - one inbound push from a channel
//! - [`nlp::NlpAnnotation`] - structured understanding block carried by a reply

pub mod entities;
pub mod nlp;
