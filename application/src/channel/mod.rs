//! Backend channels owned by a session.

pub mod handle;

pub use handle::{ChannelError, ChannelHandle};
