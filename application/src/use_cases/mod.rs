//! Use cases (application services)

pub mod send_turn;
pub mod session;
