//! Turn orchestration domain
//!
//! The pure parts of a turn: which channels a [`mode::Mode`] activates, the
//! [`turn::TurnPhase`] state machine, and the [`merge::merge`] rule that
//! folds per-channel replies into one [`value_objects::CombinedResponse`].

pub mod merge;
pub mod mode;
pub mod turn;
pub mod value_objects;
