//! Response correlation and spillover buffering.

pub mod correlator;

pub use correlator::{PendingCorrelation, PushOutcome, PushSink, ResponseCorrelator};
