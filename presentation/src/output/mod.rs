//! Output formatting and printing

pub mod console;
pub mod formatter;
