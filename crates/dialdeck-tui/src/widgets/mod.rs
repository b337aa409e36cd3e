//! Reusable rendering helpers shared by screens.

pub mod num_fmt;
pub mod status_badge;
