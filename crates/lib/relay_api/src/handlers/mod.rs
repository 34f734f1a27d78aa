//! Request handlers.

pub mod health;
pub mod invoke;
pub mod prompt;
