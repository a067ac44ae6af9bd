//! HTTP route handlers.

pub mod gatherings;
pub mod health;
