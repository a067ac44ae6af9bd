//! Shared utilities and common types for the Hoesik rating backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Short public identifier generation
//! - Score and free-text validation helpers
//! - Timestamp parsing for browser-submitted dates

pub mod id;
pub mod time;
pub mod validation;
