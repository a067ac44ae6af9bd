//! Domain layer for the Hoesik rating backend.
//!
//! This crate contains:
//! - Domain models (Gathering, Rating, results)
//! - Business rules (lifecycle, intake, aggregation, summaries)
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;
