// src/engine/mod.rs

//! Pure scoring and aggregation over already-fetched records.

pub mod analytics;
pub mod performance;
pub mod scoring;
