// src/models/mod.rs

pub mod analytics;
pub mod quiz;
pub mod result;
pub mod user;
