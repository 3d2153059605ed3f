//! EatoAI Core Library
//!
//! Nutrition goal computation and meal log aggregation.

pub mod aggregate;
pub mod assistant;
pub mod db;
pub mod metrics;
pub mod models;
