//! Data models
//!
//! Rust structs representing database entities.

mod log_entry;
mod nutrition;
mod profile;

pub use log_entry::{LogEntry, LogEntryCreate};
pub use nutrition::Nutrition;
pub use profile::{ActivityLevel, Profile, ProfileUpsert, Sex};
