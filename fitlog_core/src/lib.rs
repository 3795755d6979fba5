#![forbid(unsafe_code)]

//! Core domain model and derived-metrics engine for fitlog.
//!
//! This crate provides:
//! - Domain types (profile, meals, workouts, weight entries, goals)
//! - Energy needs (BMR/TDEE), daily intake, weekly balance and weight trend
//! - Key-value persistence (in-memory and file-backed)
//! - The tracker facade tying persistence and metrics together

pub mod types;
pub mod error;
pub mod parse;
pub mod config;
pub mod logging;
pub mod energy;
pub mod intake;
pub mod workouts;
pub mod weekly;
pub mod weight;
pub mod store;
pub mod tracker;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use energy::{calculate, EnergyNeeds};
pub use intake::{date_key, progress_percent, remaining, DailySummary};
pub use workouts::{parse_weekday, weekday_name, NewWorkout};
pub use weekly::{weekly_balance, DayBalance, WeeklyBalance};
pub use weight::{progress_to_goal, WeightProgress};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use tracker::Tracker;
