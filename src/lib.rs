//! Nurse Scheduling
//!
//! Assigns nurses to the day and night shifts of one week from their declared
//! preferences, fills shortfalls with the nearest willing nurse, and gives
//! every nurse left without work at least one shift.
//!
//! # Modules
//!
//! - [`day`]: weekday index, distance and forward date derivation
//! - [`domain`]: nurses, preferences, requirements, shifts, schedules
//! - [`catalog`]: the week's staffing requirements
//! - [`store`]: nurse and schedule repositories
//! - [`assignment`]: the assignment passes
//! - [`scheduler`]: one scheduling run end to end
//! - [`api`]: REST layer

pub mod api;
pub mod assignment;
pub mod catalog;
pub mod config;
pub mod day;
pub mod demo_data;
pub mod domain;
pub mod dto;
pub mod error;
pub mod scheduler;
pub mod store;
