//! On-call roster generation for doula practices.
//!
//! Providers submit their monthly availability; [`schedule::generate_schedule`] turns a
//! snapshot of those submissions into a day-by-day roster of First, Second and Third
//! on-call plus an Admin slot.

pub mod config;
pub mod display;
pub mod error;
pub mod form;
pub mod parser;
pub mod schedule;
pub mod web;

pub use error::{IngestError, ScheduleError};
pub use parser::{AvailabilityRecord, HalfDay, PreferredSlot};
pub use schedule::{generate_schedule, summarize, GeneratedSchedule, Rank, Schedule, ScheduleReport};
