//! Core data models for Momentera
//!
//! This module contains the data structures of the planning domain: events,
//! their tasks, budgets, recurrence rules and user account data.

pub mod budget;
pub mod event;
pub mod ids;
pub mod money;
pub mod priority;
pub mod recurrence;
pub mod tags;
pub mod task;
pub mod user;

pub use budget::Budget;
pub use event::Event;
pub use ids::{EventId, TaskId};
pub use money::Money;
pub use priority::{Priority, TaskStatus};
pub use recurrence::{Frequency, RecurrenceRule};
pub use task::Task;
pub use user::{Credentials, VoicePreference};
