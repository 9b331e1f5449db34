//! Momentera - terminal event planner
//!
//! This library provides the core functionality for the Momentera planner:
//! dated events with tasks, budgets, tags, reminders and recurrence, kept in
//! plain text files per user, driven by an interactive menu and optionally
//! read aloud by a text-to-speech program.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `logging`: Rolling log files
//! - `models`: Core data models (events, tasks, budgets, users)
//! - `storage`: Flat-file storage layer behind the `PlannerStore` trait
//! - `session`: A logged-in user's in-memory events
//! - `services`: Business logic layer
//! - `display`: Text formatting for menus and reports
//! - `export`: Text, CSV, JSON and YAML export
//! - `voice`: Speech engines and the narrator
//! - `cli`: Interactive menus
//!
//! # Example
//!
//! ```rust,ignore
//! use momentera::config::{paths::MomenteraPaths, settings::Settings};
//!
//! let paths = MomenteraPaths::new(None)?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;
pub mod voice;

pub use error::{PlannerError, PlannerResult};
