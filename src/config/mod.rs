//! Configuration module for Momentera
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - Application settings persistence

pub mod paths;
pub mod settings;

pub use paths::MomenteraPaths;
pub use settings::Settings;
