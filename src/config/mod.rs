//! Configuration module for Libro
//!
//! This module provides configuration management including:
//! - Platform-aware path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::LibroPaths;
pub use settings::Settings;
