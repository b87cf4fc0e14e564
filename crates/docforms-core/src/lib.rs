//! # docforms-core
//!
//! Core types, settings, and error types shared by the docforms crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Library settings and the global settings instance
//! - [`settings_loader`] - Loading settings from TOML/JSON and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{DocformsError, DocformsResult, ValidationError};
pub use settings::{Settings, SETTINGS};
