//! Settings for docforms.
//!
//! [`Settings`] holds library-wide configuration and [`LazySettings`] is a
//! globally-accessible, set-once container for it. Code that reads settings
//! goes through [`LazySettings::get_or_default`] so that an unconfigured
//! process still behaves sensibly.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Default `strftime` format used for date-time form fields.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The complete set of docforms settings.
///
/// # Examples
///
/// ```
/// use docforms_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(!settings.debug);
/// assert_eq!(settings.log_level, "info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,
    /// The log level / env-filter directive (e.g. "info", "docforms=debug").
    pub log_level: String,
    /// `strftime` format used by generated date-time fields.
    pub datetime_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "info".to_string(),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
pub struct LazySettings {
    inner: OnceLock<Settings>,
    fallback: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
            fallback: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called at most once.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured.
    pub fn configure(&self, settings: Settings) {
        assert!(
            self.inner.set(settings).is_ok(),
            "Settings have already been configured"
        );
    }

    /// Returns a reference to the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if settings have not been configured.
    pub fn get(&self) -> &Settings {
        self.inner
            .get()
            .expect("Settings have not been configured. Call SETTINGS.configure() first.")
    }

    /// Returns the configured settings, or the defaults if none were configured.
    pub fn get_or_default(&self) -> &Settings {
        match self.inner.get() {
            Some(settings) => settings,
            None => self.fallback.get_or_init(Settings::default),
        }
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();
