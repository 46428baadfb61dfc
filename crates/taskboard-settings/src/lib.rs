//! # taskboard-settings
//!
//! Configuration with layered sources.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`TaskboardSettings::default()`]
//! 2. **Settings file**: JSON at `$TASKBOARD_SETTINGS` (deep-merged over defaults)
//! 3. **Environment variables**: `PORT`, `DB_*`, `LOG_*`, `API_URL` (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, apply_overrides, deep_merge, load_settings, load_settings_from_path,
    reset_out_of_range,
};
pub use types::{
    ClientSettings, DatabaseSettings, LoggingSettings, ServerSettings, TaskboardSettings,
};
