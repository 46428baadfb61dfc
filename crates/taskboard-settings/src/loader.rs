//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`TaskboardSettings::default()`]
//! 2. If a settings file exists, deep-merge its values over defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::{DatabaseSettings, TaskboardSettings};

/// Environment variable naming an optional JSON settings file.
pub const SETTINGS_PATH_ENV: &str = "TASKBOARD_SETTINGS";

const POOL_SIZE_RANGE: (u32, u32) = (1, 1024);
const POOL_TIMEOUT_SECS_RANGE: (u64, u64) = (1, 86_400);
const INIT_RETRY_MS_RANGE: (u64, u64) = (10, 3_600_000);

/// Load settings using `$TASKBOARD_SETTINGS` (if set) and env overrides.
pub fn load_settings() -> Result<TaskboardSettings> {
    match std::env::var_os(SETTINGS_PATH_ENV) {
        Some(path) => load_settings_from_path(&PathBuf::from(path)),
        None => {
            let mut settings = TaskboardSettings::default();
            apply_env_overrides(&mut settings);
            Ok(settings)
        }
    }
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<TaskboardSettings> {
    let defaults = serde_json::to_value(TaskboardSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: TaskboardSettings = serde_json::from_value(merged)?;
    reset_out_of_range(&mut settings);
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Reset numeric database settings outside their accepted range to the
/// defaults, with a warning. Env overrides are checked on read instead.
pub fn reset_out_of_range(settings: &mut TaskboardSettings) {
    let defaults = DatabaseSettings::default();
    let db = &mut settings.database;
    db.pool_size = in_range("poolSize", db.pool_size, POOL_SIZE_RANGE, defaults.pool_size);
    db.pool_timeout_secs = in_range(
        "poolTimeoutSecs",
        db.pool_timeout_secs,
        POOL_TIMEOUT_SECS_RANGE,
        defaults.pool_timeout_secs,
    );
    db.init_retry_ms = in_range(
        "initRetryMs",
        db.init_retry_ms,
        INIT_RETRY_MS_RANGE,
        defaults.init_retry_ms,
    );
}

fn in_range<T>(key: &str, value: T, (min, max): (T, T), default: T) -> T
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value >= min && value <= max {
        value
    } else {
        warn!(key, %value, %default, "setting out of range, using default");
        default
    }
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply process environment overrides.
pub fn apply_env_overrides(settings: &mut TaskboardSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`.
///
/// Empty values are treated as unset. Numbers out of range or unparsable
/// are ignored with a warning.
pub fn apply_overrides<F>(settings: &mut TaskboardSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let env = EnvReader { lookup };

    // ── Server ──────────────────────────────────────────────────────
    if let Some(v) = env.string("HOST") {
        settings.server.host = v;
    }
    if let Some(v) = env.u16("PORT", (0, 65535)) {
        settings.server.port = v;
    }

    // ── Database ────────────────────────────────────────────────────
    if let Some(v) = env.string("DB_HOST") {
        settings.database.host = v;
    }
    if let Some(v) = env.string("DB_USER") {
        settings.database.user = v;
    }
    if let Some(v) = env.string("DB_PASSWORD") {
        settings.database.password = v;
    }
    if let Some(v) = env.string("DB_NAME") {
        settings.database.name = v;
    }
    if let Some(v) = env.u32("DB_POOL_SIZE", POOL_SIZE_RANGE) {
        settings.database.pool_size = v;
    }
    if let Some(v) = env.u64("DB_POOL_TIMEOUT_SECS", POOL_TIMEOUT_SECS_RANGE) {
        settings.database.pool_timeout_secs = v;
    }
    if let Some(v) = env.u64("DB_INIT_RETRY_MS", INIT_RETRY_MS_RANGE) {
        settings.database.init_retry_ms = v;
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = env.string("LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = env.string("LOG_FORMAT") {
        match v.parse() {
            Ok(format) => settings.logging.format = format,
            Err(e) => {
                warn!(key = "LOG_FORMAT", value = %v, error = %e, "invalid env var, ignoring");
            }
        }
    }

    // ── Client ──────────────────────────────────────────────────────
    if let Some(v) = env.string("API_URL") {
        settings.client.api_url = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.is_empty())
    }

    fn numeric<T>(&self, name: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
        let val = self.string(name)?;
        let result = parse(&val);
        if result.is_none() {
            warn!(key = name, value = %val, "invalid numeric env var, ignoring");
        }
        result
    }

    fn u16(&self, name: &str, (min, max): (u16, u16)) -> Option<u16> {
        self.numeric(name, |v| parse_u16_range(v, min, max))
    }

    fn u32(&self, name: &str, (min, max): (u32, u32)) -> Option<u32> {
        self.numeric(name, |v| parse_u32_range(v, min, max))
    }

    fn u64(&self, name: &str, (min, max): (u64, u64)) -> Option<u64> {
        self.numeric(name, |v| parse_u64_range(v, min, max))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::errors::SettingsError;
    use taskboard_core::logging::LogFormat;

    fn overrides(pairs: &[(&str, &str)]) -> TaskboardSettings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut settings = TaskboardSettings::default();
        apply_overrides(&mut settings, |name| vars.get(name).cloned());
        settings
    }

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({"server": {"port": 5000, "host": "0.0.0.0"}});
        let source = serde_json::json!({"server": {"port": 9090}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["server"]["port"], 9090);
        assert_eq!(merged["server"]["host"], "0.0.0.0");
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_array_replace() {
        let target = serde_json::json!({"items": [1, 2, 3]});
        let source = serde_json::json!({"items": [4]});
        assert_eq!(deep_merge(target, source)["items"], serde_json::json!([4]));
    }

    // ── env overrides ───────────────────────────────────────────────

    #[test]
    fn no_overrides_keeps_defaults() {
        let settings = overrides(&[]);
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.database.host, "mysql");
        assert_eq!(settings.database.name, "tasksdb");
    }

    #[test]
    fn deployment_variables_applied() {
        let settings = overrides(&[
            ("PORT", "8081"),
            ("DB_HOST", "/var/lib/taskboard"),
            ("DB_USER", "app"),
            ("DB_PASSWORD", "s3cret"),
            ("DB_NAME", "prod"),
        ]);
        assert_eq!(settings.server.port, 8081);
        assert_eq!(settings.database.host, "/var/lib/taskboard");
        assert_eq!(settings.database.user, "app");
        assert_eq!(settings.database.password, "s3cret");
        assert_eq!(settings.database.name, "prod");
    }

    #[test]
    fn invalid_port_ignored() {
        let settings = overrides(&[("PORT", "http")]);
        assert_eq!(settings.server.port, 5000);
        let settings = overrides(&[("PORT", "70000")]);
        assert_eq!(settings.server.port, 5000);
    }

    #[test]
    fn empty_value_treated_as_unset() {
        let settings = overrides(&[("DB_NAME", "")]);
        assert_eq!(settings.database.name, "tasksdb");
    }

    #[test]
    fn pool_and_retry_overrides() {
        let settings = overrides(&[
            ("DB_POOL_SIZE", "4"),
            ("DB_POOL_TIMEOUT_SECS", "2"),
            ("DB_INIT_RETRY_MS", "250"),
        ]);
        assert_eq!(settings.database.pool_size, 4);
        assert_eq!(settings.database.pool_timeout_secs, 2);
        assert_eq!(settings.database.init_retry_ms, 250);
    }

    #[test]
    fn zero_pool_size_rejected() {
        let settings = overrides(&[("DB_POOL_SIZE", "0")]);
        assert_eq!(settings.database.pool_size, 10);
    }

    #[test]
    fn logging_and_client_overrides() {
        let settings = overrides(&[
            ("LOG_LEVEL", "debug"),
            ("LOG_FORMAT", "json"),
            ("API_URL", "http://tasks.internal/api"),
        ]);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.client.api_url, "http://tasks.internal/api");
    }

    #[test]
    fn invalid_log_format_ignored() {
        let settings = overrides(&[("LOG_FORMAT", "yaml")]);
        assert_eq!(settings.logging.format, LogFormat::Compact);
    }

    #[test]
    fn parse_ranges() {
        assert_eq!(parse_u16_range(" 80 ", 1, 65535), Some(80));
        assert_eq!(parse_u16_range("0", 1, 65535), None);
        assert_eq!(parse_u32_range("-1", 0, 10), None);
        assert_eq!(parse_u64_range("5000", 10, 10_000), Some(5000));
    }

    // ── load_settings_from_path ─────────────────────────────────────

    #[test]
    fn missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from_path(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings.database.pool_size, TaskboardSettings::default().database.pool_size);
    }

    #[test]
    fn file_values_merged_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"database": {"poolSize": 3, "initRetryMs": 100}}"#).unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.database.pool_size, 3);
        assert_eq!(settings.database.init_retry_ms, 100);
        assert_eq!(settings.database.user, "root");
    }

    #[test]
    fn out_of_range_file_values_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"database": {"poolSize": 0, "poolTimeoutSecs": 0, "initRetryMs": 0}}"#,
        )
        .unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        let defaults = TaskboardSettings::default().database;
        assert_eq!(settings.database.pool_size, defaults.pool_size);
        assert_eq!(settings.database.pool_timeout_secs, defaults.pool_timeout_secs);
        assert_eq!(settings.database.init_retry_ms, defaults.init_retry_ms);
    }

    #[test]
    fn oversized_pool_in_file_reset() {
        let mut settings = TaskboardSettings::default();
        settings.database.pool_size = 5000;
        settings.database.init_retry_ms = 10;
        reset_out_of_range(&mut settings);
        assert_eq!(settings.database.pool_size, 10);
        assert_eq!(settings.database.init_retry_ms, 10);
    }

    #[test]
    fn invalid_json_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        let err = load_settings_from_path(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }
}
