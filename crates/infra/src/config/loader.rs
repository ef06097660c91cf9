//! Configuration loader
//!
//! Loads scheduler configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the environment carries no configuration, falls back to a file
//! 3. Missing file means defaults
//!
//! An environment that is present but malformed is an error, never a
//! silent fallback.
//!
//! ## Environment Variables
//! - `RAMILS_DB_PATH`: Database file path
//! - `RAMILS_DB_POOL_SIZE`: Connection pool size
//! - `RAMILS_REFERENCE_PREFIX`: Booking reference prefix

use std::path::Path;

use ramils_domain::{Result, SchedulerConfig, SchedulerError};

/// Load configuration with automatic fallback strategy.
///
/// Environment variables win; otherwise the given config file is read, and
/// when neither exists the defaults apply.
pub fn load(config_path: Option<&Path>) -> Result<SchedulerConfig> {
    // Only an absent RAMILS_DB_PATH triggers the fallback; a present but
    // malformed environment surfaces as an error rather than being
    // silently ignored.
    if std::env::var_os("RAMILS_DB_PATH").is_some() {
        let config = load_from_env()?;
        tracing::info!("configuration loaded from environment variables");
        return Ok(config);
    }

    tracing::debug!("RAMILS_DB_PATH not set, trying file");
    match config_path {
        Some(path) if path.exists() => load_from_file(path),
        _ => Ok(SchedulerConfig::default()),
    }
}

/// Load configuration from environment variables.
///
/// `RAMILS_DB_PATH` is required; the remaining variables fall back to
/// defaults.
pub fn load_from_env() -> Result<SchedulerConfig> {
    let db_path = std::env::var("RAMILS_DB_PATH")
        .map_err(|_| SchedulerError::Config("RAMILS_DB_PATH not set".into()))?;

    let mut config = SchedulerConfig::default();
    config.database.path = db_path;

    if let Ok(pool_size) = std::env::var("RAMILS_DB_POOL_SIZE") {
        config.database.pool_size = pool_size
            .parse()
            .map_err(|e| SchedulerError::Config(format!("invalid RAMILS_DB_POOL_SIZE: {e}")))?;
    }
    if let Ok(prefix) = std::env::var("RAMILS_REFERENCE_PREFIX") {
        if prefix.trim().is_empty() {
            return Err(SchedulerError::Config("RAMILS_REFERENCE_PREFIX is empty".into()));
        }
        config.booking.reference_prefix = prefix;
    }

    Ok(config)
}

/// Load configuration from a JSON file.
pub fn load_from_file(path: &Path) -> Result<SchedulerConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| SchedulerError::Config(format!("cannot read {}: {e}", path.display())))?;
    let config: SchedulerConfig = serde_json::from_str(&contents)
        .map_err(|e| SchedulerError::Config(format!("invalid config file: {e}")))?;
    tracing::info!(path = %path.display(), "configuration loaded from file");
    Ok(config)
}
