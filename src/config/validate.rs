// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{BridgeError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::BridgeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.engine, raw.devices, raw.studio))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_engine(cfg)?;
    validate_devices(cfg)?;
    Ok(())
}

fn validate_engine(cfg: &RawConfigFile) -> Result<()> {
    let engine = &cfg.engine;

    ensure_non_empty("[engine].binary", &engine.binary)?;
    ensure_positive("[engine].command_timeout_secs", engine.command_timeout_secs)?;
    ensure_positive("[engine].flow_timeout_secs", engine.flow_timeout_secs)?;

    if engine.max_output_bytes == 0 {
        return Err(BridgeError::ConfigError(
            "[engine].max_output_bytes must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_devices(cfg: &RawConfigFile) -> Result<()> {
    let devices = &cfg.devices;

    ensure_non_empty("[devices].adb", &devices.adb)?;
    ensure_non_empty("[devices].xcrun", &devices.xcrun)?;
    ensure_positive(
        "[devices].discovery_timeout_secs",
        devices.discovery_timeout_secs,
    )?;

    Ok(())
}

fn ensure_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BridgeError::ConfigError(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

fn ensure_positive(field: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(BridgeError::ConfigError(format!(
            "{field} must be >= 1 (got 0)"
        )));
    }
    Ok(())
}
