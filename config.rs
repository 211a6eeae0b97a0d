//! Runtime settings for the smoke-test binary, read from the environment.

use std::time::Duration;

use thiserror_no_std::Error;

use crate::conversion::{ConversionDelay, Oversampling};
use crate::sensor::MS5803_ADDRESS;

pub const ENV_I2C_BUS: &str = "MS5803_I2C_BUS";
pub const ENV_ADDRESS: &str = "MS5803_ADDRESS";
pub const ENV_OSR: &str = "MS5803_OSR";
pub const ENV_SECOND_ORDER: &str = "MS5803_SECOND_ORDER";
pub const ENV_POLL_MS: &str = "MS5803_POLL_MS";
pub const ENV_FIXED_DELAY: &str = "MS5803_FIXED_DELAY";
pub const ENV_LCD: &str = "MS5803_LCD";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value {value:?} for {key}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// `/dev/i2c-N`
    pub i2c_bus: u8,
    pub address: u8,
    pub oversampling: Oversampling,
    pub second_order: bool,
    pub poll_interval: Duration,
    pub conversion_delay: ConversionDelay,
    /// Mirror the rolling averages on the LCD.
    pub lcd: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            i2c_bus: 0,
            address: MS5803_ADDRESS,
            oversampling: Oversampling::Osr4096,
            second_order: true,
            poll_interval: Duration::from_millis(200),
            conversion_delay: ConversionDelay::Scaled,
            lcd: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_I2C_BUS) {
            config.i2c_bus = parse_u8(&value).ok_or_else(|| invalid(ENV_I2C_BUS, &value))?;
        }
        if let Some(value) = lookup(ENV_ADDRESS) {
            config.address = parse_u8(&value)
                .filter(|&addr| addr <= 0x7F)
                .ok_or_else(|| invalid(ENV_ADDRESS, &value))?;
        }
        if let Some(value) = lookup(ENV_OSR) {
            config.oversampling = value
                .trim()
                .parse::<i32>()
                .ok()
                .and_then(|index| Oversampling::try_from(index).ok())
                .ok_or_else(|| invalid(ENV_OSR, &value))?;
        }
        if let Some(value) = lookup(ENV_SECOND_ORDER) {
            config.second_order =
                parse_bool(&value).ok_or_else(|| invalid(ENV_SECOND_ORDER, &value))?;
        }
        if let Some(value) = lookup(ENV_POLL_MS) {
            let ms = value
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid(ENV_POLL_MS, &value))?;
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(value) = lookup(ENV_FIXED_DELAY) {
            let fixed = parse_bool(&value).ok_or_else(|| invalid(ENV_FIXED_DELAY, &value))?;
            config.conversion_delay = if fixed {
                ConversionDelay::Fixed
            } else {
                ConversionDelay::Scaled
            };
        }
        if let Some(value) = lookup(ENV_LCD) {
            config.lcd = parse_bool(&value).ok_or_else(|| invalid(ENV_LCD, &value))?;
        }

        Ok(config)
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError {
        key,
        value: value.to_owned(),
    }
}

/// Decimal, or hex with a `0x` prefix.
fn parse_u8(value: &str) -> Option<u8> {
    let value = value.trim();
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
