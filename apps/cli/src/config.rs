// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use sinusx_core::{LoadParameters, ShiftMode, DEFAULT_SHIFT_THRESHOLD};

/// Log output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Recenter large coordinates on load.
    pub shift_enabled: bool,
    /// Coordinate magnitude that triggers recentering.
    pub shift_threshold: f64,
    /// Log output style.
    pub log_format: LogFormat,
    /// Default `RUST_LOG` filter when none is set.
    pub default_filter: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            shift_enabled: std::env::var("SINUSX_SHIFT")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "off" | "0" | "false"))
                .unwrap_or(true),
            shift_threshold: std::env::var("SINUSX_SHIFT_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|t: &f64| t.is_finite() && *t > 0.0)
                .unwrap_or(DEFAULT_SHIFT_THRESHOLD),
            log_format: match std::env::var("SINUSX_LOG_FORMAT")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                "compact" => LogFormat::Compact,
                _ => LogFormat::Pretty,
            },
            default_filter: "warn,sinusx_core=info,sinusx_cli=info".into(),
        }
    }

    /// Load parameters derived from this configuration.
    pub fn load_parameters(&self) -> LoadParameters {
        let shift = if self.shift_enabled {
            ShiftMode::Auto {
                threshold: self.shift_threshold,
            }
        } else {
            ShiftMode::Disabled
        };
        LoadParameters::with_shift(shift)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_parameters_follow_shift_flag() {
        let mut config = Config {
            shift_enabled: true,
            shift_threshold: 500.0,
            log_format: LogFormat::Compact,
            default_filter: String::new(),
        };
        assert_eq!(
            config.load_parameters().shift,
            ShiftMode::Auto { threshold: 500.0 }
        );

        config.shift_enabled = false;
        assert_eq!(config.load_parameters().shift, ShiftMode::Disabled);
    }
}
