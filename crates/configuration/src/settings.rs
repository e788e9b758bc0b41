use crate::error::ConfigError;
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::PathBuf;

/// Largest UTC offset in use anywhere (UTC+14, Line Islands).
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analytics: AnalyticsSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

impl Config {
    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analytics.offset()?;

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level '{}' must be one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        if self.report.decimals > 10 {
            return Err(ConfigError::ValidationError(format!(
                "report.decimals {} is above the maximum of 10",
                self.report.decimals
            )));
        }
        Ok(())
    }
}

/// Parameters of the statistics aggregator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsSettings {
    /// Offset from UTC, in minutes, used to place trades on a weekday and an hour.
    /// 0 buckets in UTC; 120 buckets in UTC+2.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl AnalyticsSettings {
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        if self.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ConfigError::ValidationError(format!(
                "analytics.utc_offset_minutes {} is outside +/-{}",
                self.utc_offset_minutes, MAX_OFFSET_MINUTES
            )));
        }
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "analytics.utc_offset_minutes {} is not a valid offset",
                self.utc_offset_minutes
            ))
        })
    }
}

/// Where and how log lines are written.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
    /// When set, logs go to a daily rolling file in this directory instead of stderr.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            directory: None,
        }
    }
}

/// How command output is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    #[serde(default)]
    pub format: ReportFormat,
    /// Decimal places shown for money and ratios in tables.
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

fn default_decimals() -> u32 {
    2
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            decimals: default_decimals(),
        }
    }
}
