//! Configuration schema definitions.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use formpilot_protocols::MergePolicy;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormpilotConfig {
    /// Classifier tables overriding the built-in ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<PathBuf>,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub fill: FillConfig,

    #[serde(default)]
    pub recovery: RecoveryConfig,

    #[serde(default)]
    pub merge: MergePolicy,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Scanning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Quiet period after the last mutation before a rescan fires.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Periodic rescan interval; 0 disables the periodic timer.
    #[serde(default)]
    pub periodic_interval_ms: u64,

    /// Cap on each ancestor's text when gathering context phrases.
    #[serde(default = "default_context_text_cap")]
    pub context_text_cap: usize,

    /// Cap on each preceding sibling's text.
    #[serde(default = "default_sibling_text_cap")]
    pub sibling_text_cap: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            periodic_interval_ms: 0,
            context_text_cap: default_context_text_cap(),
            sibling_text_cap: default_sibling_text_cap(),
        }
    }
}

impl ScanConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn periodic_interval(&self) -> Option<Duration> {
        (self.periodic_interval_ms > 0).then(|| Duration::from_millis(self.periodic_interval_ms))
    }
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_context_text_cap() -> usize {
    150
}

fn default_sibling_text_cap() -> usize {
    100
}

/// Fill execution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillConfig {
    /// Pause between consecutive field writes.
    #[serde(default = "default_field_delay_ms")]
    pub field_delay_ms: u64,

    /// Mappings at or below this confidence are dropped from the working set.
    #[serde(default = "default_retain_threshold")]
    pub retain_threshold: f64,

    /// Mappings must exceed this confidence to be written.
    #[serde(default = "default_write_threshold")]
    pub write_threshold: f64,

    /// Leave a visible success/failure marker on each attempted element.
    #[serde(default = "default_true")]
    pub show_feedback: bool,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            field_delay_ms: default_field_delay_ms(),
            retain_threshold: default_retain_threshold(),
            write_threshold: default_write_threshold(),
            show_feedback: true,
        }
    }
}

impl FillConfig {
    pub fn field_delay(&self) -> Duration {
        Duration::from_millis(self.field_delay_ms)
    }
}

fn default_field_delay_ms() -> u64 {
    100
}

fn default_retain_threshold() -> f64 {
    0.3
}

fn default_write_threshold() -> f64 {
    0.4
}

fn default_true() -> bool {
    true
}

/// Communication recovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Wait after re-injecting before retrying.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Liveness probe deadline.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

impl RecoveryConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

fn default_settle_delay_ms() -> u64 {
    200
}

fn default_probe_timeout_ms() -> u64 {
    2000
}

/// Profile/CV storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_directory")]
    pub directory: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: default_storage_directory(),
        }
    }
}

impl StorageConfig {
    /// Storage directory with `~` expanded.
    pub fn resolved_directory(&self) -> PathBuf {
        PathBuf::from(crate::ConfigLoader::expand_path(&self.directory))
    }
}

fn default_storage_directory() -> String {
    dirs::home_dir()
        .map(|home| home.join(".formpilot").to_string_lossy().into_owned())
        .unwrap_or_else(|| "~/.formpilot".to_string())
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily rolling log files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
