//! Runtime options, derived from the loaded configuration.

use std::time::Duration;

use formpilot_config::FormpilotConfig;
use formpilot_detect::{ScanOptions, TextCaps};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillOptions {
    /// Pause between consecutive field writes.
    pub field_delay: Duration,
    /// Mappings must exceed this confidence to be written.
    pub write_threshold: f64,
    pub show_feedback: bool,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            field_delay: Duration::from_millis(100),
            write_threshold: 0.4,
            show_feedback: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecoveryOptions {
    pub settle_delay: Duration,
    pub probe_timeout: Duration,
}

impl Default for RecoveryOptions {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(200),
            probe_timeout: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineOptions {
    pub scan: ScanOptions,
    pub fill: FillOptions,
    pub recovery: RecoveryOptions,
}

impl EngineOptions {
    pub fn from_config(config: &FormpilotConfig) -> Self {
        Self {
            scan: ScanOptions {
                caps: TextCaps {
                    context: config.scan.context_text_cap,
                    sibling: config.scan.sibling_text_cap,
                },
                retain_threshold: config.fill.retain_threshold,
            },
            fill: FillOptions {
                field_delay: config.fill.field_delay(),
                write_threshold: config.fill.write_threshold,
                show_feedback: config.fill.show_feedback,
            },
            recovery: RecoveryOptions {
                settle_delay: config.recovery.settle_delay(),
                probe_timeout: config.recovery.probe_timeout(),
            },
        }
    }
}
