//! `cogkit.toml`: session flags, diagnostics limits and runner settings.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Root of `cogkit.toml`. Every section is optional.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct CogkitConfig {
    pub session: SessionConfig,
    pub diagnostics: DiagnosticsConfig,
    pub runner: RunnerConfig,
}

/// `[session]`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub auto_go_to_next_activity: bool,
    pub auto_end_after_last_activity: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_go_to_next_activity: true,
            auto_end_after_last_activity: true,
        }
    }
}

/// `[diagnostics]`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Reports kept before further errors are only logged.
    pub max_reports: usize,
    pub end_session_on_error: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            max_reports: 8,
            end_session_on_error: true,
        }
    }
}

/// `[runner]` - read by the headless dev runner only.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    pub frames: u32,
    pub frame_ms: f64,
    pub log_level: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            frames: 300,
            frame_ms: 1000.0 / 60.0,
            log_level: "info".to_string(),
        }
    }
}

impl CogkitConfig {
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("invalid cogkit config")
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("in {}", path.display()))
    }
}
