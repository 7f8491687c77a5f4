use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Where raw request templates are read from: every `{prefix}*.{extension}`
/// file directly inside `dir`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TemplateSource {
    pub dir: PathBuf,
    pub prefix: String,
    pub extension: String,
}

impl Default for TemplateSource {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("Post"),
            prefix: "post".to_string(),
            extension: "txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Maximum number of sends in flight at once.
    pub threads: u32,
    /// Seconds to sleep between rounds.
    pub interval: u64,
    /// Number of response body characters included in each log line.
    pub preview_len: usize,
    pub templates: TemplateSource,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: 1,
            interval: 1,
            preview_len: 256,
            templates: TemplateSource::default(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn read(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        Self::from_toml(&content).with_context(|| format!("invalid config file {}", path))
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            bail!("threads must be at least 1");
        }
        if self.interval == 0 {
            bail!("interval must be at least 1 second");
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}
