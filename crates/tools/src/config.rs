//! Sample-tool settings: optional TOML file defaults, overridden by CLI flags.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SampleConfig {
    pub seed: u64,
    pub length: usize,
    pub format: OutputFormat,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self { seed: 42, length: 8, format: OutputFormat::Text }
    }
}

impl SampleConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        ensure!(config.length > 0, "length in {} must be at least 1", path.display());
        Ok(config)
    }

    pub fn with_overrides(
        self,
        seed: Option<u64>,
        length: Option<usize>,
        format: Option<OutputFormat>,
    ) -> Self {
        Self {
            seed: seed.unwrap_or(self.seed),
            length: length.unwrap_or(self.length),
            format: format.unwrap_or(self.format),
        }
    }
}
