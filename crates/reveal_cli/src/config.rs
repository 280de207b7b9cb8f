//! reveal.toml handling

use anyhow::{Context, Result};
use reveal_app::HeadlessRunConfig;
use reveal_scroll::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "reveal.toml";

/// Top-level configuration (reveal.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RevealConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub headless: HeadlessRunConfig,
}

impl RevealConfig {
    /// Load configuration from a file, or from reveal.toml inside a directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = resolve(path);

        if !config_path.exists() {
            anyhow::bail!(
                "No {} found at {}. Run `reveal init` to create one.",
                CONFIG_FILE,
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Explicit path must exist; otherwise use ./reveal.toml when present
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_dir(path),
            None if Path::new(CONFIG_FILE).exists() => Self::load_from_dir(Path::new(".")),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: RevealConfig = toml::from_str(content)?;
        config
            .engine
            .validate()
            .context("invalid [engine] table")?;
        config.headless.validate().context("invalid [headless] table")?;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

fn resolve(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(CONFIG_FILE)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_core::GroupKind;

    #[test]
    fn test_empty_file_is_default() {
        let config = RevealConfig::from_toml("").unwrap();
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.headless, HeadlessRunConfig::default());
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let text = RevealConfig::default().to_toml().unwrap();
        let parsed = RevealConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.engine, EngineConfig::default());
        assert_eq!(parsed.headless, HeadlessRunConfig::default());
    }

    #[test]
    fn test_partial_tables() {
        let config = RevealConfig::from_toml(
            r#"
            [engine]
            resize_debounce_ms = 300

            [engine.motion.card]
            duration_ms = 900

            [headless]
            tick_ms = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.engine.resize_debounce_ms, 300);
        assert_eq!(
            config.engine.motion[&GroupKind::Card].duration_ms,
            Some(900)
        );
        assert_eq!(config.headless.tick_ms, 8);
        assert_eq!(config.headless.width, 1280);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(RevealConfig::from_toml("[headless]\ntick_ms = 0").is_err());
        assert!(RevealConfig::from_toml("[engine.motion.heading]\nduration_ms = 0").is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = RevealConfig::load(Some(Path::new("does/not/exist.toml"))).unwrap_err();
        assert!(err.to_string().contains("reveal init"));
    }
}
