use std::path::{Path, PathBuf};

use anyhow::Context;
use log::LevelFilter;
use serde::Deserialize;

/// Settings for the interactive prompt, read from TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    pub prompt: String,
    pub banner: bool,
    pub log_level: String,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "qlisp> ".to_owned(),
            banner: true,
            log_level: "info".to_owned(),
        }
    }
}

impl ReplConfig {
    /// Environment variable naming the configuration file.
    pub const PATH_VAR: &'static str = "QLISP_CONFIG";
    pub const DEFAULT_PATH: &'static str = "qlisp.toml";

    pub fn from_toml(source: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&source).with_context(|| format!("parsing {}", path.display()))
    }

    /// Loads from `$QLISP_CONFIG`, then `./qlisp.toml`, falling back to the
    /// defaults when neither is present.
    pub fn load() -> anyhow::Result<Self> {
        if let Some(path) = std::env::var_os(Self::PATH_VAR) {
            return Self::from_path(PathBuf::from(path));
        }

        let path = Path::new(Self::DEFAULT_PATH);
        if path.exists() {
            return Self::from_path(path);
        }

        Ok(Self::default())
    }

    /// Unparseable levels fall back to `info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() -> anyhow::Result<()> {
        let config = ReplConfig::from_toml("prompt = \"> \"")?;
        assert_eq!(config.prompt, "> ");
        assert!(config.banner);
        assert_eq!(config.level_filter(), LevelFilter::Info);
        Ok(())
    }

    #[test]
    fn full_config() -> anyhow::Result<()> {
        let config = ReplConfig::from_toml("prompt = \"lisp> \"\nbanner = false\nlog_level = \"trace\"")?;
        assert_eq!(config, ReplConfig {
            prompt: "lisp> ".into(),
            banner: false,
            log_level: "trace".into(),
        });
        assert_eq!(config.level_filter(), LevelFilter::Trace);
        Ok(())
    }

    #[test]
    fn bad_levels_fall_back() {
        let config = ReplConfig { log_level: "loud".into(), ..ReplConfig::default() };
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn malformed_files_are_errors() {
        assert!(ReplConfig::from_toml("banner = \"yes\"").is_err());
        assert!(ReplConfig::from_path("/definitely/not/here.toml").is_err());
    }
}
