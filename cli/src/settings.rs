//! Layered CLI configuration.
//!
//! Built-in defaults, then `search.toml` (or the file given with `--config`),
//! then `SEARCH_*` environment variables. Nested keys use a double underscore,
//! e.g. `SEARCH_ENGINE__SHARD_COUNT=16`.

use anyhow::{anyhow, bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use search_core::{SearchConfig, StopWords};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "search.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Space-separated stop words.
    pub stop_words: String,
    pub engine: SearchConfig,
}

impl Settings {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) if !path.is_file() => bail!("config file {} does not exist", path.display()),
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };
        Self::from_figment(
            Figment::from(Serialized::defaults(Settings::default()))
                .merge(Toml::file(file))
                .merge(Env::prefixed("SEARCH_").split("__")),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let settings: Settings = figment
            .extract()
            .map_err(|e| anyhow!("failed to load configuration: {e}"))?;
        settings.engine.validate()?;
        Ok(settings)
    }

    pub fn stop_words(&self) -> Result<StopWords> {
        Ok(StopWords::parse(&self.stop_words)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn file_values_override_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("search.toml");
        fs::write(&path, "stop_words = \"in the\"\n[engine]\nmax_result_count = 3\n").unwrap();

        let figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(&path));
        let settings = Settings::from_figment(figment).unwrap();
        assert_eq!(settings.engine.max_result_count, 3);
        assert_eq!(settings.engine.shard_count, SearchConfig::default().shard_count);
        assert!(settings.stop_words().unwrap().contains("the"));
    }

    #[test]
    fn invalid_engine_values_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("search.toml");
        fs::write(&path, "[engine]\nshard_count = 0\n").unwrap();

        let figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(&path));
        assert!(Settings::from_figment(figment).is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
