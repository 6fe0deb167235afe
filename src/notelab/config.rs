use crate::error::{NotelabError, Result};
use crate::model::DEFAULT_LANGUAGE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_SAVE_DELAY_MS: u64 = 500;

/// Configuration for notelab, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotelabConfig {
    /// Quiet period after the last change before the tree is written to disk
    #[serde(default = "default_save_delay_ms")]
    pub save_delay_ms: u64,

    /// Language hint given to new and imported notes that lack one
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Whether `show` prints `<script>` blocks in note content as they are
    #[serde(default = "default_allow_scripts")]
    pub allow_scripts: bool,
}

fn default_save_delay_ms() -> u64 {
    DEFAULT_SAVE_DELAY_MS
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_allow_scripts() -> bool {
    true
}

impl Default for NotelabConfig {
    fn default() -> Self {
        Self {
            save_delay_ms: DEFAULT_SAVE_DELAY_MS,
            default_language: default_language(),
            allow_scripts: true,
        }
    }
}

impl NotelabConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(NotelabError::Io)?;
        let config: NotelabConfig = serde_json::from_str(&content).map_err(NotelabError::Parse)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(NotelabError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(NotelabError::Parse)?;
        fs::write(config_path, content).map_err(NotelabError::Io)?;
        Ok(())
    }

    pub fn save_delay(&self) -> Duration {
        Duration::from_millis(self.save_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = NotelabConfig::default();
        assert_eq!(config.save_delay_ms, 500);
        assert_eq!(config.default_language, "html");
        assert!(config.allow_scripts);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = NotelabConfig::load(dir.path()).unwrap();
        assert_eq!(config, NotelabConfig::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"save_delay_ms": 50}"#).unwrap();

        let config = NotelabConfig::load(dir.path()).unwrap();
        assert_eq!(config.save_delay(), Duration::from_millis(50));
        assert_eq!(config.default_language, "html");
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");

        let mut config = NotelabConfig::default();
        config.default_language = "python".to_string();
        config.allow_scripts = false;
        config.save(&nested).unwrap();

        let loaded = NotelabConfig::load(&nested).unwrap();
        assert_eq!(loaded, config);
    }
}
