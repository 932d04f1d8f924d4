use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read vocabulary file at {vocabulary_path}: {source}")]
    VocabularyReadError {
        vocabulary_path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Inline suggestion entries, offered before any file entries
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vocabulary: Vec<String>,

    /// File with one suggestion per line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_path: Option<PathBuf>,

    /// `log` level filter, e.g. "debug"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Evaluate the session after the next frame instead of on every change
    pub deferred_evaluation: bool,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde; relative files live beside the config
        let base = config_path.parent();
        config.vocabulary_path = config
            .vocabulary_path
            .map(|path| Self::resolve_path(&path, base));
        config.log_file = config.log_file.map(|path| Self::resolve_path(&path, base));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/autocomplete-entry");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// All configured suggestions, inline entries first, without duplicates
    pub fn vocabulary(&self) -> Result<Vec<String>, ConfigError> {
        let mut entries = self.vocabulary.clone();
        if let Some(path) = &self.vocabulary_path {
            entries.extend(read_vocabulary_file(path)?);
        }

        let mut seen = HashSet::new();
        entries.retain(|entry| seen.insert(entry.clone()));
        Ok(entries)
    }

    fn resolve_path(path: &Path, base: Option<&Path>) -> PathBuf {
        let expanded = Self::expand_path(path).unwrap_or_else(|| path.to_path_buf());
        match base {
            Some(base) if expanded.is_relative() => base.join(expanded),
            _ => expanded,
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

/// Read a vocabulary file, skipping blank lines and `#` comments
pub fn read_vocabulary_file(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|source| ConfigError::VocabularyReadError {
            vocabulary_path: path.to_path_buf(),
            source,
        })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}
