use autocomplete_entry_config::{Config, ConfigError};
use std::path::Path;

/// Offered when neither the config nor the command line name any entries
pub const DEFAULT_VOCABULARY: &[&str] = &[
    "Ada Lovelace",
    "Alan Turing",
    "Barbara Liskov",
    "Donald Knuth",
    "Edsger Dijkstra",
    "Frances Allen",
    "Grace Hopper",
    "John McCarthy",
    "Ken Thompson",
    "Margaret Hamilton",
    "world",
    "word",
    "work",
];

/// Suggestion list for this run; `--vocabulary` replaces the configured file
pub fn resolve(override_path: Option<&Path>, config: &Config) -> Result<Vec<String>, ConfigError> {
    let mut config = config.clone();
    if let Some(path) = override_path {
        config.vocabulary_path = Some(path.to_path_buf());
    }

    let entries = config.vocabulary()?;
    if entries.is_empty() {
        return Ok(DEFAULT_VOCABULARY.iter().map(|s| s.to_string()).collect());
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_when_nothing_configured() {
        let vocabulary = resolve(None, &Config::default()).unwrap();

        assert_eq!(vocabulary.len(), DEFAULT_VOCABULARY.len());
    }

    #[test]
    fn test_override_file_replaces_configured_file() {
        let temp_dir = TempDir::new().unwrap();
        let configured = temp_dir.path().join("configured.txt");
        let chosen = temp_dir.path().join("chosen.txt");
        std::fs::write(&configured, "alpha\n").unwrap();
        std::fs::write(&chosen, "beta\ngamma\n").unwrap();
        let config = Config {
            vocabulary: vec!["inline".into()],
            vocabulary_path: Some(configured),
            ..Config::default()
        };

        let vocabulary = resolve(Some(&chosen), &config).unwrap();

        assert_eq!(vocabulary, vec!["inline", "beta", "gamma"]);
    }

    #[test]
    fn test_missing_override_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.txt");

        assert!(resolve(Some(&missing), &Config::default()).is_err());
    }
}
