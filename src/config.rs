use crate::parser::InputMode;
use crate::segmenter::SearchLimits;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Custom alphabet file; the periodic table is used when unset.
    pub alphabet: Option<PathBuf>,
    pub input_mode: InputMode,
    pub all_matches: bool,
    pub normalize_accents: bool,
    pub unique_words: bool,
    pub ignore_patterns: Vec<String>,
    pub max_partitions: Option<usize>,
    pub word_timeout_ms: Option<u64>,
}

fn default_max_partitions() -> Option<usize> {
    Some(10_000)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alphabet: None,
            input_mode: InputMode::WordList,
            all_matches: false,
            normalize_accents: true,
            unique_words: false,
            ignore_patterns: Vec::new(),
            max_partitions: default_max_partitions(),
            word_timeout_ms: None,
        }
    }
}

/// Command-line values that take precedence over every config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub alphabet: Option<PathBuf>,
    pub prose: bool,
    pub all_matches: bool,
    pub no_normalize: bool,
    pub unique_words: bool,
    pub ignore_patterns: Vec<String>,
    pub max_partitions: Option<usize>,
    pub word_timeout_ms: Option<u64>,
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(overrides: Overrides) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global_config = Self::from_file(&global_path)?;
                config = config.merge(global_config);
            }
        }

        let local_path = PathBuf::from(".chemsplit.toml");
        if local_path.exists() {
            let local_config = Self::from_file(&local_path)?;
            config = config.merge(local_config);
        }

        Ok(config.apply(overrides))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, other: Self) -> Self {
        // Values equal to the defaults don't override what is already set
        let defaults = Self::default();

        if other.alphabet.is_some() {
            self.alphabet = other.alphabet;
        }
        if other.input_mode != defaults.input_mode {
            self.input_mode = other.input_mode;
        }
        if other.all_matches != defaults.all_matches {
            self.all_matches = other.all_matches;
        }
        if other.normalize_accents != defaults.normalize_accents {
            self.normalize_accents = other.normalize_accents;
        }
        if other.unique_words != defaults.unique_words {
            self.unique_words = other.unique_words;
        }
        if !other.ignore_patterns.is_empty() {
            self.ignore_patterns = other.ignore_patterns;
        }
        if other.max_partitions != defaults.max_partitions {
            self.max_partitions = other.max_partitions;
        }
        if other.word_timeout_ms.is_some() {
            self.word_timeout_ms = other.word_timeout_ms;
        }
        self
    }

    fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(alphabet) = overrides.alphabet {
            self.alphabet = Some(alphabet);
        }
        if overrides.prose {
            self.input_mode = InputMode::Prose;
        }
        if overrides.all_matches {
            self.all_matches = true;
        }
        if overrides.no_normalize {
            self.normalize_accents = false;
        }
        if overrides.unique_words {
            self.unique_words = true;
        }
        self.ignore_patterns.extend(overrides.ignore_patterns);
        if overrides.max_partitions.is_some() {
            self.max_partitions = overrides.max_partitions;
        }
        if overrides.word_timeout_ms.is_some() {
            self.word_timeout_ms = overrides.word_timeout_ms;
        }
        self
    }

    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            // 0 lifts the cap
            max_partitions: self.max_partitions.filter(|&max| max > 0),
            time_budget: self.word_timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "chemsplit").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input_mode, InputMode::WordList);
        assert_eq!(config.max_partitions, Some(10_000));
        assert!(config.normalize_accents);
        assert!(!config.all_matches);
    }

    #[test]
    fn test_merge_configs() {
        let base = Config::default();
        let override_config = Config {
            all_matches: true,
            word_timeout_ms: Some(250),
            ..Default::default()
        };

        let merged = base.merge(override_config);
        assert!(merged.all_matches);
        assert_eq!(merged.word_timeout_ms, Some(250));
        assert_eq!(merged.max_partitions, Some(10_000));
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::default().apply(Overrides {
            prose: true,
            no_normalize: true,
            max_partitions: Some(0),
            ignore_patterns: vec!["^x".to_string()],
            ..Default::default()
        });

        assert_eq!(config.input_mode, InputMode::Prose);
        assert!(!config.normalize_accents);
        assert_eq!(config.max_partitions, Some(0));
        assert_eq!(config.search_limits().max_partitions, None);
        assert_eq!(config.ignore_patterns, vec!["^x"]);
    }

    #[test]
    fn test_partial_toml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "all_matches = true\ninput_mode = \"prose\"\nword_timeout_ms = 500\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(config.all_matches);
        assert_eq!(config.input_mode, InputMode::Prose);
        assert_eq!(
            config.search_limits().time_budget,
            Some(Duration::from_millis(500))
        );
        assert!(config.normalize_accents);
    }
}
