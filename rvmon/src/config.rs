//! Configuration for the rvmon binary.
//!
//! Settings come from a TOML file looked up in the user config
//! directory or the working directory; every field has a default so an
//! absent or partial file is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "rvmon.toml";

/// Monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Global verbose setting.
    #[serde(default)]
    pub verbose: bool,

    /// Guest memory layout.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Interactive prompt options.
    #[serde(default)]
    pub repl: ReplConfig,
}

/// Guest memory layout options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryConfig {
    /// Base of guest physical memory.
    #[serde(default = "default_mem_base")]
    pub base: u32,

    /// Size of guest physical memory in bytes.
    #[serde(default = "default_mem_size")]
    pub size: usize,
}

/// Interactive prompt options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplConfig {
    /// Prompt string shown before each command.
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

fn default_mem_base() -> u32 {
    rvmon_machine::DEFAULT_BASE
}

fn default_mem_size() -> usize {
    rvmon_machine::DEFAULT_SIZE
}

fn default_prompt() -> String {
    "(rvmon) ".to_string()
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            base: default_mem_base(),
            size: default_mem_size(),
        }
    }
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            memory: MemoryConfig::default(),
            repl: ReplConfig::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from the default locations: the user
    /// config directory (`<config>/rvmon/rvmon.toml`), then the working
    /// directory. Falls back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        for candidate in Self::default_paths() {
            if candidate.is_file() {
                return Self::load_from_path(&candidate);
            }
        }
        Ok(Self::default())
    }

    /// Loads the configuration from an explicit path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = toml::from_str(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("rvmon").join(CONFIG_FILE_NAME));
        }
        paths.push(PathBuf::from(CONFIG_FILE_NAME));
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.verbose);
        assert_eq!(config.memory.base, 0x8000_0000);
        assert_eq!(config.memory.size, 0x800_0000);
        assert_eq!(config.repl.prompt, "(rvmon) ");
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let config: Config = toml::from_str("[memory]\nsize = 4096\n").unwrap();
        assert_eq!(config.memory.size, 4096);
        assert_eq!(config.memory.base, 0x8000_0000);
        assert_eq!(config.repl.prompt, "(rvmon) ");
    }

    #[test]
    fn test_full_file_round_trips() {
        let config = Config {
            verbose: true,
            memory: MemoryConfig {
                base: 0x4000_0000,
                size: 1 << 20,
            },
            repl: ReplConfig {
                prompt: "> ".to_string(),
            },
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(toml::from_str::<Config>(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "verbose = true").unwrap();
        let config = Config::load_from_path(file.path()).unwrap();
        assert!(config.verbose);
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        assert!(Config::load_from_path(Path::new("/nonexistent/rvmon.toml")).is_err());
    }

    #[test]
    fn test_malformed_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "memory = \"lots\"").unwrap();
        assert!(Config::load_from_path(file.path()).is_err());
    }
}
