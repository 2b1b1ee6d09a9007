//! User configuration for planrev.
//!
//! Config file location: `$XDG_CONFIG_HOME/planrev/config.toml`, falling back to
//! `~/.config/planrev/config.toml`.
//!
//! Example config:
//! ```toml
//! theme = "catppuccin-mocha"
//! context_lines = 3
//! sidebar_width = 32
//! db_path = ".planrev/plans.db"
//! log_file = ".planrev/planrev.log"
//! ```
//!
//! Every key is optional. A missing or unreadable file is not an error: defaults
//! are used and a message goes to stderr.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Built-in theme name: `dark` or `catppuccin-mocha`.
    pub theme: String,
    /// Lines of context shown around a single replacement.
    pub context_lines: usize,
    /// Preferred sidebar width in columns (capped at a third of the terminal).
    pub sidebar_width: u16,
    /// SQLite plan store.
    pub db_path: PathBuf,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "catppuccin-mocha".to_owned(),
            context_lines: 3,
            sidebar_width: 32,
            db_path: PathBuf::from(".planrev/plans.db"),
            log_file: PathBuf::from(".planrev/planrev.log"),
        }
    }
}

impl Config {
    /// Returns the path to the planrev config file.
    pub fn path() -> PathBuf {
        let base = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
            .unwrap_or_else(|| PathBuf::from(".config"));
        base.join("planrev").join("config.toml")
    }

    /// Loads the config file, or defaults when it is absent or invalid.
    ///
    /// Runs before logging is set up, so problems are reported on stderr.
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(_) => return Self::default(),
        };
        match Self::parse(&raw) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("planrev: config parse error in {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = Config::parse("theme = \"dark\"\ncontext_lines = 5\n").unwrap();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.context_lines, 5);
        assert_eq!(config.sidebar_width, 32);
        assert_eq!(config.db_path, PathBuf::from(".planrev/plans.db"));
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(Config::parse("context_lines = \"many\"").is_err());
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "sidebar_width = [").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }
}
