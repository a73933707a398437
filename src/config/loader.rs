//! Configuration file loader.

use std::path::{Path, PathBuf};

use super::ShellConfig;

/// File name looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".gnokii-supervisor.toml";

/// Environment variable naming a config file to try first.
pub const CONFIG_ENV_VAR: &str = "GNOKII_SUPERVISOR_CONFIG";

/// Finds and parses the supervisor's TOML settings.
///
/// Candidates are tried in order and the first existing file wins. With no
/// file anywhere the defaults apply, except for a path given explicitly
/// through [`with_path`](Self::with_path), which must exist.
#[derive(Debug)]
pub struct ConfigLoader {
    candidates: Vec<PathBuf>,
    explicit: bool,
}

impl ConfigLoader {
    /// Loader over the standard locations: `$GNOKII_SUPERVISOR_CONFIG`, the
    /// current directory, then the user config directory.
    #[must_use]
    pub fn new() -> Self {
        let from_env = std::env::var_os(CONFIG_ENV_VAR)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        let user = dirs::config_dir().map(|dir| dir.join("gnokii-supervisor").join("config.toml"));

        let candidates = from_env
            .into_iter()
            .chain(std::iter::once(PathBuf::from(LOCAL_CONFIG_FILE)))
            .chain(user)
            .collect();

        Self {
            candidates,
            explicit: false,
        }
    }

    /// Loader for exactly one file.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            candidates: vec![path],
            explicit: true,
        }
    }

    /// Parse the first existing candidate.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if a candidate cannot be read (or an
    /// explicit path is missing) and `ParseError` for invalid TOML.
    pub fn load(&self) -> Result<ShellConfig, ConfigError> {
        let path = match self.find_config_file() {
            Some(path) => path,
            None if self.explicit => self.candidates[0].clone(),
            None => {
                tracing::debug!(candidates = ?self.candidates, "No config file, using defaults");
                return Ok(ShellConfig::default());
            }
        };

        tracing::debug!(path = %path.display(), "Reading config");
        parse_file(&path)
    }

    /// Locations tried, highest priority first.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// The candidate `load` would read, if any exists.
    #[must_use]
    pub fn find_config_file(&self) -> Option<PathBuf> {
        self.candidates.iter().find(|p| p.is_file()).cloned()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_file(path: &Path) -> Result<ShellConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}
