use crate::core::config::data::{path_display, Config};
use directories::ProjectDirs;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Errors that can occur when loading configuration from disk.
#[derive(Debug)]
pub enum ConfigError {
    /// No platform configuration directory could be determined.
    NoConfigDir,

    /// Failed to read the configuration file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the configuration file as valid TOML.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Failed to determine config directory"),
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path_display(path), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse config at {}: {}", path_display(path), source)
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::NoConfigDir => None,
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "arihante", "arihante")
}

impl Config {
    pub fn load() -> Result<Config, ConfigError> {
        Self::load_from_path(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<PathBuf, Box<dyn StdError>> {
        let path = Self::config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })
    }

    pub(crate) fn save_to_path(&self, config_path: &Path) -> Result<(), Box<dyn StdError>> {
        let parent = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());

        if let Some(dir) = parent {
            fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };

        temp_file.write_all(contents.as_bytes())?;
        temp_file.as_file_mut().sync_all()?;
        temp_file
            .persist(config_path)
            .map_err(|err| -> Box<dyn StdError> { Box::new(err) })?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        project_dirs()
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Default location of the diagnostic log written while the TUI runs.
    pub fn default_log_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_local_dir().join("arihante.log"))
    }
}
