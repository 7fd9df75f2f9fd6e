use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// On-disk configuration. Every field is optional; unset fields fall back to
/// the environment or built-in defaults when resolved into
/// [`Settings`](super::Settings).
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Base URL of an OpenAI-compatible API (e.g., "https://api.openai.com/v1")
    pub base_url: Option<String>,
    pub model: Option<String>,
    /// Name of the environment variable that holds the API key
    pub api_key_env: Option<String>,
    pub system_prompt: Option<String>,
    /// Prompt sent when the user asks for today's task
    pub daily_prompt: Option<String>,
    /// External recognizer: program followed by its arguments. It must print
    /// one transcript line on stdout and exit.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub voice_command: Vec<String>,
    pub voice_locale: Option<String>,
    pub voice_enabled: Option<bool>,
    pub log_file: Option<String>,
}

/// Keys accepted by `arihante set` / `arihante unset`.
pub const CONFIG_KEYS: &[&str] = &[
    "base-url",
    "model",
    "api-key-env",
    "system-prompt",
    "daily-prompt",
    "voice-command",
    "voice-locale",
    "voice-enabled",
    "log-file",
];

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigKeyError {
    UnknownKey(String),
    InvalidValue { key: String, value: String },
}

impl std::fmt::Display for ConfigKeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigKeyError::UnknownKey(key) => write!(
                f,
                "Unknown config key: {key} (expected one of: {})",
                CONFIG_KEYS.join(", ")
            ),
            ConfigKeyError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {key}: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigKeyError {}

impl Config {
    /// Set a key from its command-line spelling. Multi-word values arrive
    /// already split; `voice-command` keeps the words as program + args.
    pub fn set_key(&mut self, key: &str, words: Vec<String>) -> Result<(), ConfigKeyError> {
        let value = words.join(" ");
        match key {
            "base-url" => self.base_url = Some(value),
            "model" => self.model = Some(value),
            "api-key-env" => self.api_key_env = Some(value),
            "system-prompt" => self.system_prompt = Some(value),
            "daily-prompt" => self.daily_prompt = Some(value),
            "voice-command" => self.voice_command = words,
            "voice-locale" => self.voice_locale = Some(value),
            "voice-enabled" => {
                self.voice_enabled = Some(parse_bool(&value).ok_or_else(|| {
                    ConfigKeyError::InvalidValue {
                        key: key.to_string(),
                        value: value.clone(),
                    }
                })?)
            }
            "log-file" => self.log_file = Some(value),
            _ => return Err(ConfigKeyError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn unset_key(&mut self, key: &str) -> Result<(), ConfigKeyError> {
        match key {
            "base-url" => self.base_url = None,
            "model" => self.model = None,
            "api-key-env" => self.api_key_env = None,
            "system-prompt" => self.system_prompt = None,
            "daily-prompt" => self.daily_prompt = None,
            "voice-command" => self.voice_command.clear(),
            "voice-locale" => self.voice_locale = None,
            "voice-enabled" => self.voice_enabled = None,
            "log-file" => self.log_file = None,
            _ => return Err(ConfigKeyError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Get a user-friendly display string for a path, using `~` for the home
/// directory on Unix-like systems.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
