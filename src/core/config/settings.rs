use crate::core::config::data::Config;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_VOICE_LOCALE: &str = "en-US";
pub const DEFAULT_DAILY_PROMPT: &str = "Give me one meaningful task for my shop today.";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a practical assistant for a small shop owner. \
Answer in two or three short sentences with one concrete action. \
No lists, no headings, no preamble.";

/// Values supplied on the command line; they win over the config file.
#[derive(Debug, Default, Clone)]
pub struct SettingsOverrides {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub log_file: Option<String>,
    pub disable_voice: bool,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
    pub system_prompt: String,
    pub daily_prompt: String,
    pub voice_command: Vec<String>,
    pub voice_locale: String,
    pub voice_enabled: bool,
    pub log_file: Option<String>,
}

impl Settings {
    pub fn resolve(config: &Config, overrides: &SettingsOverrides) -> Self {
        let env_base_url = std::env::var("OPENAI_BASE_URL").ok();
        Self::resolve_with_env(config, overrides, env_base_url)
    }

    /// Resolution order: command line, config file, environment, default.
    pub fn resolve_with_env(
        config: &Config,
        overrides: &SettingsOverrides,
        env_base_url: Option<String>,
    ) -> Self {
        let non_blank = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());

        Self {
            base_url: non_blank(&overrides.base_url)
                .or_else(|| non_blank(&config.base_url))
                .or_else(|| non_blank(&env_base_url))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: non_blank(&overrides.model)
                .or_else(|| non_blank(&config.model))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key_env: non_blank(&config.api_key_env)
                .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            daily_prompt: non_blank(&config.daily_prompt)
                .unwrap_or_else(|| DEFAULT_DAILY_PROMPT.to_string()),
            voice_command: config.voice_command.clone(),
            voice_locale: non_blank(&config.voice_locale)
                .unwrap_or_else(|| DEFAULT_VOICE_LOCALE.to_string()),
            voice_enabled: !overrides.disable_voice && config.voice_enabled.unwrap_or(true),
            log_file: non_blank(&overrides.log_file).or_else(|| non_blank(&config.log_file)),
        }
    }
}
