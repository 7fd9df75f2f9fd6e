use crate::core::config::data::Config;

fn or_unset(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("(unset)")
}

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        println!("  base-url: {}", or_unset(&self.base_url));
        println!("  model: {}", or_unset(&self.model));
        println!("  api-key-env: {}", or_unset(&self.api_key_env));
        println!("  system-prompt: {}", or_unset(&self.system_prompt));
        println!("  daily-prompt: {}", or_unset(&self.daily_prompt));
        if self.voice_command.is_empty() {
            println!("  voice-command: (unset)");
        } else {
            println!("  voice-command: {}", self.voice_command.join(" "));
        }
        println!("  voice-locale: {}", or_unset(&self.voice_locale));
        match self.voice_enabled {
            Some(true) => println!("  voice-enabled: on"),
            Some(false) => println!("  voice-enabled: off"),
            None => println!("  voice-enabled: (unset)"),
        }
        println!("  log-file: {}", or_unset(&self.log_file));
    }
}
