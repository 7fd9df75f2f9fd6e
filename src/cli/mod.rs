//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments, resolves settings, wires the
//! completion and speech services, and dispatches to the interactive loop or
//! one of the TUI-less commands.

pub mod oneshot;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::core::app::Services;
use crate::core::chat_stream::ChatCompletionClient;
use crate::core::config::{path_display, Config, Settings, SettingsOverrides};
use crate::core::speech::detect_speech_engine;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::{init_tracing, LogTarget};

#[derive(Parser)]
#[command(name = "arihante")]
#[command(about = "A minimal shop assistant for the terminal")]
#[command(
    long_about = "Arihante asks a language model for one useful task for your shop today, \
or helps you fix a problem you describe by typing or speaking. Answers can be followed \
up with more questions.\n\n\
Environment Variables:\n\
  OPENAI_API_KEY    API key (the variable name can be changed with `set api-key-env`)\n\
  OPENAI_BASE_URL   Custom API base URL (optional, defaults to https://api.openai.com/v1)\n\
  RUST_LOG          Log filter for the diagnostic log\n\n\
Controls:\n\
  1 / d             Today's task (home screen)\n\
  2 / p             Describe a problem (home screen)\n\
  Enter             Solve / ask a follow-up\n\
  Esc               Back, or done on the answer screen\n\
  Ctrl+V            Speak instead of typing (needs a voice command)\n\
  Ctrl+U            Clear the input\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to request answers from
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// API base URL (OpenAI-compatible)
    #[arg(short = 'b', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Write the diagnostic log to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,

    /// Disable voice capture even when a voice command is configured
    #[arg(long, global = true)]
    pub no_voice: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive interface (default)
    Chat,
    /// Print today's suggested task and exit
    Daily,
    /// Describe a problem and print the answer
    Ask {
        /// Problem description
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value for the key (multiple words are joined, except for voice-command)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Show the current configuration
    Config,
}

impl Args {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            log_file: self.log.clone(),
            disable_voice: self.no_voice,
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let overrides = args.overrides();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            config.set_key(&key, value)?;
            let path = config.save()?;
            println!("✅ Set {key} in {}", path_display(&path));
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            config.unset_key(&key)?;
            let path = config.save()?;
            println!("✅ Unset {key} in {}", path_display(&path));
            Ok(())
        }
        Commands::Config => {
            if let Ok(path) = Config::config_path() {
                println!("Config file: {}", path_display(&path));
            }
            Config::load()?.print_all();
            Ok(())
        }
        Commands::Chat => {
            let settings = Settings::resolve(&Config::load()?, &overrides);
            init_tracing(LogTarget::File(interactive_log_path(&settings)))?;
            let services = build_services(&settings)?;
            run_chat(&settings, services).await
        }
        Commands::Daily => {
            let settings = Settings::resolve(&Config::load()?, &overrides);
            init_tracing(LogTarget::Stderr)?;
            let services = build_services(&settings)?;
            let answer = oneshot::run_daily(&settings, services).await?;
            println!("{answer}");
            Ok(())
        }
        Commands::Ask { text } => {
            let text = problem_text(text)?;
            let settings = Settings::resolve(&Config::load()?, &overrides);
            init_tracing(LogTarget::Stderr)?;
            let services = build_services(&settings)?;
            let answer = oneshot::run_ask(&settings, services, text).await?;
            println!("{answer}");
            Ok(())
        }
    }
}

/// Join the words of `ask` into one problem description. Blank input is an
/// error rather than a silent no-op.
fn problem_text(words: Vec<String>) -> Result<String, Box<dyn Error>> {
    let text = words.join(" ");
    if text.trim().is_empty() {
        return Err("nothing to ask. Usage: arihante ask <problem description...>".into());
    }
    Ok(text)
}

fn interactive_log_path(settings: &Settings) -> PathBuf {
    settings
        .log_file
        .as_ref()
        .map(PathBuf::from)
        .or_else(Config::default_log_path)
        .unwrap_or_else(|| PathBuf::from("arihante.log"))
}

fn build_services(settings: &Settings) -> Result<Services, Box<dyn Error>> {
    let client = ChatCompletionClient::from_settings(settings)?;
    debug!(model = %client.model(), base_url = %client.base_url(), "completion client ready");
    Ok(Services {
        completion: Arc::new(client),
        speech: detect_speech_engine(settings),
    })
}
