//! Speech-to-text capability.
//!
//! An engine runs one non-continuous recognition cycle per activation and
//! settles with exactly one [`VoiceOutcome`]. Availability is detected once
//! at startup; when no engine is detected the voice control is never offered.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::core::config::Settings;

/// Environment variable through which the recognizer receives its locale.
pub const SPEECH_LANG_ENV: &str = "ARIHANTE_SPEECH_LANG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceOutcome {
    Transcript(String),
    Error(String),
    /// The cycle ended without recognizing anything.
    Ended,
}

#[async_trait]
pub trait SpeechEngine: Send + Sync {
    async fn recognize_once(&self, locale: &str) -> VoiceOutcome;
}

/// Runs an external recognizer command once per activation. The command is
/// expected to listen for a single utterance, print the transcript on stdout
/// and exit.
pub struct CommandSpeechEngine {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandSpeechEngine {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl SpeechEngine for CommandSpeechEngine {
    async fn recognize_once(&self, locale: &str) -> VoiceOutcome {
        let output = Command::new(&self.program)
            .args(&self.args)
            .env(SPEECH_LANG_ENV, locale)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) => return VoiceOutcome::Error(format!("failed to run recognizer: {e}")),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return VoiceOutcome::Error(format!(
                "recognizer exited with {}: {}",
                output.status,
                stderr.trim()
            ));
        }

        transcript_from_stdout(&String::from_utf8_lossy(&output.stdout))
    }
}

fn transcript_from_stdout(stdout: &str) -> VoiceOutcome {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| VoiceOutcome::Transcript(line.to_string()))
        .unwrap_or(VoiceOutcome::Ended)
}

/// Resolve a program name the way a shell would: paths are checked directly,
/// bare names are searched on `PATH`.
fn resolve_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths).find_map(|dir| {
        let full = dir.join(program);
        if full.is_file() {
            return Some(full);
        }
        if cfg!(windows) {
            let exe = full.with_extension("exe");
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

/// Feature-detect the speech engine from settings.
pub fn detect_speech_engine(settings: &Settings) -> Option<Arc<dyn SpeechEngine>> {
    if !settings.voice_enabled {
        debug!("voice capture disabled");
        return None;
    }

    let (program, args) = settings.voice_command.split_first()?;
    match resolve_program(program) {
        Some(path) => {
            debug!(program = %path.display(), "voice capture available");
            Some(Arc::new(CommandSpeechEngine::new(path, args.to_vec())))
        }
        None => {
            debug!(program = %program, "voice recognizer not found; voice capture unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{Config, SettingsOverrides};

    fn settings_with_command(command: &[&str]) -> Settings {
        let config = Config {
            voice_command: command.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        Settings::resolve_with_env(&config, &SettingsOverrides::default(), None)
    }

    #[test]
    fn first_non_empty_line_is_the_transcript() {
        assert_eq!(
            transcript_from_stdout("\n  fix my shelf \nignored\n"),
            VoiceOutcome::Transcript("fix my shelf".into())
        );
        assert_eq!(transcript_from_stdout("  \n\n"), VoiceOutcome::Ended);
    }

    #[test]
    fn no_command_means_no_engine() {
        assert!(detect_speech_engine(&settings_with_command(&[])).is_none());
    }

    #[test]
    fn missing_program_means_no_engine() {
        let settings = settings_with_command(&["/definitely/not/a/recognizer"]);
        assert!(detect_speech_engine(&settings).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn disabled_voice_skips_detection() {
        let mut settings = settings_with_command(&["/bin/sh"]);
        assert!(detect_speech_engine(&settings).is_some());
        settings.voice_enabled = false;
        assert!(detect_speech_engine(&settings).is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn command_engine_passes_locale_and_reads_stdout() {
        let engine = CommandSpeechEngine::new(
            "/bin/sh",
            vec![
                "-c".into(),
                format!("echo \"hello ${}\"", SPEECH_LANG_ENV),
            ],
        );
        assert_eq!(
            engine.recognize_once("hi-IN").await,
            VoiceOutcome::Transcript("hello hi-IN".into())
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn command_engine_reports_failures() {
        let engine =
            CommandSpeechEngine::new("/bin/sh", vec!["-c".into(), "echo nope >&2; exit 3".into()]);
        match engine.recognize_once("en-US").await {
            VoiceOutcome::Error(message) => assert!(message.contains("nope")),
            other => panic!("expected error, got {other:?}"),
        }

        let silent = CommandSpeechEngine::new("/bin/sh", vec!["-c".into(), "true".into()]);
        assert_eq!(silent.recognize_once("en-US").await, VoiceOutcome::Ended);
    }
}
