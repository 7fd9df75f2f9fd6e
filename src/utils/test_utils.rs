use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::app::{App, Services};
use crate::core::completion::{CompletionError, CompletionService};
use crate::core::speech::{SpeechEngine, VoiceOutcome};

pub const TEST_DAILY_PROMPT: &str = "Give me one meaningful task for my shop today.";

pub fn create_test_app() -> App {
    App::new(TEST_DAILY_PROMPT, "en-US", true)
}

pub fn create_test_app_without_voice() -> App {
    App::new(TEST_DAILY_PROMPT, "en-US", false)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub prompt: String,
    pub context: Option<String>,
}

/// Completion service that replays scripted outcomes and records each call.
/// `Err` entries become API errors carrying the given message.
#[derive(Clone, Default)]
pub struct FakeCompletion {
    responses: Arc<Mutex<VecDeque<Result<String, String>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl FakeCompletion {
    pub fn new(responses: impl IntoIterator<Item = Result<String, String>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().collect())),
            calls: Arc::default(),
        }
    }

    pub fn answering(answers: &[&str]) -> Self {
        Self::new(answers.iter().map(|a| Ok(a.to_string())))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl CompletionService for FakeCompletion {
    async fn generate(&self, prompt: &str, context: Option<&str>) -> Result<String, CompletionError> {
        self.calls.lock().expect("calls lock").push(RecordedCall {
            prompt: prompt.to_string(),
            context: context.map(str::to_string),
        });
        let next = self.responses.lock().expect("responses lock").pop_front();
        match next {
            Some(Ok(answer)) => Ok(answer),
            Some(Err(message)) => Err(CompletionError::Api {
                status: Some(500),
                message,
            }),
            None => Err(CompletionError::EmptyAnswer),
        }
    }
}

/// Speech engine that replays scripted outcomes and records requested locales.
#[derive(Clone, Default)]
pub struct FakeSpeech {
    outcomes: Arc<Mutex<VecDeque<VoiceOutcome>>>,
    locales: Arc<Mutex<Vec<String>>>,
}

impl FakeSpeech {
    pub fn new(outcomes: impl IntoIterator<Item = VoiceOutcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(outcomes.into_iter().collect())),
            locales: Arc::default(),
        }
    }

    pub fn locales(&self) -> Vec<String> {
        self.locales.lock().expect("locales lock").clone()
    }
}

#[async_trait]
impl SpeechEngine for FakeSpeech {
    async fn recognize_once(&self, locale: &str) -> VoiceOutcome {
        self.locales.lock().expect("locales lock").push(locale.to_string());
        self.outcomes
            .lock()
            .expect("outcomes lock")
            .pop_front()
            .unwrap_or(VoiceOutcome::Ended)
    }
}

pub fn test_services(completion: &FakeCompletion, speech: Option<&FakeSpeech>) -> Services {
    Services {
        completion: Arc::new(completion.clone()),
        speech: speech.map(|s| Arc::new(s.clone()) as Arc<dyn SpeechEngine>),
    }
}
