//! Interaction controller state.
//!
//! [`App`] is the single state container for the assistant. It is mutated
//! only through [`apply_action`]; the renderer and the CLI observe it through
//! read accessors. Side effects (remote completions, voice capture) leave the
//! container as [`AppCommand`]s and come back as settlement actions.

pub mod actions;
pub mod runner;


use std::sync::Arc;

use tokio::sync::Mutex;

use crate::core::config::Settings;

pub use actions::{
    apply_action, apply_actions, AppAction, AppActionDispatcher, AppCommand, CaptureRequest,
    GenerateRequest,
};
pub use runner::{AppRunner, Services};

/// The screen currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Home,
    InputProblem,
    Loading,
    Result,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultData {
    pub answer: String,
}

// The answer lives inside the `Result` variant so it cannot outlive the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
enum View {
    Home,
    InputProblem,
    Loading,
    Result(ResultData),
}

pub struct App {
    view: View,
    input: String,
    voice_capability: bool,
    listening: bool,
    request_seq: u64,
    pending_request: Option<u64>,
    capture_seq: u64,
    pending_capture: Option<u64>,
    daily_prompt: String,
    voice_locale: String,
    exit_requested: bool,
}

impl App {
    pub fn new(daily_prompt: impl Into<String>, voice_locale: impl Into<String>, voice_capability: bool) -> Self {
        Self {
            view: View::Home,
            input: String::new(),
            voice_capability,
            listening: false,
            request_seq: 0,
            pending_request: None,
            capture_seq: 0,
            pending_capture: None,
            daily_prompt: daily_prompt.into(),
            voice_locale: voice_locale.into(),
            exit_requested: false,
        }
    }

    pub fn from_settings(settings: &Settings, voice_capability: bool) -> Self {
        Self::new(
            settings.daily_prompt.clone(),
            settings.voice_locale.clone(),
            voice_capability,
        )
    }

    pub fn view_state(&self) -> ViewState {
        match self.view {
            View::Home => ViewState::Home,
            View::InputProblem => ViewState::InputProblem,
            View::Loading => ViewState::Loading,
            View::Result(_) => ViewState::Result,
        }
    }

    pub fn result(&self) -> Option<&ResultData> {
        match &self.view {
            View::Result(result) => Some(result),
            _ => None,
        }
    }

    pub fn input_text(&self) -> &str {
        &self.input
    }

    /// Whether the current buffer may be submitted.
    pub fn can_submit(&self) -> bool {
        matches!(self.view, View::InputProblem | View::Result(_)) && !self.input.trim().is_empty()
    }

    /// Whether the current screen has an input surface at all.
    pub fn accepts_input(&self) -> bool {
        matches!(self.view, View::InputProblem | View::Result(_))
    }

    pub fn voice_capability(&self) -> bool {
        self.voice_capability
    }

    /// Whether the voice control should be offered on the current screen.
    pub fn voice_available(&self) -> bool {
        self.voice_capability && self.accepts_input()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn pending_request(&self) -> Option<u64> {
        self.pending_request
    }

    pub fn pending_capture(&self) -> Option<u64> {
        self.pending_capture
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

/// Shared handle used by the interactive loop, which needs the state behind
/// an async mutex while frames are drawn.
#[derive(Clone)]
pub struct AppHandle {
    inner: Arc<Mutex<App>>,
}

impl AppHandle {
    pub fn new(app: App) -> Self {
        Self {
            inner: Arc::new(Mutex::new(app)),
        }
    }

    pub async fn read<R>(&self, f: impl FnOnce(&App) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&guard)
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut App) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }
}
