mod input;
mod request;
mod voice;

use tokio::sync::mpsc;

use super::App;
use crate::core::completion::CompletionError;
use crate::core::speech::VoiceOutcome;

pub enum AppAction {
    RequestDailySuggestion,
    RequestProblemEntry,
    NavigateBack,
    Submit,
    Done,
    InsertChar {
        ch: char,
    },
    InsertIntoInput {
        text: String,
    },
    Backspace,
    ClearInput,
    StartVoiceCapture,
    RequestSettled {
        request_id: u64,
        outcome: Result<String, CompletionError>,
    },
    VoiceCaptureSettled {
        capture_id: u64,
        outcome: VoiceOutcome,
    },
    Quit,
}

impl AppAction {
    pub fn name(&self) -> &'static str {
        match self {
            AppAction::RequestDailySuggestion => "request_daily_suggestion",
            AppAction::RequestProblemEntry => "request_problem_entry",
            AppAction::NavigateBack => "navigate_back",
            AppAction::Submit => "submit",
            AppAction::Done => "done",
            AppAction::InsertChar { .. } => "insert_char",
            AppAction::InsertIntoInput { .. } => "insert_into_input",
            AppAction::Backspace => "backspace",
            AppAction::ClearInput => "clear_input",
            AppAction::StartVoiceCapture => "start_voice_capture",
            AppAction::RequestSettled { .. } => "request_settled",
            AppAction::VoiceCaptureSettled { .. } => "voice_capture_settled",
            AppAction::Quit => "quit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub request_id: u64,
    pub prompt: String,
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub capture_id: u64,
    pub locale: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Generate(GenerateRequest),
    CaptureVoice(CaptureRequest),
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppAction>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppAction>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        let _ = self.tx.send(action);
    }
}

pub fn apply_actions(app: &mut App, actions: impl IntoIterator<Item = AppAction>) -> Vec<AppCommand> {
    actions
        .into_iter()
        .filter_map(|action| apply_action(app, action))
        .collect()
}

/// Apply one action. Actions that make no sense on the current screen are
/// no-ops; the returned command, if any, must be executed by the caller.
pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::RequestDailySuggestion => request::request_daily_suggestion(app),
        AppAction::Submit => request::submit_input(app),
        AppAction::RequestSettled {
            request_id,
            outcome,
        } => {
            request::settle_request(app, request_id, outcome);
            None
        }

        AppAction::StartVoiceCapture => voice::start_voice_capture(app),
        AppAction::VoiceCaptureSettled {
            capture_id,
            outcome,
        } => {
            voice::settle_voice_capture(app, capture_id, outcome);
            None
        }

        AppAction::Quit => {
            app.exit_requested = true;
            None
        }

        action @ (AppAction::RequestProblemEntry
        | AppAction::NavigateBack
        | AppAction::Done
        | AppAction::InsertChar { .. }
        | AppAction::InsertIntoInput { .. }
        | AppAction::Backspace
        | AppAction::ClearInput) => {
            input::handle_input_action(app, action);
            None
        }
    }
}
