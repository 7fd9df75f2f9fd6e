//! Command execution for the interaction controller.
//!
//! The runner owns the action queue. Commands produced by transitions are
//! spawned on tokio; each one settles exactly once by dispatching a
//! settlement action back into the queue, where it is applied in order with
//! user input.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::actions::{apply_action, AppAction, AppActionDispatcher, AppCommand};
use super::App;
use crate::core::completion::CompletionService;
use crate::core::speech::{SpeechEngine, VoiceOutcome};

#[derive(Clone)]
pub struct Services {
    pub completion: Arc<dyn CompletionService>,
    pub speech: Option<Arc<dyn SpeechEngine>>,
}

impl Services {
    pub fn voice_capability(&self) -> bool {
        self.speech.is_some()
    }
}

pub struct AppRunner {
    services: Services,
    dispatcher: AppActionDispatcher,
    action_rx: mpsc::UnboundedReceiver<AppAction>,
    shutdown: CancellationToken,
}

impl AppRunner {
    pub fn new(services: Services) -> Self {
        let (tx, action_rx) = mpsc::unbounded_channel();
        Self {
            services,
            dispatcher: AppActionDispatcher::new(tx),
            action_rx,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn dispatcher(&self) -> AppActionDispatcher {
        self.dispatcher.clone()
    }

    pub fn execute(&self, command: AppCommand) {
        match command {
            AppCommand::Generate(request) => {
                let completion = self.services.completion.clone();
                let dispatcher = self.dispatcher.clone();
                let shutdown = self.shutdown.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        outcome = completion.generate(&request.prompt, request.context.as_deref()) => {
                            dispatcher.dispatch(AppAction::RequestSettled {
                                request_id: request.request_id,
                                outcome,
                            });
                        }
                        _ = shutdown.cancelled() => {
                            debug!(request_id = request.request_id, "completion abandoned at shutdown");
                        }
                    }
                });
            }
            AppCommand::CaptureVoice(request) => {
                let Some(engine) = self.services.speech.clone() else {
                    self.dispatcher.dispatch(AppAction::VoiceCaptureSettled {
                        capture_id: request.capture_id,
                        outcome: VoiceOutcome::Error("no speech engine".to_string()),
                    });
                    return;
                };
                let dispatcher = self.dispatcher.clone();
                let shutdown = self.shutdown.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        outcome = engine.recognize_once(&request.locale) => {
                            dispatcher.dispatch(AppAction::VoiceCaptureSettled {
                                capture_id: request.capture_id,
                                outcome,
                            });
                        }
                        _ = shutdown.cancelled() => {}
                    }
                });
            }
        }
    }

    /// Take every action queued so far without waiting.
    pub fn drain(&mut self) -> Vec<AppAction> {
        let mut pending = Vec::new();
        while let Ok(action) = self.action_rx.try_recv() {
            pending.push(action);
        }
        pending
    }

    /// Apply `action` and execute whatever command it produced.
    pub fn apply(&self, app: &mut App, action: AppAction) {
        if let Some(command) = apply_action(app, action) {
            self.execute(command);
        }
    }

    /// Apply `actions`, then keep applying settlements until no request or
    /// voice capture is outstanding. Used by the TUI-less commands and tests.
    pub async fn run_until_settled(&mut self, app: &mut App, actions: impl IntoIterator<Item = AppAction>) {
        for action in actions {
            self.apply(app, action);
        }

        while app.pending_request().is_some() || app.pending_capture().is_some() {
            match self.action_rx.recv().await {
                Some(action) => self.apply(app, action),
                None => break,
            }
        }

        for action in self.drain() {
            self.apply(app, action);
        }
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for AppRunner {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
