use tracing::{debug, info, warn};

use super::{AppCommand, GenerateRequest};
use crate::core::app::{App, ResultData, View};
use crate::core::completion::CompletionError;

pub(super) fn request_daily_suggestion(app: &mut App) -> Option<AppCommand> {
    if app.view != View::Home {
        debug!(view = ?app.view_state(), "daily suggestion ignored outside home");
        return None;
    }

    let prompt = app.daily_prompt.clone();
    Some(begin_request(app, prompt, None))
}

pub(super) fn submit_input(app: &mut App) -> Option<AppCommand> {
    let context = match &app.view {
        View::InputProblem => None,
        View::Result(result) => Some(result.answer.clone()),
        _ => {
            debug!(view = ?app.view_state(), "submit ignored without an input surface");
            return None;
        }
    };

    if app.input.trim().is_empty() {
        return None;
    }

    let prompt = app.input.clone();
    Some(begin_request(app, prompt, context))
}

// The view switches to Loading before the command leaves the container.
fn begin_request(app: &mut App, prompt: String, context: Option<String>) -> AppCommand {
    app.request_seq += 1;
    let request_id = app.request_seq;
    app.pending_request = Some(request_id);
    app.view = View::Loading;

    info!(request_id, follow_up = context.is_some(), "issuing completion request");
    AppCommand::Generate(GenerateRequest {
        request_id,
        prompt,
        context,
    })
}

pub(super) fn settle_request(
    app: &mut App,
    request_id: u64,
    outcome: Result<String, CompletionError>,
) {
    if app.pending_request != Some(request_id) || app.view != View::Loading {
        debug!(request_id, pending = ?app.pending_request, "discarding stale completion");
        return;
    }
    app.pending_request = None;

    match outcome {
        Ok(answer) => {
            info!(request_id, "completion succeeded");
            app.view = View::Result(ResultData { answer });
            app.input.clear();
        }
        Err(err) => {
            warn!(request_id, error = %err, "completion failed; returning home");
            app.view = View::Home;
        }
    }
}
