use tracing::debug;

use super::{AppCommand, CaptureRequest};
use crate::core::app::{App, View};
use crate::core::speech::VoiceOutcome;

pub(super) fn start_voice_capture(app: &mut App) -> Option<AppCommand> {
    if !app.voice_capability {
        debug!("voice capture requested without a speech engine");
        return None;
    }
    if !app.accepts_input() {
        debug!(view = ?app.view_state(), "voice capture ignored without an input surface");
        return None;
    }
    // One activation at a time; a second press while listening is rejected.
    if app.listening {
        debug!(capture_id = ?app.pending_capture, "voice capture already running");
        return None;
    }

    app.capture_seq += 1;
    let capture_id = app.capture_seq;
    app.pending_capture = Some(capture_id);
    app.listening = true;

    debug!(capture_id, locale = %app.voice_locale, "voice capture started");
    Some(AppCommand::CaptureVoice(CaptureRequest {
        capture_id,
        locale: app.voice_locale.clone(),
    }))
}

pub(super) fn settle_voice_capture(app: &mut App, capture_id: u64, outcome: VoiceOutcome) {
    if app.pending_capture != Some(capture_id) {
        debug!(capture_id, pending = ?app.pending_capture, "discarding stale voice result");
        return;
    }
    app.pending_capture = None;
    app.listening = false;

    match outcome {
        // The user left the input screen (or submitted) while listening.
        VoiceOutcome::Transcript(_) if !app.accepts_input() => {
            debug!(capture_id, view = ?app.view_state(), "discarding transcript without an input surface");
        }
        VoiceOutcome::Transcript(text) if !text.trim().is_empty() => {
            let text = text.trim();
            if app.view == View::InputProblem && !app.input.is_empty() {
                app.input.push(' ');
                app.input.push_str(text);
            } else {
                app.input = text.to_string();
            }
            debug!(capture_id, "voice transcript applied");
        }
        VoiceOutcome::Transcript(_) | VoiceOutcome::Ended => {
            debug!(capture_id, "voice capture ended without speech");
        }
        VoiceOutcome::Error(message) => {
            debug!(capture_id, error = %message, "voice capture failed");
        }
    }
}
