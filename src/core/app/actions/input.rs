use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use super::AppAction;
use crate::core::app::{App, View};
use crate::utils::input::sanitize_text_input;

pub(super) fn handle_input_action(app: &mut App, action: AppAction) {
    match action {
        AppAction::RequestProblemEntry => {
            if app.view == View::Home {
                app.view = View::InputProblem;
            } else {
                reject(app, "request_problem_entry");
            }
        }
        // Leaving the problem screen keeps whatever was typed.
        AppAction::NavigateBack => {
            if app.view == View::InputProblem {
                app.view = View::Home;
            } else {
                reject(app, "navigate_back");
            }
        }
        AppAction::Done => {
            if matches!(app.view, View::Result(_)) {
                app.view = View::Home;
                app.input.clear();
            } else {
                reject(app, "done");
            }
        }
        AppAction::InsertChar { ch } => {
            if app.accepts_input() && !ch.is_control() {
                app.input.push(ch);
            }
        }
        AppAction::InsertIntoInput { text } => {
            if app.accepts_input() {
                app.input.push_str(&sanitize_text_input(&text));
            }
        }
        AppAction::Backspace => {
            if app.accepts_input() {
                if let Some((offset, _)) = app.input.grapheme_indices(true).next_back() {
                    app.input.truncate(offset);
                }
            }
        }
        AppAction::ClearInput => {
            if app.accepts_input() {
                app.input.clear();
            }
        }
        other => reject(app, other.name()),
    }
}

fn reject(app: &App, action: &str) {
    debug!(action, view = ?app.view_state(), "transition not available");
}
