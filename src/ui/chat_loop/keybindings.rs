//! Screen-aware key mapping.
//!
//! Keys translate into controller actions; whether an action is valid on the
//! current screen is still decided by the controller.

use crate::core::app::{App, AppAction, ViewState};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn action_for_key(app: &App, key: &KeyEvent) -> Option<AppAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && matches!(key.code, KeyCode::Char('c')) {
        return Some(AppAction::Quit);
    }

    match app.view_state() {
        ViewState::Home => home_action(key),
        ViewState::Loading => None,
        view @ (ViewState::InputProblem | ViewState::Result) => editing_action(app, view, key),
    }
}

fn home_action(key: &KeyEvent) -> Option<AppAction> {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    match key.code {
        KeyCode::Char('1') | KeyCode::Char('d') => Some(AppAction::RequestDailySuggestion),
        KeyCode::Char('2') | KeyCode::Char('p') => Some(AppAction::RequestProblemEntry),
        KeyCode::Char('q') | KeyCode::Esc => Some(AppAction::Quit),
        _ => None,
    }
}

fn editing_action(app: &App, view: ViewState, key: &KeyEvent) -> Option<AppAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Enter => Some(AppAction::Submit),
        KeyCode::Esc => Some(match view {
            ViewState::Result => AppAction::Done,
            _ => AppAction::NavigateBack,
        }),
        KeyCode::Backspace => Some(AppAction::Backspace),
        KeyCode::Char('v') if ctrl => app.voice_available().then_some(AppAction::StartVoiceCapture),
        KeyCode::Char('d') if ctrl && view == ViewState::Result => Some(AppAction::Done),
        KeyCode::Char('u') if ctrl => Some(AppAction::ClearInput),
        KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => None,
        KeyCode::Char(ch) => Some(AppAction::InsertChar { ch }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::apply_action;
    use crate::utils::test_utils::{create_test_app, create_test_app_without_voice};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn name(action: Option<AppAction>) -> Option<&'static str> {
        action.map(|a| a.name())
    }

    #[test]
    fn home_keys_pick_an_entry_point() {
        let app = create_test_app();
        assert_eq!(
            name(action_for_key(&app, &key(KeyCode::Char('1')))),
            Some("request_daily_suggestion")
        );
        assert_eq!(
            name(action_for_key(&app, &key(KeyCode::Char('p')))),
            Some("request_problem_entry")
        );
        assert_eq!(name(action_for_key(&app, &key(KeyCode::Esc))), Some("quit"));
        assert_eq!(name(action_for_key(&app, &key(KeyCode::Char('x')))), None);
    }

    #[test]
    fn ctrl_c_quits_on_every_screen() {
        let mut app = create_test_app();
        assert_eq!(name(action_for_key(&app, &ctrl('c'))), Some("quit"));
        apply_action(&mut app, AppAction::RequestDailySuggestion);
        assert_eq!(app.view_state(), ViewState::Loading);
        assert_eq!(name(action_for_key(&app, &ctrl('c'))), Some("quit"));
    }

    #[test]
    fn loading_ignores_other_keys() {
        let mut app = create_test_app();
        apply_action(&mut app, AppAction::RequestDailySuggestion);
        for code in [KeyCode::Enter, KeyCode::Esc, KeyCode::Char('a')] {
            assert!(action_for_key(&app, &key(code)).is_none());
        }
    }

    #[test]
    fn problem_screen_edits_and_navigates() {
        let mut app = create_test_app();
        apply_action(&mut app, AppAction::RequestProblemEntry);

        assert_eq!(
            name(action_for_key(&app, &key(KeyCode::Char('q')))),
            Some("insert_char")
        );
        assert_eq!(name(action_for_key(&app, &key(KeyCode::Enter))), Some("submit"));
        assert_eq!(
            name(action_for_key(&app, &key(KeyCode::Esc))),
            Some("navigate_back")
        );
        assert_eq!(name(action_for_key(&app, &ctrl('u'))), Some("clear_input"));
        assert_eq!(name(action_for_key(&app, &ctrl('d'))), None);
    }

    #[test]
    fn result_screen_escape_means_done() {
        let mut app = create_test_app();
        let command = apply_action(&mut app, AppAction::RequestDailySuggestion);
        let Some(crate::core::app::AppCommand::Generate(request)) = command else {
            panic!("expected generate command");
        };
        apply_action(
            &mut app,
            AppAction::RequestSettled {
                request_id: request.request_id,
                outcome: Ok("answer".into()),
            },
        );

        assert_eq!(name(action_for_key(&app, &key(KeyCode::Esc))), Some("done"));
        assert_eq!(name(action_for_key(&app, &ctrl('d'))), Some("done"));
    }

    #[test]
    fn voice_key_requires_capability() {
        let mut app = create_test_app();
        apply_action(&mut app, AppAction::RequestProblemEntry);
        assert_eq!(
            name(action_for_key(&app, &ctrl('v'))),
            Some("start_voice_capture")
        );

        let mut app = create_test_app_without_voice();
        apply_action(&mut app, AppAction::RequestProblemEntry);
        assert_eq!(name(action_for_key(&app, &ctrl('v'))), None);
    }
}
