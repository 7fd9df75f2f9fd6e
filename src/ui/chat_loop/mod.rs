//! Interactive event loop.
//!
//! Terminal events become controller actions through the key map, actions
//! are applied in queue order, and commands they produce are handed to the
//! [`AppRunner`]. Frames are drawn at most 60 times per second, and only
//! when something changed or the loading animation is running.

mod keybindings;
mod lifecycle;

pub use keybindings::action_for_key;

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info};

use self::lifecycle::{restore_terminal, setup_terminal, SharedTerminal};
use crate::core::app::{App, AppAction, AppActionDispatcher, AppHandle, AppRunner, Services, ViewState};
use crate::core::config::Settings;
use crate::ui::renderer::ui;

const MAX_FPS: u64 = 60;

pub async fn run_chat(settings: &Settings, services: Services) -> Result<(), Box<dyn Error>> {
    let app = AppHandle::new(App::from_settings(settings, services.voice_capability()));
    let mut runner = AppRunner::new(services);
    let dispatcher = runner.dispatcher();

    let voice = app.read(|a| a.voice_capability()).await;
    info!(model = %settings.model, voice, "starting interactive session");

    let terminal = setup_terminal()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let event_reader = spawn_event_reader(event_tx);

    let result = drive(&app, &mut runner, &dispatcher, &terminal, &mut event_rx).await;

    event_reader.abort();
    runner.shutdown();
    restore_terminal(&terminal).await?;

    result
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<Event>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            // Short poll timeout so the task notices a closed channel.
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "terminal event read failed");
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

async fn drive(
    app: &AppHandle,
    runner: &mut AppRunner,
    dispatcher: &AppActionDispatcher,
    terminal: &SharedTerminal,
    event_rx: &mut mpsc::UnboundedReceiver<Event>,
) -> Result<(), Box<dyn Error>> {
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;
    let mut frame: u64 = 0;

    loop {
        if app.read(|a| a.exit_requested()).await {
            return Ok(());
        }

        try_draw_frame(
            app,
            terminal,
            &mut request_redraw,
            &mut last_draw,
            &mut frame,
            frame_duration,
        )
        .await?;

        let events_processed = process_ui_events(app, event_rx, dispatcher).await;
        let actions_applied = drain_action_queue(app, runner).await;
        let animating = app
            .read(|a| a.view_state() == ViewState::Loading || a.is_listening())
            .await;

        if events_processed || actions_applied || animating {
            request_redraw = true;
        }

        if !events_processed && !actions_applied {
            tokio::time::sleep(Duration::from_millis(16)).await;
        }
    }
}

async fn try_draw_frame(
    app: &AppHandle,
    terminal: &SharedTerminal,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame: &mut u64,
    frame_duration: Duration,
) -> io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    let current = *frame;
    let mut terminal_guard = terminal.lock().await;
    app.read(|a| terminal_guard.draw(|f| ui(f, a, current)).map(|_| ()))
        .await?;
    *frame = frame.wrapping_add(1);
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

/// Translate every queued terminal event into actions. Returns whether any
/// event was seen.
async fn process_ui_events(
    app: &AppHandle,
    event_rx: &mut mpsc::UnboundedReceiver<Event>,
    dispatcher: &AppActionDispatcher,
) -> bool {
    let mut processed = false;

    while let Ok(ev) = event_rx.try_recv() {
        processed = true;
        match ev {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Some(action) = app.read(|a| action_for_key(a, &key)).await {
                    dispatcher.dispatch(action);
                }
            }
            Event::Paste(text) => dispatcher.dispatch(AppAction::InsertIntoInput { text }),
            _ => {}
        }
    }

    processed
}

async fn drain_action_queue(app: &AppHandle, runner: &mut AppRunner) -> bool {
    let pending = runner.drain();
    if pending.is_empty() {
        return false;
    }

    let runner = &*runner;
    app.update(|a| {
        for action in pending {
            runner.apply(a, action);
        }
    })
    .await;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{create_test_app, test_services, FakeCompletion};
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    async fn pump(app: &AppHandle, runner: &mut AppRunner, rx: &mut mpsc::UnboundedReceiver<Event>) {
        let dispatcher = runner.dispatcher();
        process_ui_events(app, rx, &dispatcher).await;
        drain_action_queue(app, runner).await;
    }

    #[tokio::test]
    async fn keys_and_paste_reach_the_controller() {
        let completion = FakeCompletion::answering(&["Oil the lock."]);
        let mut runner = AppRunner::new(test_services(&completion, None));
        let app = AppHandle::new(create_test_app());
        let (tx, mut rx) = mpsc::unbounded_channel();

        tx.send(press(KeyCode::Char('2'))).expect("send");
        tx.send(Event::Paste("lock\tsticks".into())).expect("send");
        pump(&app, &mut runner, &mut rx).await;

        assert_eq!(app.read(|a| a.view_state()).await, ViewState::InputProblem);
        assert_eq!(
            app.read(|a| a.input_text().to_string()).await,
            "lock    sticks"
        );

        tx.send(press(KeyCode::Enter)).expect("send");
        pump(&app, &mut runner, &mut rx).await;
        assert_eq!(app.read(|a| a.view_state()).await, ViewState::Loading);

        for _ in 0..50 {
            drain_action_queue(&app, &mut runner).await;
            if app.read(|a| a.view_state()).await == ViewState::Result {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(
            app.read(|a| a.result().map(|r| r.answer.clone())).await,
            Some("Oil the lock.".to_string())
        );
    }

    #[tokio::test]
    async fn key_releases_are_ignored() {
        let completion = FakeCompletion::default();
        let mut runner = AppRunner::new(test_services(&completion, None));
        let app = AppHandle::new(create_test_app());
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut release = KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        tx.send(Event::Key(release)).expect("send");
        pump(&app, &mut runner, &mut rx).await;

        assert_eq!(app.read(|a| a.view_state()).await, ViewState::Home);
    }
}
