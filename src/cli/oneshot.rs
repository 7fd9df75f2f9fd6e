//! TUI-less commands.
//!
//! `daily` and `ask` drive the same controller as the interactive loop, so a
//! request issued here follows the same transitions. Voice is never offered.

use std::error::Error;

use crate::core::app::{App, AppAction, AppRunner, Services};
use crate::core::config::Settings;

pub async fn run_daily(settings: &Settings, services: Services) -> Result<String, Box<dyn Error>> {
    run_flow(settings, services, vec![AppAction::RequestDailySuggestion]).await
}

pub async fn run_ask(
    settings: &Settings,
    services: Services,
    problem: String,
) -> Result<String, Box<dyn Error>> {
    run_flow(
        settings,
        services,
        vec![
            AppAction::RequestProblemEntry,
            AppAction::InsertIntoInput { text: problem },
            AppAction::Submit,
        ],
    )
    .await
}

async fn run_flow(
    settings: &Settings,
    services: Services,
    actions: Vec<AppAction>,
) -> Result<String, Box<dyn Error>> {
    let mut app = App::from_settings(settings, false);
    let mut runner = AppRunner::new(services);

    runner.run_until_settled(&mut app, actions).await;
    runner.shutdown();

    // A failed request lands back on the home screen with no result.
    app.result()
        .map(|result| result.answer.clone())
        .ok_or_else(|| "no answer received; the request failed".into())
}
