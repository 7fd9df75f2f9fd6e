use std::{error::Error, io, io::Write, sync::Arc};

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::{
    cursor::SetCursorStyle,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::Terminal;
use tokio::sync::Mutex;

pub type SharedTerminal<W = io::Stdout> = Arc<Mutex<Terminal<CrosstermBackend<W>>>>;

pub fn setup_terminal() -> Result<SharedTerminal, Box<dyn Error>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        SetCursorStyle::SteadyBar
    )?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).inspect_err(|_| {
        let _ = disable_raw_mode();
    })?;

    Ok(Arc::new(Mutex::new(terminal)))
}

pub async fn restore_terminal<W>(terminal: &SharedTerminal<W>) -> Result<(), Box<dyn Error>>
where
    W: Write + Send + 'static,
{
    disable_raw_mode()?;
    let mut guard = terminal.lock().await;
    execute!(
        guard.backend_mut(),
        SetCursorStyle::DefaultUserShape,
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    guard.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::runtime::Runtime;

    #[test]
    fn setup_and_restore_when_a_terminal_is_present() {
        // Headless runs cannot enter raw mode; only the success path is checked.
        if let Ok(terminal) = setup_terminal() {
            let runtime = Runtime::new().expect("runtime");
            runtime.block_on(async {
                let _ = restore_terminal(&terminal).await;
            });
        }
    }
}
