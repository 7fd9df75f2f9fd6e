use crate::core::app::{App, ViewState};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;

pub const TITLE: &str = "A-R-I-H-A-N-T-E";

const DAILY_LABEL: &str = "Aaj kya karna hai →";
const PROBLEM_LABEL: &str = "Problem hai +";
const PROBLEM_HEADING: &str = "What is the problem?";
const PROBLEM_SUBHEADING: &str = "Explain briefly. I will fix it.";
const PROBLEM_PLACEHOLDER: &str = "Type here...";
const FOLLOW_UP_PLACEHOLDER: &str = "Ask a follow-up question...";

const PROBLEM_INPUT_HEIGHT: u16 = 6;
const FOLLOW_UP_INPUT_HEIGHT: u16 = 3;

/// Draw the active screen. `frame` advances once per drawn frame and drives
/// the loading animation.
pub fn ui(f: &mut Frame, app: &App, frame: u64) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = Paragraph::new(Line::from(Span::styled(
        TITLE,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    match app.view_state() {
        ViewState::Home => render_home(f, chunks[1]),
        ViewState::InputProblem => render_problem(f, app, chunks[1]),
        ViewState::Loading => render_loading(f, chunks[1], frame),
        ViewState::Result => render_result(f, app, chunks[1]),
    }

    let footer = Paragraph::new(Line::from(Span::styled(
        footer_hint(app),
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(footer, chunks[2]);
}

pub fn footer_hint(app: &App) -> String {
    let voice = if app.voice_available() {
        " • Ctrl+V voice"
    } else {
        ""
    };
    match app.view_state() {
        ViewState::Home => "1 daily task • 2 report a problem • q quit".to_string(),
        ViewState::InputProblem => format!("Enter solve • Esc back{voice} • Ctrl+C quit"),
        ViewState::Loading => "Ctrl+C quit".to_string(),
        ViewState::Result => format!("Enter ask • Esc done{voice} • Ctrl+C quit"),
    }
}

fn render_home(f: &mut Frame, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let daily = Paragraph::new(Line::from(vec![
        Span::styled("[1] ", Style::default().fg(Color::DarkGray)),
        Span::styled(DAILY_LABEL, Style::default().add_modifier(Modifier::BOLD)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(daily, rows[1]);

    let problem = Paragraph::new(Line::from(vec![
        Span::styled("[2] ", Style::default().fg(Color::DarkGray)),
        Span::raw(PROBLEM_LABEL),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(problem, rows[3]);
}

fn render_problem(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(PROBLEM_INPUT_HEIGHT),
            Constraint::Min(0),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(Span::styled(
            PROBLEM_HEADING,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        rows[0],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            PROBLEM_SUBHEADING,
            Style::default().fg(Color::Gray),
        )),
        rows[1],
    );

    render_input(f, app, rows[3], PROBLEM_PLACEHOLDER, "Solve");
}

fn render_loading(f: &mut Frame, area: Rect, frame: u64) {
    let dots = loading_dots(frame);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);
    f.render_widget(
        Paragraph::new(Line::from(dots)).alignment(Alignment::Center),
        vertical[1],
    );
}

/// Three dots, one raised at a time.
fn loading_dots(frame: u64) -> Vec<Span<'static>> {
    let active = ((frame / 10) % 3) as usize;
    (0..3)
        .flat_map(|i| {
            let style = if i == active {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let glyph = if i == active { "●" } else { "•" };
            [Span::styled(glyph, style), Span::raw(" ")]
        })
        .collect()
}

fn render_result(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(FOLLOW_UP_INPUT_HEIGHT),
        ])
        .split(area);

    let answer = app.result().map(|r| r.answer.as_str()).unwrap_or_default();
    let lines: Vec<Line> = answer.lines().map(Line::from).collect();
    let answer_height = rows[0].height.saturating_sub(2);
    let total = wrapped_height(answer, rows[0].width.saturating_sub(2));
    // Long answers show their end so the newest text stays visible.
    let scroll = total.saturating_sub(answer_height);
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(paragraph, rows[0]);

    render_input(f, app, rows[1], FOLLOW_UP_PLACEHOLDER, "Done: Esc");
}

fn render_input(f: &mut Frame, app: &App, area: Rect, placeholder: &str, title: &str) {
    let mut title = title.to_string();
    if app.is_listening() {
        title.push_str(" • listening…");
    }
    let title_style = if app.is_listening() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, title_style));

    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);

    if app.input_text().is_empty() {
        let hint = Paragraph::new(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        f.render_widget(hint, area);
        f.set_cursor_position((area.x + 1, area.y + 1));
        return;
    }

    let wrapped = wrap_input(app.input_text(), inner_width);
    let skip = wrapped.len().saturating_sub(inner_height as usize);
    let visible: Vec<Line> = wrapped[skip..]
        .iter()
        .map(|line| Line::from(line.clone()))
        .collect();
    f.render_widget(Paragraph::new(visible).block(block), area);

    let (col, row) = input_cursor(&wrapped, skip);
    if row < inner_height {
        f.set_cursor_position((
            area.x + 1 + col.min(inner_width.saturating_sub(1)),
            area.y + 1 + row,
        ));
    }
}

/// Break `text` into display rows no wider than `width` columns, honoring
/// explicit newlines. Always returns at least one row.
pub fn wrap_input(text: &str, width: u16) -> Vec<String> {
    let width = width.max(1) as usize;
    let mut rows = vec![String::new()];
    let mut col = 0usize;

    for ch in text.chars() {
        if ch == '\n' {
            rows.push(String::new());
            col = 0;
            continue;
        }
        let w = ch.width().unwrap_or(0);
        if col + w > width && col > 0 {
            rows.push(String::new());
            col = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push(ch);
        }
        col += w;
    }

    rows
}

// Cursor sits after the last character of the last row.
fn input_cursor(rows: &[String], skip: usize) -> (u16, u16) {
    let last = rows.last().map(String::as_str).unwrap_or_default();
    let col: usize = last.chars().filter_map(|c| c.width()).sum();
    let row = rows.len().saturating_sub(1).saturating_sub(skip);
    (col as u16, row as u16)
}

fn wrapped_height(text: &str, width: u16) -> u16 {
    text.lines()
        .map(|line| wrap_input(line, width).len() as u16)
        .sum()
}
