use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::store::Store;
use crate::ui::app::{App, FormField, InputMode, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(store: &mut Store) -> Result<()> {
    let mut app = App::new();
    app.refresh(store);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, store);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "session ended with an error");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &mut Store,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // tab + status + command bars, table borders and header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, store)?,
                InputMode::Command => handle_command_input(key, app, store)?,
                InputMode::Adding => handle_form_input(key, app, store),
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, store: &Store) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.screen == Screen::Transactions {
                let len = app.transactions.len();
                let page = app.visible_rows;
                scroll_down(&mut app.transaction_index, &mut app.transaction_scroll, len, page);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if app.screen == Screen::Transactions {
                scroll_up(&mut app.transaction_index, &mut app.transaction_scroll);
            }
        }
        KeyCode::Char('g') => scroll_to_top(&mut app.transaction_index, &mut app.transaction_scroll),
        KeyCode::Char('G') => {
            let len = app.transactions.len();
            let page = app.visible_rows;
            scroll_to_bottom(&mut app.transaction_index, &mut app.transaction_scroll, len, page);
        }
        KeyCode::Char('1') => switch_screen(app, store, Screen::Dashboard),
        KeyCode::Char('2') => switch_screen(app, store, Screen::Transactions),
        KeyCode::Tab | KeyCode::BackTab => {
            let next = match app.screen {
                Screen::Dashboard => Screen::Transactions,
                Screen::Transactions => Screen::Dashboard,
            };
            switch_screen(app, store, next);
        }
        KeyCode::Char('a') => app.open_form(),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.status_message.clear(),
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, store: &mut Store) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, store)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => app.command_input.push(c),
        _ => {}
    }
    Ok(())
}

/// Store errors on save are shown in the status bar; the form stays open.
fn handle_form_input(key: event::KeyEvent, app: &mut App, store: &mut Store) {
    match key.code {
        KeyCode::Esc => {
            app.close_form();
            app.set_status("Add cancelled");
        }
        KeyCode::Enter => {
            app.submit_form(store);
        }
        KeyCode::Tab => app.form.field = app.form.field.next(),
        KeyCode::BackTab => app.form.field = app.form.field.prev(),
        KeyCode::Up | KeyCode::Down if app.form.field == FormField::Category => {
            let forward = key.code == KeyCode::Down;
            app.form.cycle_category(&app.categories, forward);
        }
        KeyCode::Char(' ') if app.form.field == FormField::Recurring => {
            app.form.recurring = !app.form.recurring;
        }
        KeyCode::Backspace => {
            if let Some(text) = app.form.focused_text() {
                text.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(text) = app.form.focused_text() {
                text.push(c);
            }
        }
        _ => {}
    }
}

fn switch_screen(app: &mut App, store: &Store, screen: Screen) {
    app.screen = screen;
    app.refresh(store);
}
