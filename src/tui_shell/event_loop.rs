use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::time::Instant;

use crate::file_session::EditMode;
use crate::gateway::Transport;
use crate::inspector::InspectKind;
use crate::model::Action;

use super::app::{App, Focus};
use super::input;

pub(super) async fn run_loop<T: Transport>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<T>,
) -> Result<()> {
    app.refresh();
    loop {
        app.maybe_auto_refresh();
        app.ctl.tick_notifications(Instant::now());
        app.clamp_selection();

        terminal
            .draw(|f| super::render::draw(f, app))
            .context("draw")?;
        if app.quit {
            return Ok(());
        }

        if app.ctl.is_idle() {
            if event::poll(Duration::from_millis(100)).context("poll")? {
                dispatch_event(app, event::read().context("read event")?);
            }
        } else {
            // Let network tasks run; a completion wakes us early.
            let _ = tokio::time::timeout(Duration::from_millis(50), app.ctl.step()).await;
            while event::poll(Duration::ZERO).context("poll")? {
                dispatch_event(app, event::read().context("read event")?);
            }
        }
    }
}

fn dispatch_event<T: Transport>(app: &mut App<T>, ev: Event) {
    if let Event::Key(k) = ev {
        if k.kind == KeyEventKind::Press {
            handle_key(app, k);
        }
    }
}

pub(super) fn handle_key<T: Transport>(app: &mut App<T>, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return;
    }

    if app.ctl.state().file.pending_confirmation().is_some() {
        handle_confirm_key(app, key);
    } else if app.ctl.state().file.is_open() {
        handle_file_key(app, key);
    } else if app.ctl.state().inspector.is_open() {
        handle_inspector_key(app, key);
    } else if app.focus == Focus::Search {
        handle_search_key(app, key);
    } else {
        handle_table_key(app, key);
    }
}

fn handle_confirm_key<T: Transport>(app: &mut App<T>, key: KeyEvent) {
    let answer = match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => true,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
        _ => return,
    };
    app.confirm_save(answer);
}

fn handle_file_key<T: Transport>(app: &mut App<T>, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match app.ctl.state().file.mode() {
        EditMode::Editing => match key.code {
            KeyCode::Char('s') if ctrl => app.request_save(),
            KeyCode::Char('w') if ctrl => app.close_file(),
            KeyCode::Esc => app.cancel_edit(),
            KeyCode::Char(c) if !ctrl => app.edit_buffer(|b, cur| input::insert_char(b, cur, c)),
            KeyCode::Tab => app.edit_buffer(|b, cur| input::insert_char(b, cur, '\t')),
            KeyCode::Enter => app.edit_buffer(|b, cur| input::insert_char(b, cur, '\n')),
            KeyCode::Backspace => app.edit_buffer(input::backspace),
            KeyCode::Left => app.edit_buffer(|b, cur| input::move_left(b, cur)),
            KeyCode::Right => app.edit_buffer(|b, cur| input::move_right(b, cur)),
            KeyCode::Up => app.edit_buffer(|b, cur| input::move_vertical(b, cur, false)),
            KeyCode::Down => app.edit_buffer(|b, cur| input::move_vertical(b, cur, true)),
            _ => {}
        },
        EditMode::Saving => match key.code {
            KeyCode::Char('s') if ctrl => app.request_save(),
            KeyCode::Esc | KeyCode::Char('q') => app.close_file(),
            _ => {}
        },
        EditMode::Viewing => match key.code {
            KeyCode::Char('e') => app.start_edit(),
            KeyCode::Esc | KeyCode::Char('q') => app.close_file(),
            KeyCode::Up | KeyCode::Char('k') => app.file_scroll = app.file_scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => app.file_scroll += 1,
            _ => {}
        },
        EditMode::Loading | EditMode::Error | EditMode::Closed => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                app.close_file();
            }
        }
    }
}

fn handle_inspector_key<T: Transport>(app: &mut App<T>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.ctl.close_inspector(),
        KeyCode::Char('l') => {
            app.ctl.inspect_logs();
            app.inspect_scroll = 0;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.inspect_scroll = app.inspect_scroll.saturating_sub(1)
        }
        KeyCode::Down | KeyCode::Char('j') => app.inspect_scroll += 1,
        _ => {}
    }
}

fn handle_search_key<T: Transport>(app: &mut App<T>, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.search.clear();
            app.search_changed();
            app.focus = Focus::Table;
        }
        KeyCode::Enter | KeyCode::Down => app.focus = Focus::Table,
        KeyCode::Backspace => {
            app.search.backspace();
            app.search_changed();
        }
        KeyCode::Delete => {
            app.search.delete();
            app.search_changed();
        }
        KeyCode::Left => app.search.move_left(),
        KeyCode::Right => app.search.move_right(),
        KeyCode::Char(c) => {
            app.search.insert_char(c);
            app.search_changed();
        }
        _ => {}
    }
}

fn handle_table_key<T: Transport>(app: &mut App<T>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit = true,
        KeyCode::Esc => {
            if !app.search.buf.is_empty() {
                app.search.clear();
                app.search_changed();
            } else {
                app.quit = true;
            }
        }
        KeyCode::Char('/') => app.focus = Focus::Search,
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(true),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(false),

        KeyCode::Char('s') => app.row_action(Action::Start),
        KeyCode::Char('x') => app.row_action(Action::Stop),
        KeyCode::Char('r') => app.row_action(Action::Restart),
        KeyCode::Char('e') => app.row_action(Action::Enable),
        KeyCode::Char('d') => app.row_action(Action::Disable),
        KeyCode::Char('D') => {
            app.ctl.daemon_reload();
        }
        KeyCode::Char('R') | KeyCode::F(5) => app.refresh(),

        KeyCode::Char('f') | KeyCode::Enter => app.open_file(),
        KeyCode::Char('i') => app.inspect(InspectKind::Status),
        KeyCode::Char('l') => app.inspect(InspectKind::Logs),

        KeyCode::Char('c') => {
            if let Some(id) = app.ctl.state().notifications.live().first().map(|n| n.id) {
                app.ctl.dismiss_notification(id, Instant::now());
            }
        }

        KeyCode::Char(c @ '1'..='6') => app.sort_column(c as usize - '1' as usize),
        _ => {}
    }
}
