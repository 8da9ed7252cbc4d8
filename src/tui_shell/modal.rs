use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::file_session::{EDIT_WARNING, EditMode};
use crate::gateway::Transport;
use crate::inspector::{InspectState, loading_text};

use super::app::App;

fn centered_box(frame: &mut Frame, max_w: u16, max_h: u16) -> Rect {
    let area = frame.area();
    let w = area.width.saturating_sub(6).clamp(20, max_w);
    let h = area.height.saturating_sub(4).clamp(6, max_h);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    let rect = Rect {
        x,
        y,
        width: w.min(area.width),
        height: h.min(area.height),
    };
    frame.render_widget(Clear, rect);
    rect
}

fn footer_hint(mode: EditMode) -> &'static str {
    match mode {
        EditMode::Loading => "loading...  Esc close",
        EditMode::Viewing => "e edit  j/k scroll  Esc close",
        EditMode::Editing => "Ctrl-S save  Esc cancel and reload  Ctrl-W close",
        EditMode::Saving => "saving...",
        EditMode::Error | EditMode::Closed => "Esc close",
    }
}

pub(super) fn draw_file_modal<T: Transport>(frame: &mut Frame, app: &mut App<T>) {
    let box_area = centered_box(frame, 120, 40);
    let (cursor_line, cursor_col) = app.cursor_line_col();

    let file = &app.ctl.state().file;
    let mode = file.mode();
    let title = format!(
        " {} : {} ",
        file.target().unwrap_or_default(),
        file.path().unwrap_or("...")
    );
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(box_area);
    frame.render_widget(block, box_area);

    let warning_h = if file.shows_edit_warning() { 1 } else { 0 };
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(warning_h),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    if file.shows_edit_warning() {
        frame.render_widget(
            Paragraph::new(EDIT_WARNING).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            parts[0],
        );
    }

    let body = if mode == EditMode::Loading {
        "Loading file content..."
    } else {
        file.content()
    };

    // Keep the cursor line on screen while editing.
    let view_h = parts[1].height as usize;
    if mode == EditMode::Editing && view_h > 0 {
        if cursor_line < app.file_scroll {
            app.file_scroll = cursor_line;
        } else if cursor_line >= app.file_scroll + view_h {
            app.file_scroll = cursor_line + 1 - view_h;
        }
    }
    let max_scroll = body.lines().count().saturating_sub(1);
    app.file_scroll = app.file_scroll.min(max_scroll.max(cursor_line));

    let style = match mode {
        EditMode::Error => Style::default().fg(Color::Red),
        EditMode::Saving => Style::default().add_modifier(Modifier::DIM),
        _ => Style::default(),
    };
    let lines: Vec<Line> = body.split('\n').map(Line::from).collect();
    frame.render_widget(
        Paragraph::new(lines)
            .style(style)
            .scroll((app.file_scroll as u16, 0)),
        parts[1],
    );

    frame.render_widget(
        Paragraph::new(footer_hint(mode)).style(Style::default().fg(Color::DarkGray)),
        parts[2],
    );

    if mode == EditMode::Editing && app.ctl.state().file.pending_confirmation().is_none() {
        let row = cursor_line.saturating_sub(app.file_scroll) as u16;
        let col = cursor_col as u16;
        if row < parts[1].height && col < parts[1].width {
            frame.set_cursor_position((parts[1].x + col, parts[1].y + row));
        }
    }
}

pub(super) fn draw_inspector<T: Transport>(frame: &mut Frame, app: &mut App<T>) {
    let Some(title) = app.inspector_title() else {
        return;
    };
    let Some((req, state)) = app.ctl.state().inspector.current() else {
        return;
    };
    let box_area = centered_box(frame, 120, 40);

    let (text, style) = match state {
        InspectState::Loading => (loading_text(req.kind).to_string(), Style::default()),
        InspectState::Loaded(text) => (text.clone(), Style::default()),
        InspectState::Failed(err) => (err.clone(), Style::default().fg(Color::Red)),
    };
    let lines: Vec<Line> = text.lines().map(|l| Line::from(l.to_string())).collect();
    let scroll = app.inspect_scroll.min(lines.len().saturating_sub(1));
    app.inspect_scroll = scroll;

    frame.render_widget(
        Paragraph::new(lines)
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(title))
            .scroll((scroll as u16, 0)),
        box_area,
    );
}

pub(super) fn draw_confirm<T: Transport>(frame: &mut Frame, app: &App<T>) {
    let Some(prompt) = app.ctl.state().file.pending_confirmation() else {
        return;
    };
    let box_area = centered_box(frame, 70, 12);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Confirm save ");
    let inner = block.inner(box_area);
    frame.render_widget(block, box_area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);
    frame.render_widget(
        Paragraph::new(prompt).wrap(Wrap { trim: false }),
        parts[0],
    );
    frame.render_widget(
        Paragraph::new("[y] save  [n] keep editing")
            .style(Style::default().add_modifier(Modifier::BOLD)),
        parts[1],
    );
}
