use std::sync::OnceLock;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState};

use time::format_description::FormatItem;

use crate::gateway::Transport;
use crate::model::{Action, ControlKey, ServiceRecord, StatusTone, active_tone, enabled_tone, sub_tone};
use crate::notify::{NoticeKind, Notification};
use crate::projection::{self, ListDisplay, SortDirection, SortKey};
use crate::registry::LoadStatus;

use super::app::{App, Focus};
use super::modal;

fn ts_ui_format() -> &'static [FormatItem<'static>] {
    static FMT: OnceLock<Vec<FormatItem<'static>>> = OnceLock::new();
    FMT.get_or_init(|| {
        time::format_description::parse("[hour padding:zero]:[minute padding:zero]:[second padding:zero]")
            .unwrap_or_default()
    })
}

pub(super) fn draw<T: Transport>(frame: &mut Frame, app: &mut App<T>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_search(frame, app, chunks[1]);
    draw_services(frame, app, chunks[2]);
    draw_footer(frame, chunks[3]);

    let file_open = app.ctl.state().file.is_open();
    let inspecting = app.ctl.state().inspector.is_open();
    if file_open {
        modal::draw_file_modal(frame, app);
    } else if inspecting {
        modal::draw_inspector(frame, app);
    }
    if app.ctl.state().file.pending_confirmation().is_some() {
        modal::draw_confirm(frame, app);
    }

    draw_notifications(frame, app.ctl.state().notifications.live());
}

fn draw_header<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let st = app.ctl.state();
    let status = match st.registry.status() {
        LoadStatus::Loading => "loading".to_string(),
        LoadStatus::Loaded if st.registry.is_refreshing() => {
            format!("{} services, refreshing", st.registry.snapshot().len())
        }
        LoadStatus::Loaded => format!("{} services", st.registry.snapshot().len()),
        LoadStatus::Failed(_) => "load failed".to_string(),
    };
    let refreshed = st
        .registry
        .last_loaded()
        .and_then(|t| t.format(ts_ui_format()).ok())
        .map(|t| format!("  refreshed {}Z", t))
        .unwrap_or_default();

    let pending = app
        .pending_label()
        .map(|p| format!("  {}", p))
        .unwrap_or_default();

    let line = Line::from(vec![
        Span::styled("svcdeck", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {}", status)),
        Span::styled(pending, Style::default().fg(Color::Yellow)),
        Span::styled(refreshed, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_search<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let focused = app.focus == Focus::Search;
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    frame.render_widget(
        Paragraph::new(app.search.buf.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title("Search (/)"),
        ),
        area,
    );
    if focused {
        frame.set_cursor_position((area.x + 1 + app.search.column() as u16, area.y + 1));
    }
}

fn tone_style(tone: StatusTone) -> Style {
    let color = match tone {
        StatusTone::Failed | StatusTone::Masked => Color::Red,
        StatusTone::Activating => Color::Yellow,
        StatusTone::Active | StatusTone::Running | StatusTone::Enabled => Color::Green,
        StatusTone::Inactive | StatusTone::Dead => Color::DarkGray,
        StatusTone::Exited => Color::Blue,
        StatusTone::Disabled => Color::Magenta,
        StatusTone::Static => Color::Cyan,
        StatusTone::Neutral => Color::Reset,
    };
    Style::default().fg(color)
}

fn header_cell(key: SortKey, idx: usize, current: (SortKey, SortDirection)) -> Cell<'static> {
    let mut label = format!("{} {}", idx + 1, key.as_str().to_uppercase());
    if key == current.0 {
        label.push_str(match current.1 {
            SortDirection::Ascending => " ^",
            SortDirection::Descending => " v",
        });
        Cell::from(label).style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
    } else {
        Cell::from(label)
    }
}

fn controls_cell<T: Transport>(app: &App<T>, rec: &ServiceRecord) -> Cell<'static> {
    let d = &app.ctl.state().dispatcher;
    let spans: Vec<Span> = Action::ROW
        .iter()
        .zip(["s", "x", "r", "e", "d"])
        .map(|(action, glyph)| {
            let key = ControlKey::new(&rec.unit, *action);
            let style = if d.is_enabled(&key) {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
            };
            Span::styled(format!("{} ", glyph), style)
        })
        .collect();
    Cell::from(Line::from(spans))
}

fn draw_services<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let st = app.ctl.state();
    let block = Block::default().borders(Borders::ALL).title("Services");

    let rows = match projection::display(&st.registry, &st.view) {
        ListDisplay::Populated(rows) => rows,
        other => {
            let msg = match other {
                ListDisplay::Loading => "Loading services...".to_string(),
                ListDisplay::Failed(err) => {
                    format!("Failed to load services. Check backend logs. ({})", err)
                }
                ListDisplay::Empty { filtered: true } => {
                    format!("No services match '{}'.", st.view.search.trim())
                }
                _ => "No services reported.".to_string(),
            };
            frame.render_widget(Paragraph::new(msg).block(block), area);
            return;
        }
    };

    let sort = (st.view.sort.key, st.view.sort.direction);
    let mut header: Vec<Cell> = SortKey::ALL
        .iter()
        .enumerate()
        .map(|(i, k)| header_cell(*k, i, sort))
        .collect();
    header.push(Cell::from("ACTIONS"));

    let body: Vec<Row> = rows
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.unit.clone()),
                Cell::from(r.load.clone()),
                Cell::from(r.active.clone()).style(tone_style(active_tone(&r.active))),
                Cell::from(r.sub.clone()).style(tone_style(sub_tone(&r.sub))),
                Cell::from(r.enabled.clone()).style(tone_style(enabled_tone(&r.enabled))),
                Cell::from(r.description.clone()),
                controls_cell(app, r),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(22),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Min(10),
        Constraint::Length(11),
    ];
    let table = Table::new(body, widths)
        .header(Row::new(header))
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_footer(frame: &mut Frame, area: Rect) {
    let hint = "s start  x stop  r restart  e enable  d disable  f file  i status  l logs  R refresh  D daemon-reload  1-6 sort  c dismiss  q quit";
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn kind_color(kind: NoticeKind) -> Color {
    match kind {
        NoticeKind::Info => Color::Blue,
        NoticeKind::Success => Color::Green,
        NoticeKind::Warning => Color::Yellow,
        NoticeKind::Error => Color::Red,
    }
}

fn draw_notifications(frame: &mut Frame, live: &[Notification]) {
    let area = frame.area();
    let w = area.width.saturating_sub(4).min(56);
    let x = area.x + area.width.saturating_sub(w + 1);
    let mut y = area.y + 1;

    for n in live {
        let h = 3;
        if y + h > area.y + area.height {
            break;
        }
        let rect = Rect {
            x,
            y,
            width: w,
            height: h,
        };
        let mut style = Style::default().fg(kind_color(n.kind));
        if n.is_exiting() {
            style = style.add_modifier(Modifier::DIM);
        }
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(n.message.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style)
                    .title(n.kind.label()),
            ),
            rect,
        );
        y += h;
    }
}
