use std::sync::Mutex;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::{Value, json};

use super::*;
use crate::gateway::{Method, RawResponse, ResponseBody, TransportError};
use crate::model::ControlKey;
use crate::notify::NoticeKind;
use crate::projection::SortDirection;
use crate::tui_shell::event_loop::handle_key;

#[derive(Default)]
struct Fixture {
    sent: Mutex<Vec<(Method, String)>>,
}

impl Transport for Fixture {
    async fn send(
        &self,
        method: Method,
        path: &str,
        _body: Option<&Value>,
    ) -> Result<RawResponse, TransportError> {
        self.sent.lock().unwrap().push((method, path.to_string()));
        let body = match path {
            "/api/services" => json!([
                {"unit": "nginx.service", "load": "loaded", "active": "active", "sub": "running", "enabled": "enabled", "description": "web"},
                {"unit": "cron.service", "load": "loaded", "active": "inactive", "sub": "dead", "enabled": "disabled", "description": "jobs"},
                {"unit": "sshd.service", "load": "loaded", "active": "failed", "sub": "failed", "enabled": "enabled", "description": "OpenSSH"},
            ]),
            p if p.ends_with("/file") => json!({"file_content": "[Unit]\n", "file_path": "/etc/x"}),
            _ => json!({"success": "ok"}),
        };
        Ok(RawResponse {
            status: 200,
            status_text: "OK".into(),
            body: ResponseBody::Json(body),
        })
    }
}

fn sent_paths(app: &App<Fixture>) -> Vec<String> {
    app.ctl
        .gateway()
        .transport()
        .sent
        .lock()
        .unwrap()
        .iter()
        .map(|(_, p)| p.clone())
        .collect()
}

fn press(app: &mut App<Fixture>, code: KeyCode) {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

async fn loaded_app() -> App<Fixture> {
    let ctl = Controller::new(Fixture::default(), Duration::from_secs(1));
    let mut app = App::new(ctl, TuiRunOptions::default());
    app.refresh();
    app.ctl.run_until_idle().await;
    app
}

#[tokio::test(start_paused = true)]
async fn number_keys_pick_sort_columns() {
    let mut app = loaded_app().await;
    press(&mut app, KeyCode::Char('3'));
    assert_eq!(app.ctl.state().view.sort.key, SortKey::Active);
    assert_eq!(app.ctl.state().view.sort.direction, SortDirection::Ascending);

    press(&mut app, KeyCode::Char('3'));
    assert_eq!(app.ctl.state().view.sort.direction, SortDirection::Descending);

    app.sort_column(42);
    assert_eq!(app.ctl.state().view.sort.key, SortKey::Active);
}

#[tokio::test(start_paused = true)]
async fn typing_a_search_filters_and_resets_selection() {
    let mut app = loaded_app().await;
    assert_eq!(app.row_count(), 3);
    app.move_selection(true);
    app.move_selection(true);
    assert_eq!(app.selected, 2);

    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.focus, Focus::Search);
    for c in "SSH".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    assert_eq!(app.selected, 0);
    assert_eq!(app.row_count(), 1);
    assert_eq!(app.selected_unit().as_deref(), Some("sshd.service"));

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.focus, Focus::Table);
    assert_eq!(app.row_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn selection_wraps_around() {
    let mut app = loaded_app().await;
    app.move_selection(false);
    assert_eq!(app.selected, 2);
    app.move_selection(true);
    assert_eq!(app.selected, 0);
}

#[tokio::test(start_paused = true)]
async fn start_key_dispatches_once_for_the_selected_row() {
    let mut app = loaded_app().await;
    // Default sort is by unit name: cron, nginx, sshd.
    app.move_selection(true);
    press(&mut app, KeyCode::Char('s'));
    press(&mut app, KeyCode::Char('s'));

    let key = ControlKey::new("nginx.service", Action::Start);
    assert!(app.ctl.state().dispatcher.is_locked(&key));
    app.ctl.step().await;

    let controls: Vec<_> = sent_paths(&app)
        .into_iter()
        .filter(|p| p.ends_with("/start"))
        .collect();
    assert_eq!(controls, vec!["/api/services/nginx.service/start"]);
}

#[tokio::test(start_paused = true)]
async fn closing_while_editing_is_refused_with_a_warning() {
    let mut app = loaded_app().await;
    press(&mut app, KeyCode::Char('f'));
    app.ctl.run_until_idle().await;
    assert_eq!(app.ctl.state().file.mode(), EditMode::Viewing);

    press(&mut app, KeyCode::Char('e'));
    assert_eq!(app.ctl.state().file.mode(), EditMode::Editing);
    assert_eq!(app.edit_cursor, "[Unit]\n".len());

    press(&mut app, KeyCode::Char('x'));
    assert_eq!(app.ctl.state().file.content(), "[Unit]\nx");

    handle_key(&mut app, KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL));
    assert!(app.ctl.state().file.is_open());

    app.ctl.tick_notifications(Instant::now());
    let last = app.ctl.state().notifications.live().last().cloned();
    let last = last.expect("a warning was posted");
    assert_eq!(last.kind, NoticeKind::Warning);
    assert!(last.message.starts_with("Cannot close"));
}

#[tokio::test(start_paused = true)]
async fn confirm_dialog_takes_priority_over_the_editor() {
    let mut app = loaded_app().await;
    press(&mut app, KeyCode::Char('f'));
    app.ctl.run_until_idle().await;
    press(&mut app, KeyCode::Char('e'));

    handle_key(&mut app, KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
    assert!(app.ctl.state().file.pending_confirmation().is_some());

    // 'x' is neither yes nor no and must not reach the buffer.
    press(&mut app, KeyCode::Char('x'));
    assert_eq!(app.ctl.state().file.content(), "[Unit]\n");

    press(&mut app, KeyCode::Char('n'));
    assert!(app.ctl.state().file.pending_confirmation().is_none());
    assert_eq!(app.ctl.state().file.mode(), EditMode::Editing);
}

#[tokio::test(start_paused = true)]
async fn cursor_stays_on_the_unit_through_the_follow_up_refresh() {
    let mut app = loaded_app().await;
    app.move_selection(false);
    assert_eq!(app.selected_unit().as_deref(), Some("sshd.service"));

    press(&mut app, KeyCode::Char('r'));
    while app.ctl.step().await {
        app.clamp_selection();
        assert_eq!(app.selected_unit().as_deref(), Some("sshd.service"));
    }
    assert_eq!(app.ctl.gateway().transport().sent.lock().unwrap().len(), 3);

    // Row keys keep working while a refresh is outstanding.
    app.refresh();
    assert!(app.ctl.state().registry.is_refreshing());
    press(&mut app, KeyCode::Char('x'));
    assert!(
        app.ctl
            .state()
            .dispatcher
            .is_locked(&ControlKey::new("sshd.service", Action::Stop))
    );
}

#[tokio::test(start_paused = true)]
async fn cursor_follows_the_unit_when_the_sort_changes() {
    let mut app = loaded_app().await;
    app.move_selection(false);
    assert_eq!(app.selected, 2);

    // By description: jobs (cron), OpenSSH (sshd), web (nginx).
    press(&mut app, KeyCode::Char('6'));
    app.clamp_selection();
    assert_eq!(app.selected, 1);
    assert_eq!(app.selected_unit().as_deref(), Some("sshd.service"));
}

#[tokio::test(start_paused = true)]
async fn refused_save_is_reported() {
    let mut app = loaded_app().await;
    press(&mut app, KeyCode::Char('f'));
    app.ctl.run_until_idle().await;
    press(&mut app, KeyCode::Char('e'));
    handle_key(&mut app, KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
    press(&mut app, KeyCode::Char('y'));
    assert_eq!(app.ctl.state().file.mode(), EditMode::Saving);

    handle_key(&mut app, KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
    app.ctl.tick_notifications(Instant::now());
    let last = app.ctl.state().notifications.live().last().cloned();
    let last = last.expect("a warning was posted");
    assert_eq!(last.kind, NoticeKind::Warning);
    assert!(last.message.starts_with("Cannot save"));

    app.ctl.run_until_idle().await;
    assert!(!app.ctl.state().file.is_open());
}

#[tokio::test(start_paused = true)]
async fn header_counts_actions_in_flight() {
    let mut app = loaded_app().await;
    assert_eq!(app.pending_label(), None);

    app.move_selection(true);
    press(&mut app, KeyCode::Char('s'));
    assert_eq!(app.pending_label().as_deref(), Some("1 action(s) pending"));

    app.ctl.run_until_idle().await;
    assert_eq!(app.pending_label(), None);
}

#[tokio::test(start_paused = true)]
async fn inspector_title_shows_the_row_state() {
    let mut app = loaded_app().await;
    assert_eq!(app.inspector_title(), None);

    app.move_selection(true);
    press(&mut app, KeyCode::Char('i'));
    assert_eq!(
        app.inspector_title().as_deref(),
        Some(" status nginx.service [active/running] (l logs, Esc close) ")
    );
}
