use std::time::Duration;

use tokio::time::Instant;

use crate::controller::Controller;
use crate::file_session::EditMode;
use crate::gateway::Transport;
use crate::inspector::InspectKind;
use crate::model::Action;
use crate::projection::{self, ListDisplay, SortKey};
use crate::tui::TuiRunOptions;

use super::input::{self, Input};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Focus {
    Table,
    Search,
}

pub(super) struct App<T> {
    pub(super) ctl: Controller<T>,
    pub(super) selected: usize,
    /// Unit under the cursor; the cursor follows it when rows are rebuilt.
    pub(super) anchor: Option<String>,
    pub(super) focus: Focus,
    pub(super) search: Input,

    // File modal.
    pub(super) edit_cursor: usize,
    pub(super) file_scroll: usize,

    pub(super) inspect_scroll: usize,

    pub(super) auto_refresh: Option<Duration>,
    pub(super) last_refresh: Instant,

    pub(super) quit: bool,
}

impl<T: Transport> App<T> {
    pub(super) fn new(ctl: Controller<T>, opts: TuiRunOptions) -> Self {
        Self {
            ctl,
            selected: 0,
            anchor: None,
            focus: Focus::Table,
            search: Input::default(),
            edit_cursor: 0,
            file_scroll: 0,
            inspect_scroll: 0,
            auto_refresh: opts.auto_refresh,
            last_refresh: Instant::now(),
            quit: false,
        }
    }

    pub(super) fn refresh(&mut self) {
        self.ctl.refresh();
        self.last_refresh = Instant::now();
    }

    pub(super) fn maybe_auto_refresh(&mut self) {
        let Some(every) = self.auto_refresh else {
            return;
        };
        let st = self.ctl.state();
        let busy = st.registry.is_refreshing() || st.file.mode() == EditMode::Editing;
        if !busy && self.last_refresh.elapsed() >= every {
            self.refresh();
        }
    }

    pub(super) fn row_count(&self) -> usize {
        let st = self.ctl.state();
        match projection::display(&st.registry, &st.view) {
            ListDisplay::Populated(rows) => rows.len(),
            _ => 0,
        }
    }

    pub(super) fn selected_unit(&self) -> Option<String> {
        let st = self.ctl.state();
        match projection::display(&st.registry, &st.view) {
            ListDisplay::Populated(rows) => rows
                .get(self.selected.min(rows.len().saturating_sub(1)))
                .map(|r| r.unit.clone()),
            _ => None,
        }
    }

    pub(super) fn move_selection(&mut self, down: bool) {
        let n = self.row_count();
        if n == 0 {
            self.selected = 0;
            return;
        }
        self.selected = if down {
            (self.selected + 1) % n
        } else {
            (self.selected + n - 1) % n
        };
        self.anchor = self.selected_unit();
    }

    /// Re-seats the cursor on the anchored unit after the rows changed.
    /// While nothing is listed the cursor is left alone.
    pub(super) fn clamp_selection(&mut self) {
        let st = self.ctl.state();
        let ListDisplay::Populated(rows) = projection::display(&st.registry, &st.view) else {
            return;
        };
        let anchored = self
            .anchor
            .as_deref()
            .and_then(|unit| rows.iter().position(|r| r.unit == unit));
        match anchored {
            Some(idx) => self.selected = idx,
            None => {
                self.selected = self.selected.min(rows.len() - 1);
                self.anchor = Some(rows[self.selected].unit.clone());
            }
        }
    }

    pub(super) fn search_changed(&mut self) {
        self.ctl.set_search(self.search.buf.clone());
        self.selected = 0;
        self.anchor = None;
    }

    pub(super) fn sort_column(&mut self, idx: usize) {
        if let Some(key) = SortKey::ALL.get(idx) {
            self.ctl.sort_by(*key);
        }
    }

    pub(super) fn row_action(&mut self, action: Action) {
        if let Some(unit) = self.selected_unit() {
            self.ctl.dispatch(&unit, action);
        }
    }

    pub(super) fn open_file(&mut self) {
        if let Some(unit) = self.selected_unit() {
            self.ctl.open_file(&unit);
            self.edit_cursor = 0;
            self.file_scroll = 0;
        }
    }

    pub(super) fn inspect(&mut self, kind: InspectKind) {
        if let Some(unit) = self.selected_unit() {
            self.ctl.inspect(&unit, kind);
            self.inspect_scroll = 0;
        }
    }

    /// Header text for the actions still waiting on the server.
    pub(super) fn pending_label(&self) -> Option<String> {
        match self.ctl.state().dispatcher.pending_count() {
            0 => None,
            n => Some(format!("{} action(s) pending", n)),
        }
    }

    pub(super) fn inspector_title(&self) -> Option<String> {
        let st = self.ctl.state();
        let (req, _) = st.inspector.current()?;
        let state_label = st
            .registry
            .find(&req.unit)
            .map(|r| format!(" [{}/{}]", r.active, r.sub))
            .unwrap_or_default();
        Some(format!(
            " {} {}{} (l logs, Esc close) ",
            req.kind.label(),
            req.unit,
            state_label
        ))
    }

    pub(super) fn start_edit(&mut self) {
        if self.ctl.edit_file().is_ok() {
            self.edit_cursor = self.ctl.state().file.content().len();
        }
    }

    pub(super) fn cancel_edit(&mut self) {
        if self.ctl.cancel_edit().is_ok() {
            self.edit_cursor = 0;
            self.file_scroll = 0;
        }
    }

    pub(super) fn close_file(&mut self) {
        if let Err(err) = self.ctl.close_file() {
            self.ctl.notifier().warning(format!("Cannot close: {}", err));
        }
    }

    pub(super) fn request_save(&mut self) {
        if let Err(err) = self.ctl.request_save() {
            self.ctl.notifier().warning(format!("Cannot save: {}", err));
        }
    }

    pub(super) fn confirm_save(&mut self, accepted: bool) {
        if let Err(err) = self.ctl.confirm_save(accepted) {
            self.ctl.notifier().warning(format!("Cannot save: {}", err));
        }
    }

    pub(super) fn edit_buffer(&mut self, f: impl FnOnce(&mut String, &mut usize)) {
        let mut cursor = self.edit_cursor;
        if let Some(buf) = self.ctl.file_buffer_mut() {
            f(buf, &mut cursor);
            self.edit_cursor = cursor;
        }
    }

    pub(super) fn cursor_line_col(&self) -> (usize, usize) {
        input::line_col(self.ctl.state().file.content(), self.edit_cursor)
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/app_tests.rs"]
mod tests;
