//! Owns the application state and every in-flight network call.
//!
//! User intents run synchronously against [`AppState`] and may spawn one
//! network task each. A task resolves to a [`Completion`], and
//! [`Controller::step`] applies completions one at a time, so state only
//! changes between suspensions.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::config::Config;
use crate::dispatcher::{ActionDispatcher, PendingAction};
use crate::file_session::{FetchRequest, FileEditSession, SaveApplied, SaveRequest, SessionError};
use crate::gateway::{ActionReply, FileReply, Gateway, GatewayError, HttpTransport, Transport};
use crate::inspector::{InspectKind, InspectRequest, Inspector};
use crate::model::{Action, ControlKey, DAEMON_TARGET, ServiceRecord};
use crate::notify::{NoticeKind, NotificationQueue, Notifier};
use crate::projection::{SortKey, ViewQuery};
use crate::registry::{RefreshTicket, ServiceRegistry};

const BRIEF: Duration = Duration::from_millis(1500);

#[derive(Debug, Default)]
pub struct AppState {
    pub registry: ServiceRegistry,
    pub view: ViewQuery,
    pub dispatcher: ActionDispatcher,
    pub file: FileEditSession,
    pub inspector: Inspector,
    pub notifications: NotificationQueue,
    /// Settling-delay refreshes whose timer has not fired yet.
    pub scheduled_refreshes: usize,
}

#[derive(Debug)]
pub enum Completion {
    ServicesLoaded {
        ticket: RefreshTicket,
        result: Result<Vec<ServiceRecord>, GatewayError>,
    },
    RefreshDue,
    ActionFinished {
        pending: PendingAction,
        result: Result<ActionReply, GatewayError>,
    },
    FileFetched {
        unit: String,
        result: Result<FileReply, GatewayError>,
    },
    FileSaved {
        unit: String,
        result: Result<ActionReply, GatewayError>,
    },
    Inspected {
        req: InspectRequest,
        result: Result<String, GatewayError>,
    },
}

pub struct Controller<T> {
    state: AppState,
    gateway: Arc<Gateway<T>>,
    notifier: Notifier,
    tasks: JoinSet<Completion>,
    settle_delay: Duration,
}

impl Controller<HttpTransport> {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let transport = HttpTransport::new(&cfg.base_url, cfg.request_timeout())?;
        Ok(Self::new(transport, cfg.settle_delay()))
    }
}

impl<T: Transport> Controller<T> {
    pub fn new(transport: T, settle_delay: Duration) -> Self {
        let state = AppState::default();
        let notifier = state.notifications.notifier();
        Self {
            gateway: Arc::new(Gateway::new(transport, notifier.clone())),
            state,
            notifier,
            tasks: JoinSet::new(),
            settle_delay,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn gateway(&self) -> &Gateway<T> {
        &self.gateway
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Outstanding tasks, timers included.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn refresh(&mut self) {
        let ticket = self.state.registry.begin_refresh();
        let gw = Arc::clone(&self.gateway);
        self.tasks.spawn(async move {
            let result = gw.list_services().await;
            Completion::ServicesLoaded { ticket, result }
        });
    }

    /// Returns false when the control is disabled and nothing was sent.
    pub fn dispatch(&mut self, unit: &str, action: Action) -> bool {
        let key = ControlKey::new(unit, action);
        let Some(pending) = self.state.dispatcher.begin(key) else {
            return false;
        };
        self.notifier.notify_for(
            format!("Performing {} on {}...", action, pending.key().target),
            NoticeKind::Info,
            BRIEF,
        );
        let gw = Arc::clone(&self.gateway);
        self.tasks.spawn(async move {
            let result = gw.control(pending.key()).await;
            Completion::ActionFinished { pending, result }
        });
        true
    }

    pub fn daemon_reload(&mut self) -> bool {
        self.dispatch(DAEMON_TARGET, Action::DaemonReload)
    }

    pub fn open_file(&mut self, unit: &str) {
        let req = self.state.file.open(unit);
        self.spawn_fetch(req);
    }

    pub fn edit_file(&mut self) -> Result<(), SessionError> {
        self.state.file.request_edit()?;
        self.notifier.warning("Editing enabled. Be careful!");
        Ok(())
    }

    pub fn file_buffer_mut(&mut self) -> Option<&mut String> {
        self.state.file.buffer_mut()
    }

    pub fn cancel_edit(&mut self) -> Result<(), SessionError> {
        let req = self.state.file.cancel()?;
        self.notifier
            .notify_for("Changes cancelled. Reloading file...", NoticeKind::Info, BRIEF);
        self.spawn_fetch(req);
        Ok(())
    }

    /// Arms the confirmation gate; the returned prompt describes the risk.
    pub fn request_save(&mut self) -> Result<String, SessionError> {
        self.state.file.request_save()
    }

    /// Returns whether a save request went out.
    pub fn confirm_save(&mut self, accepted: bool) -> Result<bool, SessionError> {
        match self.state.file.confirm_save(accepted)? {
            Some(req) => {
                self.notifier.info(format!("Saving file for {}...", req.unit));
                self.spawn_save(req);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn close_file(&mut self) -> Result<(), SessionError> {
        self.state.file.close()
    }

    pub fn inspect(&mut self, unit: &str, kind: InspectKind) {
        let req = self.state.inspector.open(unit, kind);
        self.spawn_inspect(req);
    }

    pub fn inspect_logs(&mut self) {
        if let Some(req) = self.state.inspector.open_logs() {
            self.spawn_inspect(req);
        }
    }

    pub fn close_inspector(&mut self) {
        self.state.inspector.close();
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.state.view.search = text.into();
    }

    pub fn sort_by(&mut self, key: SortKey) {
        self.state.view.sort.click(key);
    }

    pub fn tick_notifications(&mut self, now: Instant) {
        self.state.notifications.tick(now);
    }

    pub fn dismiss_notification(&mut self, id: u64, now: Instant) {
        self.state.notifications.dismiss(id, now);
    }

    /// Waits for the next task and applies it. False when nothing is
    /// outstanding.
    pub async fn step(&mut self) -> bool {
        let Some(joined) = self.tasks.join_next().await else {
            return false;
        };
        match joined {
            Ok(completion) => self.apply(completion),
            Err(err) => tracing::error!(error = %err, "background task failed"),
        }
        self.state.notifications.collect();
        true
    }

    /// Steps until nothing is outstanding, follow-up refreshes included.
    pub async fn run_until_idle(&mut self) {
        while self.step().await {}
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::ServicesLoaded { ticket, result } => {
                if self.state.registry.complete_refresh(ticket, result) {
                    self.state.dispatcher.rows_rebuilt();
                }
            }
            Completion::RefreshDue => {
                self.state.scheduled_refreshes = self.state.scheduled_refreshes.saturating_sub(1);
                self.refresh();
            }
            Completion::ActionFinished { pending, result } => {
                let key = pending.key().clone();
                if let Some(message) = self.state.dispatcher.finish(pending, &result) {
                    tracing::info!(%key, "action succeeded");
                    self.notifier.success(message);
                    self.schedule_refresh();
                }
            }
            Completion::FileFetched { unit, result } => {
                self.state.file.apply_fetch(&unit, result);
            }
            Completion::FileSaved { unit, result } => {
                let applied = self.state.file.apply_save(&unit, &result);
                if let Ok(reply) = &result {
                    self.notifier.success(reply.saved_message());
                }
                if applied == SaveApplied::Ignored {
                    tracing::info!(%unit, "save finished after the session moved on");
                }
            }
            Completion::Inspected { req, result } => {
                self.state.inspector.apply(&req, result);
            }
        }
    }

    fn schedule_refresh(&mut self) {
        self.state.scheduled_refreshes += 1;
        let delay = self.settle_delay;
        self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            Completion::RefreshDue
        });
    }

    fn spawn_fetch(&mut self, req: FetchRequest) {
        let gw = Arc::clone(&self.gateway);
        self.tasks.spawn(async move {
            let result = gw.read_file(&req.unit).await;
            Completion::FileFetched {
                unit: req.unit,
                result,
            }
        });
    }

    fn spawn_save(&mut self, req: SaveRequest) {
        let gw = Arc::clone(&self.gateway);
        self.tasks.spawn(async move {
            let result = gw.write_file(&req.unit, &req.content).await;
            Completion::FileSaved {
                unit: req.unit,
                result,
            }
        });
    }

    fn spawn_inspect(&mut self, req: InspectRequest) {
        let gw = Arc::clone(&self.gateway);
        self.tasks.spawn(async move {
            let result = match req.kind {
                InspectKind::Status => gw.status(&req.unit).await.map(|r| r.text().to_string()),
                InspectKind::Logs => gw.logs(&req.unit).await.map(|r| r.text().to_string()),
            };
            Completion::Inspected { req, result }
        });
    }
}
