//! Transient, stacked user notifications.
//!
//! Producers hold a cloneable [`Notifier`]; the [`NotificationQueue`] owns the
//! live list and advances it on [`NotificationQueue::tick`]. A notification
//! that has started its exit transition stays live until the transition has
//! run its course.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

/// How long a notification takes to animate out once it starts leaving.
pub const EXIT_TRANSITION: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeKind {
    pub fn default_duration(self) -> Duration {
        match self {
            NoticeKind::Error => Duration::from_secs(6),
            NoticeKind::Info | NoticeKind::Success | NoticeKind::Warning => {
                Duration::from_secs(4)
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NoticeKind::Info => "info",
            NoticeKind::Success => "success",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Shown,
    Exiting { since: Instant },
}

#[derive(Clone, Debug)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NoticeKind,
    pub duration: Duration,
    pub created_at: Instant,
    pub phase: Phase,
}

impl Notification {
    pub fn is_exiting(&self) -> bool {
        matches!(self.phase, Phase::Exiting { .. })
    }
}

#[derive(Debug)]
struct Posted {
    message: String,
    kind: NoticeKind,
    duration: Duration,
    created_at: Instant,
}

#[derive(Clone, Debug)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Posted>,
}

impl Notifier {
    pub fn notify(&self, message: impl Into<String>, kind: NoticeKind) {
        self.notify_for(message, kind, kind.default_duration());
    }

    pub fn notify_for(&self, message: impl Into<String>, kind: NoticeKind, duration: Duration) {
        let posted = Posted {
            message: message.into(),
            kind,
            duration,
            created_at: Instant::now(),
        };
        if self.tx.send(posted).is_err() {
            tracing::debug!("notification queue dropped; message discarded");
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(message, NoticeKind::Info);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(message, NoticeKind::Success);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notify(message, NoticeKind::Warning);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(message, NoticeKind::Error);
    }
}

#[derive(Debug)]
pub struct NotificationQueue {
    tx: mpsc::UnboundedSender<Posted>,
    rx: mpsc::UnboundedReceiver<Posted>,
    live: Vec<Notification>,
    next_id: u64,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            live: Vec::new(),
            next_id: 1,
        }
    }

    pub fn notifier(&self) -> Notifier {
        Notifier {
            tx: self.tx.clone(),
        }
    }

    /// Moves everything posted so far into the live list, in posting order.
    pub fn collect(&mut self) {
        while let Ok(posted) = self.rx.try_recv() {
            let id = self.next_id;
            self.next_id += 1;
            self.live.push(Notification {
                id,
                message: posted.message,
                kind: posted.kind,
                duration: posted.duration,
                created_at: posted.created_at,
                phase: Phase::Shown,
            });
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.collect();

        for n in &mut self.live {
            if n.phase == Phase::Shown && now >= n.created_at + n.duration {
                n.phase = Phase::Exiting { since: now };
            }
        }
        self.live.retain(|n| match n.phase {
            Phase::Shown => true,
            Phase::Exiting { since } => now < since + EXIT_TRANSITION,
        });
    }

    /// Starts the exit transition of one notification ahead of its expiry.
    pub fn dismiss(&mut self, id: u64, now: Instant) {
        if let Some(n) = self.live.iter_mut().find(|n| n.id == id) {
            if n.phase == Phase::Shown {
                n.phase = Phase::Exiting { since: now };
            }
        }
    }

    pub fn live(&self) -> &[Notification] {
        &self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/notify_tests.rs"]
mod tests;
