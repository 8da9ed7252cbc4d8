//! Service records and the closed set of control actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier used for actions that are not bound to a single unit.
pub const DAEMON_TARGET: &str = "daemon";

/// One row of the service list as reported by `GET /api/services`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub unit: String,
    #[serde(default)]
    pub load: String,
    #[serde(default)]
    pub active: String,
    #[serde(default)]
    pub sub: String,
    #[serde(default = "unknown_label")]
    pub enabled: String,
    #[serde(default)]
    pub description: String,
}

fn unknown_label() -> String {
    "unknown".to_string()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Start,
    Stop,
    Restart,
    Enable,
    Disable,
    DaemonReload,
}

impl Action {
    /// Actions offered on every service row.
    pub const ROW: [Action; 5] = [
        Action::Start,
        Action::Stop,
        Action::Restart,
        Action::Enable,
        Action::Disable,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Restart => "restart",
            Action::Enable => "enable",
            Action::Disable => "disable",
            Action::DaemonReload => "daemon-reload",
        }
    }

    pub fn is_daemon_wide(self) -> bool {
        matches!(self, Action::DaemonReload)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Action::Start),
            "stop" => Ok(Action::Stop),
            "restart" => Ok(Action::Restart),
            "enable" => Ok(Action::Enable),
            "disable" => Ok(Action::Disable),
            "daemon-reload" => Ok(Action::DaemonReload),
            other => Err(format!(
                "unknown action '{}' (expected start, stop, restart, enable, disable or daemon-reload)",
                other
            )),
        }
    }
}

/// The (target, action) pair a control is bound to. Also the lock key of
/// the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlKey {
    pub target: String,
    pub action: Action,
}

impl ControlKey {
    pub fn new(unit: &str, action: Action) -> Self {
        let target = if action.is_daemon_wide() {
            DAEMON_TARGET.to_string()
        } else {
            unit.to_string()
        };
        Self { target, action }
    }

    pub fn daemon_reload() -> Self {
        Self::new(DAEMON_TARGET, Action::DaemonReload)
    }
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.target)
    }
}

/// Coarse classification of the state labels, for renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Failed,
    Activating,
    Active,
    Inactive,
    Running,
    Exited,
    Dead,
    Enabled,
    Disabled,
    Static,
    Masked,
    Neutral,
}

pub fn active_tone(label: &str) -> StatusTone {
    let s = label.to_lowercase();
    if s.contains("failed") {
        StatusTone::Failed
    } else if s.contains("activating") || s.contains("reloading") {
        StatusTone::Activating
    } else if s.contains("inactive") || s.contains("dead") {
        // "inactive" contains "active"; check it first.
        StatusTone::Inactive
    } else if s.contains("active") || s.contains("running") {
        StatusTone::Active
    } else {
        StatusTone::Neutral
    }
}

pub fn sub_tone(label: &str) -> StatusTone {
    let s = label.to_lowercase();
    if s.contains("running") {
        StatusTone::Running
    } else if s.contains("exited") {
        StatusTone::Exited
    } else if s.contains("failed") {
        StatusTone::Failed
    } else if s.contains("dead") {
        StatusTone::Dead
    } else {
        StatusTone::Neutral
    }
}

pub fn enabled_tone(label: &str) -> StatusTone {
    match label.to_lowercase().as_str() {
        "enabled" | "enabled-runtime" => StatusTone::Enabled,
        "disabled" => StatusTone::Disabled,
        "static" => StatusTone::Static,
        "masked" => StatusTone::Masked,
        _ => StatusTone::Neutral,
    }
}

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod tests;
