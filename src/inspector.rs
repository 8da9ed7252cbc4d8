//! Read-only status/logs viewer for one unit.

use crate::gateway::GatewayError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InspectKind {
    Status,
    Logs,
}

impl InspectKind {
    pub fn label(self) -> &'static str {
        match self {
            InspectKind::Status => "status",
            InspectKind::Logs => "logs",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InspectState {
    Loading,
    Loaded(String),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InspectRequest {
    pub unit: String,
    pub kind: InspectKind,
}

#[derive(Debug, Default)]
pub struct Inspector {
    view: Option<(InspectRequest, InspectState)>,
}

impl Inspector {
    pub fn current(&self) -> Option<(&InspectRequest, &InspectState)> {
        self.view.as_ref().map(|(r, s)| (r, s))
    }

    pub fn is_open(&self) -> bool {
        self.view.is_some()
    }

    pub fn open(&mut self, unit: &str, kind: InspectKind) -> InspectRequest {
        let req = InspectRequest {
            unit: unit.to_string(),
            kind,
        };
        self.view = Some((req.clone(), InspectState::Loading));
        req
    }

    /// Logs for whatever unit is currently shown.
    pub fn open_logs(&mut self) -> Option<InspectRequest> {
        let unit = self.view.as_ref()?.0.unit.clone();
        Some(self.open(&unit, InspectKind::Logs))
    }

    pub fn apply(&mut self, req: &InspectRequest, result: Result<String, GatewayError>) -> bool {
        let Some((current, state)) = self.view.as_mut() else {
            return false;
        };
        if current != req || *state != InspectState::Loading {
            return false;
        }
        *state = match result {
            Ok(text) => InspectState::Loaded(text),
            Err(err) => InspectState::Failed(format!("Error loading {}: {}", req.kind.label(), err)),
        };
        true
    }

    pub fn close(&mut self) {
        self.view = None;
    }
}

pub fn loading_text(kind: InspectKind) -> &'static str {
    match kind {
        InspectKind::Status => "Loading status...",
        InspectKind::Logs => "Loading logs...",
    }
}

#[cfg(test)]
#[path = "tests/inspector_tests.rs"]
mod tests;
