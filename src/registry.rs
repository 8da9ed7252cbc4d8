//! The in-memory snapshot of every service the API reports.

use time::OffsetDateTime;

use crate::gateway::GatewayError;
use crate::model::ServiceRecord;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Loaded,
    Failed(String),
}

/// Identifies one issued refresh, for logging only. Completions are applied
/// in arrival order regardless of ticket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshTicket(pub u64);

#[derive(Debug)]
pub struct ServiceRegistry {
    snapshot: Vec<ServiceRecord>,
    status: LoadStatus,
    issued: u64,
    in_flight: usize,
    last_loaded: Option<OffsetDateTime>,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self {
            snapshot: Vec::new(),
            status: LoadStatus::Loading,
            issued: 0,
            in_flight: 0,
            last_loaded: None,
        }
    }
}

impl ServiceRegistry {
    pub fn snapshot(&self) -> &[ServiceRecord] {
        &self.snapshot
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn last_loaded(&self) -> Option<OffsetDateTime> {
        self.last_loaded
    }

    pub fn find(&self, unit: &str) -> Option<&ServiceRecord> {
        self.snapshot.iter().find(|r| r.unit == unit)
    }

    /// True while any refresh is outstanding, including background ones
    /// that keep the current rows on screen.
    pub fn is_refreshing(&self) -> bool {
        self.in_flight > 0
    }

    /// Only a registry that has never loaded goes back to `Loading`; once a
    /// snapshot exists it stays displayed until a response replaces it.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        self.in_flight += 1;
        if self.last_loaded.is_none() {
            self.status = LoadStatus::Loading;
        }
        RefreshTicket(self.issued)
    }

    /// Applies one refresh response. A success replaces the snapshot
    /// wholesale; a failure keeps the previous one. Returns whether the
    /// snapshot was replaced.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<ServiceRecord>, GatewayError>,
    ) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        match result {
            Ok(services) => {
                let services = dedup_units(services);
                tracing::info!(ticket = ticket.0, count = services.len(), "services refreshed");
                self.snapshot = services;
                self.status = LoadStatus::Loaded;
                self.last_loaded = Some(OffsetDateTime::now_utc());
                true
            }
            Err(err) => {
                tracing::warn!(ticket = ticket.0, error = %err, "service refresh failed");
                self.status = LoadStatus::Failed(err.to_string());
                false
            }
        }
    }
}

// Rows are keyed by unit; keep the first record when the server repeats one.
fn dedup_units(services: Vec<ServiceRecord>) -> Vec<ServiceRecord> {
    let mut seen = std::collections::HashSet::new();
    services
        .into_iter()
        .filter(|r| seen.insert(r.unit.clone()))
        .collect()
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
