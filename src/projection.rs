//! Filter and sort the registry snapshot into the rows to display.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::model::ServiceRecord;
use crate::registry::{LoadStatus, ServiceRegistry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Unit,
    Load,
    Active,
    Sub,
    Enabled,
    Description,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Unit,
        SortKey::Load,
        SortKey::Active,
        SortKey::Sub,
        SortKey::Enabled,
        SortKey::Description,
    ];

    pub fn field(self, rec: &ServiceRecord) -> &str {
        match self {
            SortKey::Unit => &rec.unit,
            SortKey::Load => &rec.load,
            SortKey::Active => &rec.active,
            SortKey::Sub => &rec.sub,
            SortKey::Enabled => &rec.enabled,
            SortKey::Description => &rec.description,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Unit => "unit",
            SortKey::Load => "load",
            SortKey::Active => "active",
            SortKey::Sub => "sub",
            SortKey::Enabled => "enabled",
            SortKey::Description => "description",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown sort key '{}'", s))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::Unit,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortState {
    /// Column-header click: same column flips direction, another column
    /// becomes the key, ascending.
    pub fn click(&mut self, key: SortKey) {
        if key == self.key {
            self.direction = self.direction.toggled();
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Search text and sort order chosen by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: String,
    pub sort: SortState,
}

impl ViewQuery {
    pub fn is_filtering(&self) -> bool {
        !self.search.trim().is_empty()
    }
}

pub fn matches(rec: &ServiceRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [&rec.unit, &rec.description, &rec.active, &rec.enabled]
        .iter()
        .any(|f| f.to_lowercase().contains(needle))
}

pub fn project<'a>(
    snapshot: &'a [ServiceRecord],
    query: &str,
    key: SortKey,
    direction: SortDirection,
) -> Vec<&'a ServiceRecord> {
    let needle = query.trim().to_lowercase();
    let mut rows: Vec<&ServiceRecord> = snapshot.iter().filter(|r| matches(r, &needle)).collect();

    // `sort_by` is stable; equal keys keep their filtered order in both directions.
    rows.sort_by(|a, b| {
        let ord = compare_fold(key.field(a), key.field(b));
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    rows
}

fn compare_fold(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[derive(Debug, PartialEq)]
pub enum ListDisplay<'a> {
    Loading,
    Failed(&'a str),
    Empty { filtered: bool },
    Populated(Vec<&'a ServiceRecord>),
}

pub fn display<'a>(registry: &'a ServiceRegistry, view: &ViewQuery) -> ListDisplay<'a> {
    match registry.status() {
        LoadStatus::Loading => ListDisplay::Loading,
        LoadStatus::Failed(msg) => ListDisplay::Failed(msg),
        LoadStatus::Loaded => {
            let rows = project(
                registry.snapshot(),
                &view.search,
                view.sort.key,
                view.sort.direction,
            );
            if rows.is_empty() {
                ListDisplay::Empty {
                    filtered: view.is_filtering(),
                }
            } else {
                ListDisplay::Populated(rows)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/projection_tests.rs"]
mod tests;
