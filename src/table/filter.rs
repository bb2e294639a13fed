//! Multi-field record filter.
//!
//! Each non-empty field of a [`FilterSpec`] is a set of accepted values. A
//! record passes a field when one of its own values is in that set, and passes
//! the filter when it passes every field.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    models::ProjectRecord,
    regions::{self, PILLARS, STATES, STATUS_OPTIONS},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Pillars,
    States,
    Lgas,
    Status,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Pillars,
        FilterField::States,
        FilterField::Lgas,
        FilterField::Status,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Pillars => "Pillars",
            FilterField::States => "States",
            FilterField::Lgas => "LGAs",
            FilterField::Status => "Status",
        }
    }
}

/// Accepted values per field. The LGA set is kept within the areas of the selected states.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FilterSpecWire")]
pub struct FilterSpec {
    pillars: BTreeSet<String>,
    states: BTreeSet<String>,
    lgas: BTreeSet<String>,
    status: BTreeSet<String>,
}

/// Serialized form as handed between views; pruned on the way in.
#[derive(Deserialize)]
struct FilterSpecWire {
    #[serde(default)]
    pillars: BTreeSet<String>,
    #[serde(default)]
    states: BTreeSet<String>,
    #[serde(default)]
    lgas: BTreeSet<String>,
    #[serde(default, alias = "statuses")]
    status: BTreeSet<String>,
}

impl From<FilterSpecWire> for FilterSpec {
    fn from(wire: FilterSpecWire) -> Self {
        let mut spec = FilterSpec {
            pillars: wire.pillars,
            states: wire.states,
            lgas: wire.lgas,
            status: wire.status,
        };
        spec.prune_lgas();
        spec
    }
}

fn to_set<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

fn field_passes<'a>(
    selected: &BTreeSet<String>,
    mut values: impl Iterator<Item = &'a str>,
) -> bool {
    selected.is_empty() || values.any(|value| selected.contains(value))
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pillars<I, S>(mut self, pillars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pillars = to_set(pillars);
        self
    }

    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_states(states);
        self
    }

    /// Areas outside the currently selected states are dropped.
    pub fn with_lgas<I, S>(mut self, lgas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lgas = to_set(lgas);
        self.prune_lgas();
        self
    }

    pub fn with_status<I, S>(mut self, status: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.status = to_set(status);
        self
    }

    pub fn pillars(&self) -> &BTreeSet<String> {
        &self.pillars
    }

    pub fn states(&self) -> &BTreeSet<String> {
        &self.states
    }

    pub fn lgas(&self) -> &BTreeSet<String> {
        &self.lgas
    }

    pub fn status(&self) -> &BTreeSet<String> {
        &self.status
    }

    pub fn values(&self, field: FilterField) -> &BTreeSet<String> {
        match field {
            FilterField::Pillars => &self.pillars,
            FilterField::States => &self.states,
            FilterField::Lgas => &self.lgas,
            FilterField::Status => &self.status,
        }
    }

    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|field| self.values(*field).is_empty())
    }

    /// Replace the state selection, returning the areas that became unreachable.
    pub fn set_states<I, S>(&mut self, states: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = to_set(states);
        self.prune_lgas()
    }

    /// Areas reachable from the selected states, in mapping order.
    pub fn available_lgas(&self) -> Vec<&'static str> {
        regions::lgas_for_states(self.states.iter().map(String::as_str))
    }

    /// Drop every area not reachable from the selected states.
    pub fn prune_lgas(&mut self) -> Vec<String> {
        let available = self.available_lgas();
        let (kept, removed): (BTreeSet<String>, BTreeSet<String>) = std::mem::take(&mut self.lgas)
            .into_iter()
            .partition(|lga| available.contains(&lga.as_str()));
        self.lgas = kept;
        if !removed.is_empty() {
            tracing::debug!(removed = ?removed, "pruned unreachable LGAs");
        }
        removed.into_iter().collect()
    }

    /// Add the value if absent, remove it if present.
    pub fn toggle(&mut self, field: FilterField, value: &str) {
        let set = match field {
            FilterField::Pillars => &mut self.pillars,
            FilterField::States => &mut self.states,
            FilterField::Lgas => &mut self.lgas,
            FilterField::Status => &mut self.status,
        };
        if !set.remove(value) {
            set.insert(value.to_string());
        }
        if matches!(field, FilterField::States | FilterField::Lgas) {
            self.prune_lgas();
        }
    }

    /// Options offered for a field given the current selection.
    pub fn options(&self, field: FilterField) -> Vec<&'static str> {
        match field {
            FilterField::Pillars => PILLARS.to_vec(),
            FilterField::States => STATES.to_vec(),
            FilterField::Lgas => self.available_lgas(),
            FilterField::Status => STATUS_OPTIONS.to_vec(),
        }
    }

    /// Select every option of a field, or clear it when all are already selected.
    pub fn select_all(&mut self, field: FilterField) {
        let options = self.options(field);
        let selected = self.values(field);
        let next = if options.iter().all(|option| selected.contains(*option)) {
            BTreeSet::new()
        } else {
            to_set(options)
        };
        match field {
            FilterField::Pillars => self.pillars = next,
            FilterField::States => {
                self.states = next;
                self.prune_lgas();
            }
            FilterField::Lgas => self.lgas = next,
            FilterField::Status => self.status = next,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// AND across fields, OR within a field. Missing record values never match a constrained field.
    pub fn matches(&self, record: &ProjectRecord) -> bool {
        field_passes(&self.pillars, record.pillars.iter().map(String::as_str))
            && field_passes(&self.states, record.state.as_deref().into_iter())
            && field_passes(&self.lgas, record.lga.as_deref().into_iter())
            && field_passes(&self.status, record.status.as_deref().into_iter())
    }

    pub fn apply(&self, records: &[ProjectRecord]) -> Vec<ProjectRecord> {
        apply(records, self)
    }

    /// One `Label: a, b` line per field, `All` when unconstrained.
    pub fn describe(&self) -> String {
        FilterField::ALL
            .iter()
            .map(|field| {
                let values = self.values(*field);
                let shown = if values.is_empty() {
                    "All".to_string()
                } else {
                    values.iter().cloned().collect::<Vec<_>>().join(", ")
                };
                format!("{}: {}", field.label(), shown)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Stable filter: kept records retain their input order.
pub fn apply(records: &[ProjectRecord], spec: &FilterSpec) -> Vec<ProjectRecord> {
    if spec.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| spec.matches(record))
        .cloned()
        .collect()
}
