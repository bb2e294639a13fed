//! Grouped counts and sums for the dashboard, analytics and map views.
//!
//! Amounts are summed as [`Decimal`] so totals over thousands of rows stay exact.
//! A project tagged with several pillars is counted in full under each of them,
//! so pillar totals do not reconcile to the grand total.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::Serialize;

use crate::models::ProjectRecord;

/// Group label for records with no state or LGA.
pub const UNSPECIFIED: &str = "Unspecified";

/// Integer percentage of `part` over `total`, rounded half up. Zero when `total` is zero.
pub fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as u128 * 200 + total as u128) / (total as u128 * 2)) as u32
}

/// Like [`percent`] for amounts. Zero when `total` is not positive.
pub fn amount_percent(part: Decimal, total: Decimal) -> u32 {
    if total <= Decimal::ZERO {
        return 0;
    }
    part.checked_div(total)
        .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
        .map(|rate| rate.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rate| rate.to_u32())
        .unwrap_or(0)
}

/// Add `amount` into `total`, saturating at the representable bound instead of panicking.
pub fn add_amount(total: &mut Decimal, amount: Decimal) {
    *total = match total.checked_add(amount) {
        Some(sum) => sum,
        None => {
            tracing::warn!(%total, %amount, "amount total overflowed; saturating");
            total.saturating_add(amount)
        }
    };
}

/// Saturating sum of amounts.
pub fn sum_amounts(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, |mut total, amount| {
        add_amount(&mut total, amount);
        total
    })
}

/// Mean amount rounded half up to whole currency units.
pub fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    total
        .checked_div(Decimal::from(count as u64))
        .map(|mean| mean.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
    pub percent: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BudgetByStatus {
    pub completed: Decimal,
    pub ongoing: Decimal,
    pub abandoned: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StateSummary {
    pub state: String,
    pub count: usize,
    pub completed: usize,
    pub ongoing: usize,
    pub budget: Decimal,
    pub disbursed: Decimal,
    pub lga_count: usize,
    pub completion_rate: u32,
    pub utilization_rate: u32,
    pub average_budget: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PillarSummary {
    pub pillar: String,
    pub count: usize,
    pub completed: usize,
    pub budget: Decimal,
    pub disbursed: Decimal,
    pub completion_rate: u32,
    pub average_budget: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LgaSummary {
    pub state: String,
    pub lga: String,
    pub count: usize,
    pub completed: usize,
    pub budget: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Coverage {
    pub states: usize,
    pub lgas: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub ongoing: usize,
    pub abandoned: usize,
    pub yet_to_commence: usize,
    pub completion_rate: u32,
    /// Every distinct status value, by count then name.
    pub by_status: Vec<StatusCount>,
    pub total_budget: Decimal,
    pub total_disbursed: Decimal,
    pub disbursement_rate: u32,
    pub average_budget: Decimal,
    pub budget_by_status: BudgetByStatus,
    pub by_state: Vec<StateSummary>,
    pub by_pillar: Vec<PillarSummary>,
    pub by_lga: Vec<LgaSummary>,
    pub coverage: Coverage,
}

impl Stats {
    pub fn state(&self, name: &str) -> Option<&StateSummary> {
        self.by_state.iter().find(|summary| summary.state == name)
    }

    pub fn pillar(&self, name: &str) -> Option<&PillarSummary> {
        self.by_pillar.iter().find(|summary| summary.pillar == name)
    }
}

#[derive(Default)]
struct StateAcc {
    summary: StateSummary,
    lgas: BTreeSet<String>,
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.collect::<BTreeSet<_>>().len()
}

pub fn summarize(records: &[ProjectRecord]) -> Stats {
    let mut stats = Stats {
        total: records.len(),
        ..Default::default()
    };
    let mut statuses: BTreeMap<String, usize> = BTreeMap::new();
    let mut states: BTreeMap<String, StateAcc> = BTreeMap::new();
    let mut pillars: BTreeMap<String, PillarSummary> = BTreeMap::new();
    let mut lgas: BTreeMap<(String, String), LgaSummary> = BTreeMap::new();

    for record in records {
        let budget = record.budget();
        let disbursed = record.disbursed();
        let completed = record.is_completed();
        let ongoing = record.is_ongoing();

        add_amount(&mut stats.total_budget, budget);
        add_amount(&mut stats.total_disbursed, disbursed);
        if completed {
            stats.completed += 1;
            add_amount(&mut stats.budget_by_status.completed, budget);
        }
        if ongoing {
            stats.ongoing += 1;
            add_amount(&mut stats.budget_by_status.ongoing, budget);
        }
        if record.is_abandoned() {
            stats.abandoned += 1;
            add_amount(&mut stats.budget_by_status.abandoned, budget);
        }
        if record.is_yet_to_commence() {
            stats.yet_to_commence += 1;
        }
        if let Some(status) = &record.status {
            *statuses.entry(status.clone()).or_default() += 1;
        }

        let state = record.state.clone().unwrap_or_else(|| UNSPECIFIED.to_string());
        let lga = record.lga.clone().unwrap_or_else(|| UNSPECIFIED.to_string());

        let acc = states.entry(state.clone()).or_default();
        acc.summary.count += 1;
        add_amount(&mut acc.summary.budget, budget);
        add_amount(&mut acc.summary.disbursed, disbursed);
        acc.summary.completed += usize::from(completed);
        acc.summary.ongoing += usize::from(ongoing);
        if let Some(lga) = &record.lga {
            acc.lgas.insert(lga.clone());
        }

        let area = lgas
            .entry((state.clone(), lga.clone()))
            .or_insert_with(|| LgaSummary {
                state,
                lga,
                ..Default::default()
            });
        area.count += 1;
        add_amount(&mut area.budget, budget);
        area.completed += usize::from(completed);

        for pillar in &record.pillars {
            let group = pillars.entry(pillar.clone()).or_default();
            group.count += 1;
            add_amount(&mut group.budget, budget);
            add_amount(&mut group.disbursed, disbursed);
            group.completed += usize::from(completed);
        }
    }

    stats.completion_rate = percent(stats.completed, stats.total);
    stats.disbursement_rate = amount_percent(stats.total_disbursed, stats.total_budget);
    stats.average_budget = average(stats.total_budget, stats.total);

    let mut by_status: Vec<StatusCount> = statuses
        .into_iter()
        .map(|(status, count)| StatusCount {
            status,
            count,
            percent: percent(count, stats.total),
        })
        .collect();
    by_status.sort_by(|a, b| b.count.cmp(&a.count));
    stats.by_status = by_status;

    stats.coverage = Coverage {
        states: distinct(records.iter().filter_map(|r| r.state.as_deref())),
        lgas: distinct(records.iter().filter_map(|r| r.lga.as_deref())),
    };

    stats.by_state = states
        .into_iter()
        .map(|(state, acc)| {
            let mut summary = acc.summary;
            summary.state = state;
            summary.lga_count = acc.lgas.len();
            summary.completion_rate = percent(summary.completed, summary.count);
            summary.utilization_rate = amount_percent(summary.disbursed, summary.budget);
            summary.average_budget = average(summary.budget, summary.count);
            summary
        })
        .collect();

    stats.by_pillar = pillars
        .into_iter()
        .map(|(pillar, mut summary)| {
            summary.pillar = pillar;
            summary.completion_rate = percent(summary.completed, summary.count);
            summary.average_budget = average(summary.budget, summary.count);
            summary
        })
        .collect();

    stats.by_lga = lgas.into_values().collect();
    stats
}
