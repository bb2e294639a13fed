use std::collections::BTreeSet;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    assistant::{Intent, QueryResult, QueryRule},
    models::{ProjectRecord, ProjectStatus, is_completed_status},
    regions::{PILLARS, STATES, STATUS_OPTIONS},
    table::{filter::FilterSpec, stats},
};

fn mentions_any(question: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| question.contains(keyword))
}

fn count_where(records: &[ProjectRecord], predicate: impl Fn(&ProjectRecord) -> bool) -> usize {
    records.iter().filter(|record| predicate(record)).count()
}

/// Status lists every closed-list option containing the marker plus every observed one.
fn completed_statuses(records: &[ProjectRecord]) -> BTreeSet<String> {
    STATUS_OPTIONS
        .iter()
        .map(|status| status.to_string())
        .filter(|status| is_completed_status(status))
        .chain(
            records
                .iter()
                .filter_map(|record| record.status.clone())
                .filter(|status| is_completed_status(status)),
        )
        .collect()
}

/// `1234567.5` -> `₦1,234,568`.
pub fn format_naira(amount: Decimal) -> String {
    let whole = amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_string();
    let (sign, digits) = match whole.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", whole.as_str()),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}₦{grouped}")
}

pub struct OngoingRule;

impl QueryRule for OngoingRule {
    fn matches(&self, question: &str) -> bool {
        mentions_any(question, &["ongoing", "in progress"])
    }

    fn answer(&self, _question: &str, records: &[ProjectRecord]) -> QueryResult {
        let count = count_where(records, ProjectRecord::is_ongoing);
        QueryResult::new(
            Intent::Ongoing,
            format!(
                "Found {count} ongoing projects. \
                 These projects are currently in progress across the North East region."
            ),
        )
        .with_directive(FilterSpec::new().with_status([ProjectStatus::Ongoing.as_str()]))
    }

    fn name(&self) -> &str {
        "ongoing"
    }
}

pub struct CompletedRule;

impl QueryRule for CompletedRule {
    fn matches(&self, question: &str) -> bool {
        question.contains("completed")
    }

    fn answer(&self, _question: &str, records: &[ProjectRecord]) -> QueryResult {
        let count = count_where(records, ProjectRecord::is_completed);
        QueryResult::new(
            Intent::Completed,
            format!(
                "Found {count} completed projects. \
                 These projects have been successfully finished."
            ),
        )
        .with_directive(FilterSpec::new().with_status(completed_statuses(records)))
    }

    fn name(&self) -> &str {
        "completed"
    }
}

pub struct AbandonedRule;

impl QueryRule for AbandonedRule {
    fn matches(&self, question: &str) -> bool {
        question.contains("abandoned")
    }

    fn answer(&self, _question: &str, records: &[ProjectRecord]) -> QueryResult {
        let count = count_where(records, ProjectRecord::is_abandoned);
        QueryResult::new(
            Intent::Abandoned,
            format!(
                "Found {count} abandoned projects. \
                 These projects were discontinued for various reasons."
            ),
        )
        .with_directive(FilterSpec::new().with_status([ProjectStatus::Abandoned.as_str()]))
    }

    fn name(&self) -> &str {
        "abandoned"
    }
}

/// Projects in the first state named in the question. State values compare case-insensitively.
pub struct StateRule;

impl StateRule {
    fn mentioned(question: &str) -> Option<&'static str> {
        STATES
            .iter()
            .copied()
            .find(|state| question.contains(&state.to_lowercase()))
    }
}

impl QueryRule for StateRule {
    fn matches(&self, question: &str) -> bool {
        Self::mentioned(question).is_some()
    }

    fn answer(&self, question: &str, records: &[ProjectRecord]) -> QueryResult {
        let Some(state) = Self::mentioned(question) else {
            return HelpRule.answer(question, records);
        };
        let in_state = |record: &ProjectRecord| {
            record
                .state
                .as_deref()
                .is_some_and(|value| value.eq_ignore_ascii_case(state))
        };
        let count = count_where(records, in_state);
        let variants: BTreeSet<String> = std::iter::once(state.to_string())
            .chain(
                records
                    .iter()
                    .filter(|&record| in_state(record))
                    .filter_map(|record| record.state.clone()),
            )
            .collect();
        QueryResult::new(
            Intent::State(state.to_string()),
            format!(
                "Found {count} projects in {state} State. \
                 These projects span across various LGAs and development pillars."
            ),
        )
        .with_directive(FilterSpec::new().with_states(variants))
    }

    fn name(&self) -> &str {
        "state"
    }
}

/// Projects tagged with any pillar whose name contains `needle`.
pub struct PillarRule {
    name: &'static str,
    keywords: &'static [&'static str],
    needle: &'static str,
    pillar: &'static str,
    blurb: &'static str,
}

impl PillarRule {
    pub fn agriculture() -> Self {
        Self {
            name: "agriculture",
            keywords: &["agriculture", "farming"],
            needle: "agriculture",
            pillar: "Leadership in Agriculture",
            blurb: "agricultural development projects \
                    focused on improving farming and food security.",
        }
    }

    pub fn education() -> Self {
        Self {
            name: "education",
            keywords: &["education", "school"],
            needle: "educated",
            pillar: "Educated Populace",
            blurb: "educational projects aimed at improving learning infrastructure and outcomes.",
        }
    }

    pub fn health() -> Self {
        Self {
            name: "health",
            keywords: &["health", "medical"],
            needle: "healthy",
            pillar: "Healthy Citizens",
            blurb: "healthcare projects focused on improving medical services and health outcomes.",
        }
    }

    fn tagged(&self, pillar: &str) -> bool {
        pillar.to_lowercase().contains(self.needle)
    }
}

impl QueryRule for PillarRule {
    fn matches(&self, question: &str) -> bool {
        mentions_any(question, self.keywords)
    }

    fn answer(&self, _question: &str, records: &[ProjectRecord]) -> QueryResult {
        let count = count_where(records, |record| {
            record.pillars.iter().any(|pillar| self.tagged(pillar))
        });
        let pillars: BTreeSet<String> = PILLARS
            .iter()
            .map(|pillar| pillar.to_string())
            .chain(records.iter().flat_map(|record| record.pillars.iter().cloned()))
            .filter(|pillar| self.tagged(pillar))
            .collect();
        QueryResult::new(
            Intent::Pillar(self.pillar.to_string()),
            format!("Found {count} {}", self.blurb),
        )
        .with_directive(FilterSpec::new().with_pillars(pillars))
    }

    fn name(&self) -> &str {
        self.name
    }
}

pub struct TotalsRule;

impl QueryRule for TotalsRule {
    fn matches(&self, question: &str) -> bool {
        mentions_any(question, &["total", "how many"])
    }

    fn answer(&self, _question: &str, records: &[ProjectRecord]) -> QueryResult {
        let summary = format!(
            "Here are the project statistics:\n\
             • Total Projects: {}\n\
             • Completed: {}\n\
             • Ongoing: {}\n\
             • Abandoned: {}",
            records.len(),
            count_where(records, ProjectRecord::is_completed),
            count_where(records, ProjectRecord::is_ongoing),
            count_where(records, ProjectRecord::is_abandoned),
        );
        QueryResult::new(Intent::Totals, summary)
    }

    fn name(&self) -> &str {
        "totals"
    }
}

pub struct FinanceRule;

impl QueryRule for FinanceRule {
    fn matches(&self, question: &str) -> bool {
        mentions_any(question, &["budget", "cost", "amount"])
    }

    fn answer(&self, _question: &str, records: &[ProjectRecord]) -> QueryResult {
        let budget = stats::sum_amounts(records.iter().map(ProjectRecord::budget));
        let disbursed = stats::sum_amounts(records.iter().map(ProjectRecord::disbursed));
        let summary = format!(
            "Financial Overview:\n\
             • Total Budget: {}\n\
             • Amount Disbursed: {}\n\
             • Disbursement Rate: {}%",
            format_naira(budget),
            format_naira(disbursed),
            stats::amount_percent(disbursed, budget),
        );
        QueryResult::new(Intent::Finance, summary)
    }

    fn name(&self) -> &str {
        "finance"
    }
}

pub const HELP_TEXT: &str = "I can help you with:\n\
    • Project status (ongoing, completed, abandoned)\n\
    • State-specific projects (Adamawa, Bauchi, Borno, etc.)\n\
    • Pillar-based projects (agriculture, education, health)\n\
    • Project statistics and budgets\n\
    • Generate reports and analysis\n\n\
    Try asking: \"Show me ongoing projects\" or \"Projects in Borno State\"";

/// Matches everything; keep it last.
pub struct HelpRule;

impl QueryRule for HelpRule {
    fn matches(&self, _question: &str) -> bool {
        true
    }

    fn answer(&self, _question: &str, _records: &[ProjectRecord]) -> QueryResult {
        QueryResult::new(Intent::Help, HELP_TEXT)
    }

    fn name(&self) -> &str {
        "help"
    }
}
