//! Keyword assistant.
//!
//! A question is lower-cased and offered to an ordered list of [`QueryRule`]s.
//! The first rule that matches answers it; later rules are never consulted, so
//! a question touching several topics is answered for the highest-priority one.

pub mod rules;

use std::sync::Arc;

use serde::Serialize;

use crate::{models::ProjectRecord, table::filter::FilterSpec};

pub use rules::{
    AbandonedRule, CompletedRule, FinanceRule, HelpRule, OngoingRule, PillarRule, StateRule,
    TotalsRule,
};

/// Which rule answered a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Intent {
    Ongoing,
    Completed,
    Abandoned,
    State(String),
    Pillar(String),
    Totals,
    Finance,
    Help,
}

/// What the assistant says, plus the filter that reproduces the records it counted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub intent: Intent,
    pub summary: String,
    pub directive: Option<FilterSpec>,
}

impl QueryResult {
    pub fn new(intent: Intent, summary: impl Into<String>) -> Self {
        Self {
            intent,
            summary: summary.into(),
            directive: None,
        }
    }

    pub fn with_directive(mut self, directive: FilterSpec) -> Self {
        self.directive = Some(directive);
        self
    }
}

/// One entry of the router's priority list.
pub trait QueryRule: Send + Sync {
    /// `question` is already lower-cased.
    fn matches(&self, question: &str) -> bool;

    /// Answer a question this rule matched.
    fn answer(&self, question: &str, records: &[ProjectRecord]) -> QueryResult;

    /// Short name, used in logs and to inspect the priority order.
    fn name(&self) -> &str;
}

/// Ordered rule list with first-match-wins dispatch.
#[derive(Clone)]
pub struct QueryRouter {
    rules: Vec<Arc<dyn QueryRule>>,
}

impl QueryRouter {
    /// A router with no rules. Unmatched questions get the help text.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Status, then state, then pillar topics, then totals and finance.
    pub fn standard() -> Self {
        Self::new()
            .add_rule_boxed(Box::new(OngoingRule))
            .add_rule_boxed(Box::new(CompletedRule))
            .add_rule_boxed(Box::new(AbandonedRule))
            .add_rule_boxed(Box::new(StateRule))
            .add_rule_boxed(Box::new(PillarRule::agriculture()))
            .add_rule_boxed(Box::new(PillarRule::education()))
            .add_rule_boxed(Box::new(PillarRule::health()))
            .add_rule_boxed(Box::new(TotalsRule))
            .add_rule_boxed(Box::new(FinanceRule))
            .add_rule_boxed(Box::new(HelpRule))
    }

    pub fn add_rule(mut self, rule: Arc<dyn QueryRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn add_rule_boxed(mut self, rule: Box<dyn QueryRule>) -> Self {
        self.rules.push(Arc::from(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn route(&self, question: &str, records: &[ProjectRecord]) -> QueryResult {
        let lowered = question.to_lowercase();
        match self.rules.iter().find(|rule| rule.matches(&lowered)) {
            Some(rule) => {
                tracing::debug!(rule = rule.name(), "assistant rule matched");
                rule.answer(&lowered, records)
            }
            None => HelpRule.answer(&lowered, records),
        }
    }
}

impl Default for QueryRouter {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for QueryRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryRouter")
            .field("rules", &self.rule_names())
            .finish()
    }
}
