use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

/// Marker shared by both completed sub-states.
pub const COMPLETED_MARKER: &str = "Completed";

/// Status classes of the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectStatus {
    CompletedHandedOver,
    CompletedNotHandedOver,
    Ongoing,
    Abandoned,
    YetToCommence,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::CompletedHandedOver,
        ProjectStatus::CompletedNotHandedOver,
        ProjectStatus::Ongoing,
        ProjectStatus::Abandoned,
        ProjectStatus::YetToCommence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::CompletedHandedOver => "Completed (Handed over)",
            ProjectStatus::CompletedNotHandedOver => "Completed (Not handed over)",
            ProjectStatus::Ongoing => "Ongoing",
            ProjectStatus::Abandoned => "Abandoned",
            ProjectStatus::YetToCommence => "Yet to commence",
        }
    }

    /// Exact match against the closed status list.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }

    pub fn is_completed(&self) -> bool {
        matches!(
            self,
            ProjectStatus::CompletedHandedOver | ProjectStatus::CompletedNotHandedOver
        )
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Containment check used wherever "is this project completed" is asked.
pub fn is_completed_status(status: &str) -> bool {
    status.contains(COMPLETED_MARKER)
}

/// One row of the project register, normalized at ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectRecord {
    pub id: String,
    pub sn: Option<i64>,
    pub pillars: Vec<String>,
    pub sector: Option<String>,
    pub state: Option<String>,
    pub lga: Option<String>,
    pub community: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub remarks: Option<String>,
    pub contractor: Option<String>,
    pub contract_amount: Option<Decimal>,
    pub amount_disbursed: Option<Decimal>,
    pub award_date: Option<Date>,
    pub completion_date: Option<Date>,
    /// The id was derived from `sn` because the source row had none.
    #[serde(skip)]
    pub id_synthesized: bool,
}

impl ProjectRecord {
    pub fn status_kind(&self) -> Option<ProjectStatus> {
        self.status.as_deref().and_then(ProjectStatus::parse)
    }

    pub fn is_completed(&self) -> bool {
        self.status.as_deref().is_some_and(is_completed_status)
    }

    pub fn is_ongoing(&self) -> bool {
        self.status.as_deref() == Some(ProjectStatus::Ongoing.as_str())
    }

    pub fn is_abandoned(&self) -> bool {
        self.status.as_deref() == Some(ProjectStatus::Abandoned.as_str())
    }

    pub fn is_yet_to_commence(&self) -> bool {
        self.status.as_deref() == Some(ProjectStatus::YetToCommence.as_str())
    }

    /// Contract amount with a missing value counted as zero.
    pub fn budget(&self) -> Decimal {
        self.contract_amount.unwrap_or(Decimal::ZERO)
    }

    /// Disbursed amount with a missing value counted as zero.
    pub fn disbursed(&self) -> Decimal {
        self.amount_disbursed.unwrap_or(Decimal::ZERO)
    }

    /// String renderings of every populated source field, in column order.
    pub fn rendered_fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(15);
        if !self.id_synthesized {
            fields.push(self.id.clone());
        }
        if let Some(sn) = self.sn {
            fields.push(sn.to_string());
        }
        if !self.pillars.is_empty() {
            fields.push(self.pillars.join(","));
        }
        let texts = [
            &self.sector,
            &self.state,
            &self.lga,
            &self.community,
            &self.status,
            &self.description,
            &self.remarks,
            &self.contractor,
        ];
        fields.extend(texts.into_iter().flatten().cloned());
        fields.extend(
            [self.contract_amount, self.amount_disbursed]
                .into_iter()
                .flatten()
                .map(|amount| amount.to_string()),
        );
        fields.extend(
            [self.award_date, self.completion_date]
                .into_iter()
                .flatten()
                .map(|date| date.to_string()),
        );
        fields
    }

    /// Case-insensitive substring match over every field; `needle` must already be lower-cased.
    pub fn contains_text(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.rendered_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// A loosely typed column value as it arrives from an external store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Loose {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    List(Vec<Loose>),
    Other(serde_json::Value),
}

impl Loose {
    pub fn into_text(self) -> Option<String> {
        match self {
            Loose::Text(text) => Some(text),
            Loose::Number(number) => Some(number.to_string()),
            Loose::Flag(flag) => Some(flag.to_string()),
            Loose::List(items) => {
                let parts: Vec<String> = items.into_iter().filter_map(Loose::into_text).collect();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            Loose::Other(_) => None,
        }
    }

    /// Like `into_text`, with blank text counted as missing.
    pub fn into_filled_text(self) -> Option<String> {
        self.into_text().filter(|text| !text.trim().is_empty())
    }

    /// Coerce a scalar or a list (including a JSON list encoded in a string) to a list.
    pub fn into_list(self) -> Vec<String> {
        let values = match self {
            Loose::Text(text) => {
                if text.trim_start().starts_with('[') {
                    match serde_json::from_str::<Vec<Loose>>(&text) {
                        Ok(items) => items.into_iter().filter_map(Loose::into_text).collect(),
                        Err(_) => vec![text],
                    }
                } else {
                    vec![text]
                }
            }
            Loose::List(items) => items.into_iter().filter_map(Loose::into_text).collect(),
            other => other.into_text().into_iter().collect(),
        };
        values
            .into_iter()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .collect()
    }

    pub fn into_decimal(self) -> Option<Decimal> {
        let text = match self {
            Loose::Number(number) => number.to_string(),
            Loose::Text(text) => text
                .chars()
                .filter(|c| !matches!(c, ',' | '₦') && !c.is_whitespace())
                .collect(),
            _ => return None,
        };
        if text.is_empty() {
            return None;
        }
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .ok()
    }

    pub fn into_i64(self) -> Option<i64> {
        match self {
            Loose::Number(number) => number.as_i64().or_else(|| {
                number
                    .as_f64()
                    .filter(|value| value.fract() == 0.0)
                    .map(|value| value as i64)
            }),
            Loose::Text(text) => {
                let text = text.trim();
                text.parse().ok().or_else(|| {
                    text.parse::<f64>()
                        .ok()
                        .filter(|value| value.fract() == 0.0)
                        .map(|value| value as i64)
                })
            }
            _ => None,
        }
    }

    /// Accepts `YYYY-MM-DD` or any timestamp starting with one.
    pub fn into_date(self) -> Option<Date> {
        let Loose::Text(text) = self else {
            return None;
        };
        let head = text.trim().get(..10)?;
        Date::parse(head, format_description!("[year]-[month]-[day]")).ok()
    }
}

/// A project row before normalization. Every column is optional and loosely typed.
///
/// Alternate column names are separate fields so a row carrying both spellings
/// still deserializes. The canonical name wins when it normalizes to a value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProject {
    #[serde(default)]
    pub id: Option<Loose>,
    #[serde(default)]
    pub sn: Option<Loose>,
    #[serde(default)]
    pub pillars: Option<Loose>,
    #[serde(default)]
    pub nesdmp_pillars: Option<Loose>,
    #[serde(default)]
    pub sector: Option<Loose>,
    #[serde(default)]
    pub state: Option<Loose>,
    #[serde(default)]
    pub lga: Option<Loose>,
    #[serde(default)]
    pub community: Option<Loose>,
    #[serde(default)]
    pub status: Option<Loose>,
    #[serde(default)]
    pub project_status: Option<Loose>,
    #[serde(default)]
    pub project_status_q1: Option<Loose>,
    #[serde(default)]
    pub description: Option<Loose>,
    #[serde(default)]
    pub project_description: Option<Loose>,
    #[serde(default)]
    pub remarks: Option<Loose>,
    #[serde(default)]
    pub remarks_q1: Option<Loose>,
    #[serde(default)]
    pub contractor: Option<Loose>,
    #[serde(default)]
    pub contract_amount: Option<Loose>,
    #[serde(default)]
    pub amount_disbursed: Option<Loose>,
    #[serde(default)]
    pub total_amount_disbursed: Option<Loose>,
    #[serde(default)]
    pub award_date: Option<Loose>,
    #[serde(default)]
    pub date_of_award: Option<Loose>,
    #[serde(default)]
    pub completion_date: Option<Loose>,
    #[serde(default)]
    pub date_of_completion: Option<Loose>,
}

/// First column, in order, that normalizes to a value.
fn first_of<T>(
    columns: impl IntoIterator<Item = Option<Loose>>,
    f: fn(Loose) -> Option<T>,
) -> Option<T> {
    columns.into_iter().flatten().find_map(f)
}

fn text(column: Option<Loose>) -> Option<String> {
    column.and_then(Loose::into_text)
}

impl RawProject {
    /// Canonicalize once so the engines never see scalar-or-list ambiguity.
    pub fn normalize(self) -> ProjectRecord {
        let sn = self.sn.and_then(Loose::into_i64);
        let id = text(self.id);
        let id_synthesized = id.is_none() && sn.is_some();
        let id = id
            .or_else(|| sn.map(|sn| format!("sn-{sn}")))
            .unwrap_or_default();
        let pillars = [self.pillars, self.nesdmp_pillars]
            .into_iter()
            .flatten()
            .map(Loose::into_list)
            .find(|list| !list.is_empty())
            .unwrap_or_default();
        ProjectRecord {
            id,
            sn,
            pillars,
            sector: text(self.sector),
            state: text(self.state),
            lga: text(self.lga),
            community: text(self.community),
            status: first_of(
                [self.status, self.project_status, self.project_status_q1],
                Loose::into_filled_text,
            ),
            description: first_of(
                [self.description, self.project_description],
                Loose::into_filled_text,
            ),
            remarks: first_of([self.remarks, self.remarks_q1], Loose::into_filled_text),
            contractor: text(self.contractor),
            contract_amount: self.contract_amount.and_then(Loose::into_decimal),
            amount_disbursed: first_of(
                [self.amount_disbursed, self.total_amount_disbursed],
                Loose::into_decimal,
            ),
            award_date: first_of([self.award_date, self.date_of_award], Loose::into_date),
            completion_date: first_of(
                [self.completion_date, self.date_of_completion],
                Loose::into_date,
            ),
            id_synthesized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    fn raw(value: serde_json::Value) -> ProjectRecord {
        serde_json::from_value::<RawProject>(value)
            .expect("raw project")
            .normalize()
    }

    #[test]
    fn scalar_pillar_becomes_single_element_list() {
        let record = raw(serde_json::json!({ "id": "a", "pillars": "Healthy Citizens" }));
        assert_eq!(record.pillars, vec!["Healthy Citizens".to_string()]);
    }

    #[test]
    fn encoded_pillar_list_is_decoded() {
        let record = raw(serde_json::json!({
            "id": "a",
            "nesdmp_pillars": "[\"Peaceful Society\", \"\", \"Connected Region\"]"
        }));
        assert_eq!(record.pillars, vec!["Peaceful Society", "Connected Region"]);
    }

    #[test]
    fn amounts_are_exact_and_tolerate_text() {
        let record = raw(serde_json::json!({
            "id": "a",
            "contract_amount": "1,250,000.10",
            "total_amount_disbursed": 0.1
        }));
        assert_eq!(record.contract_amount, Some(dec("1250000.10")));
        assert_eq!(record.amount_disbursed, Some(dec("0.1")));
    }

    #[test]
    fn malformed_columns_become_null() {
        let record = raw(serde_json::json!({
            "sn": "7",
            "pillars": { "nested": true },
            "contract_amount": "n/a",
            "date_of_award": "sometime",
            "date_of_completion": "2024-03-09T10:00:00Z"
        }));
        assert_eq!(record.id, "sn-7");
        assert_eq!(record.sn, Some(7));
        assert!(record.pillars.is_empty());
        assert_eq!(record.contract_amount, None);
        assert_eq!(record.award_date, None);
        assert_eq!(
            record.completion_date.map(|d| d.to_string()),
            Some("2024-03-09".to_string())
        );
    }

    #[test]
    fn completed_check_uses_containment() {
        let record = ProjectRecord {
            status: Some("Completed (Not handed over)".into()),
            ..Default::default()
        };
        assert!(record.is_completed());
        assert!(!record.is_ongoing());
        assert_eq!(record.status_kind(), Some(ProjectStatus::CompletedNotHandedOver));
        assert!(!ProjectStatus::Ongoing.is_completed());
    }

    #[test]
    fn search_covers_every_field() {
        let record = ProjectRecord {
            id: "x1".into(),
            sn: Some(42),
            pillars: vec!["Flourishing Trade".into()],
            contractor: Some("Sahel Builders".into()),
            contract_amount: Some(dec("5000")),
            ..Default::default()
        };
        assert!(record.contains_text("sahel"));
        assert!(record.contains_text("trade"));
        assert!(record.contains_text("42"));
        assert!(record.contains_text("5000"));
        assert!(!record.contains_text("borno"));
        assert!(record.contains_text(""));
    }

    #[test]
    fn rows_with_both_column_spellings_are_kept() {
        let body = r#"[
            {"id": "a", "sn": 1, "status": "Ongoing", "project_status_q1": "Abandoned"},
            {"id": "b", "sn": 2, "remarks": "x", "remarks_q1": "y"},
            {"id": "c", "sn": 3, "status": "", "project_status": "Abandoned"}
        ]"#;
        let rows: Vec<RawProject> = serde_json::from_str(body).expect("rows deserialize");
        let records: Vec<ProjectRecord> = rows.into_iter().map(RawProject::normalize).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].status.as_deref(), Some("Ongoing"));
        assert_eq!(records[1].remarks.as_deref(), Some("x"));
        assert_eq!(records[2].status.as_deref(), Some("Abandoned"));
    }

    #[test]
    fn derived_id_is_not_searchable() {
        let record = raw(serde_json::json!({ "sn": 7, "state": "Yobe" }));
        assert_eq!(record.id, "sn-7");
        assert!(record.id_synthesized);
        assert!(!record.contains_text("sn-"));
        assert!(record.contains_text("7"));

        let given = raw(serde_json::json!({ "id": "sn-7", "sn": 7 }));
        assert!(!given.id_synthesized);
        assert!(given.contains_text("sn-"));
    }
}
