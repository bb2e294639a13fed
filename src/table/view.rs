//! Search, sort and pagination over a record list.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::models::ProjectRecord;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Sortable columns. Pillars are multi-valued and only searchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Sn,
    State,
    Lga,
    Community,
    Sector,
    Status,
    Description,
    Contractor,
    ContractAmount,
    AmountDisbursed,
    AwardDate,
    CompletionDate,
}

impl SortKey {
    pub const ALL: [SortKey; 12] = [
        SortKey::Sn,
        SortKey::State,
        SortKey::Lga,
        SortKey::Community,
        SortKey::Sector,
        SortKey::Status,
        SortKey::Description,
        SortKey::Contractor,
        SortKey::ContractAmount,
        SortKey::AmountDisbursed,
        SortKey::AwardDate,
        SortKey::CompletionDate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SortKey::Sn => "sn",
            SortKey::State => "state",
            SortKey::Lga => "lga",
            SortKey::Community => "community",
            SortKey::Sector => "sector",
            SortKey::Status => "status",
            SortKey::Description => "description",
            SortKey::Contractor => "contractor",
            SortKey::ContractAmount => "contract_amount",
            SortKey::AmountDisbursed => "amount_disbursed",
            SortKey::AwardDate => "award_date",
            SortKey::CompletionDate => "completion_date",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    fn value<'a>(&self, record: &'a ProjectRecord) -> Option<SortValue<'a>> {
        let text = |value: &'a Option<String>| value.as_deref().map(SortValue::Text);
        match self {
            SortKey::Sn => record.sn.map(|sn| SortValue::Number(Decimal::from(sn))),
            SortKey::State => text(&record.state),
            SortKey::Lga => text(&record.lga),
            SortKey::Community => text(&record.community),
            SortKey::Sector => text(&record.sector),
            SortKey::Status => text(&record.status),
            SortKey::Description => text(&record.description),
            SortKey::Contractor => text(&record.contractor),
            SortKey::ContractAmount => record.contract_amount.map(SortValue::Number),
            SortKey::AmountDisbursed => record.amount_disbursed.map(SortValue::Number),
            SortKey::AwardDate => record.award_date.map(SortValue::Date),
            SortKey::CompletionDate => record.completion_date.map(SortValue::Date),
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn flipped(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub dir: SortDir,
}

impl SortState {
    pub fn new(key: SortKey, dir: SortDir) -> Self {
        Self { key, dir }
    }

    /// Same column flips direction; a new column starts ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.dir = self.dir.flipped();
        } else {
            self.key = key;
            self.dir = SortDir::Asc;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SortValue<'a> {
    Text(&'a str),
    Number(Decimal),
    Date(Date),
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

impl SortValue<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => compare_text(a, b),
            (SortValue::Number(a), SortValue::Number(b)) => a.cmp(b),
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Stable sort; records without a value for the key go last in either direction.
pub fn sort_records(records: &mut [ProjectRecord], sort: SortState) {
    records.sort_by(|a, b| match (sort.key.value(a), sort.key.value(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match sort.dir {
            SortDir::Asc => a.compare(&b),
            SortDir::Desc => b.compare(&a),
        },
    });
}

/// Records containing `query` (case-insensitive) in any field. An empty query keeps everything.
pub fn search(records: &[ProjectRecord], query: &str) -> Vec<ProjectRecord> {
    let needle = query.trim().to_lowercase();
    records
        .iter()
        .filter(|record| record.contains_text(&needle))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRequest {
    pub query: String,
    pub sort: SortState,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            sort: SortState::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewPage {
    pub items: Vec<ProjectRecord>,
    pub total_matching: usize,
    pub total_pages: usize,
    /// The page actually served after clamping.
    pub page: usize,
    pub page_size: usize,
}

impl ViewPage {
    /// `Showing X of Y projects`.
    pub fn showing(&self) -> String {
        format!(
            "Showing {} of {} projects",
            self.items.len(),
            self.total_matching
        )
    }
}

/// Search, then sort, then cut out one page. Out-of-range pages clamp to the nearest valid page.
pub fn view(records: &[ProjectRecord], request: &ViewRequest) -> ViewPage {
    let page_size = request.page_size.max(1);
    let mut matching = search(records, &request.query);
    sort_records(&mut matching, request.sort);

    let total_matching = matching.len();
    let total_pages = total_matching.div_ceil(page_size);
    let page = request.page.clamp(1, total_pages.max(1));
    let items = matching
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    ViewPage {
        items,
        total_matching,
        total_pages,
        page,
        page_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn numbered(count: i64) -> Vec<ProjectRecord> {
        (1..=count)
            .map(|sn| ProjectRecord {
                id: format!("p{sn}"),
                sn: Some(sn),
                ..Default::default()
            })
            .collect()
    }

    fn with_state(id: &str, state: Option<&str>) -> ProjectRecord {
        ProjectRecord {
            id: id.into(),
            state: state.map(str::to_string),
            ..Default::default()
        }
    }

    fn ids(records: &[ProjectRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn pages_follow_ceiling_division() {
        let records = numbered(45);
        let request = ViewRequest {
            page: 3,
            ..Default::default()
        };
        let page = view(&records, &request);
        assert_eq!(page.total_matching, 45);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0].id, "p41");
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let records = numbered(45);
        let beyond = view(
            &records,
            &ViewRequest {
                page: 9,
                ..Default::default()
            },
        );
        assert_eq!(beyond.page, 3);
        assert_eq!(beyond.items.len(), 5);

        let zero = view(
            &records,
            &ViewRequest {
                page: 0,
                page_size: 0,
                ..Default::default()
            },
        );
        assert_eq!(zero.page, 1);
        assert_eq!(zero.page_size, 1);
        assert_eq!(zero.total_pages, 45);
    }

    #[test]
    fn empty_result_has_no_pages() {
        let page = view(
            &numbered(3),
            &ViewRequest {
                query: "nothing matches this".into(),
                page: 4,
                ..Default::default()
            },
        );
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let mut records = numbered(3);
        records[1].community = Some("Gwoza Town".into());
        records[2].remarks = Some("awaiting GWOZA council".into());
        let found = search(&records, "  gWoZa ");
        assert_eq!(ids(&found), vec!["p2", "p3"]);
        assert_eq!(search(&records, "").len(), 3);
    }

    #[test]
    fn sort_is_stable_among_ties() {
        let mut records = vec![
            with_state("a", Some("Yobe")),
            with_state("b", Some("Borno")),
            with_state("c", Some("Yobe")),
            with_state("d", Some("Borno")),
        ];
        sort_records(&mut records, SortState::new(SortKey::State, SortDir::Asc));
        assert_eq!(ids(&records), vec!["b", "d", "a", "c"]);

        sort_records(&mut records, SortState::new(SortKey::State, SortDir::Desc));
        assert_eq!(ids(&records), vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn missing_values_sort_last_in_both_directions() {
        let records = vec![
            with_state("none1", None),
            with_state("gombe", Some("Gombe")),
            with_state("none2", None),
            with_state("adamawa", Some("adamawa")),
        ];
        for dir in [SortDir::Asc, SortDir::Desc] {
            let mut sorted = records.clone();
            sort_records(&mut sorted, SortState::new(SortKey::State, dir));
            assert_eq!(&ids(&sorted)[2..], &["none1", "none2"], "{dir:?}");
        }
        let mut ascending = records.clone();
        sort_records(&mut ascending, SortState::new(SortKey::State, SortDir::Asc));
        assert_eq!(ids(&ascending)[0], "adamawa", "case does not dominate ordering");
    }

    #[test]
    fn amounts_sort_numerically() {
        let mut records = numbered(3);
        records[0].contract_amount = Some(Decimal::from_str("900").unwrap());
        records[1].contract_amount = Some(Decimal::from_str("10000").unwrap());
        records[2].contract_amount = Some(Decimal::from_str("25.5").unwrap());
        sort_records(
            &mut records,
            SortState::new(SortKey::ContractAmount, SortDir::Asc),
        );
        assert_eq!(ids(&records), vec!["p3", "p1", "p2"]);
    }

    #[test]
    fn toggling_sort_key() {
        let mut sort = SortState::default();
        assert_eq!(sort, SortState::new(SortKey::Sn, SortDir::Asc));
        sort.toggle(SortKey::Sn);
        assert_eq!(sort.dir, SortDir::Desc);
        sort.toggle(SortKey::State);
        assert_eq!(sort, SortState::new(SortKey::State, SortDir::Asc));
    }

    #[test]
    fn sort_keys_parse_by_name() {
        assert_eq!(SortKey::parse("contract-amount"), Some(SortKey::ContractAmount));
        assert_eq!(SortKey::parse("SN"), Some(SortKey::Sn));
        assert_eq!(SortKey::parse("pillars"), None);
    }
}
