use crate::models::{Loose, ProjectRecord, RawProject};

/// Column list shared by every read; casts keep decoding tolerant of mixed storage classes.
pub(super) const PROJECT_COLUMNS: &str = r#"
    CAST(id AS TEXT) AS id,
    CAST(sn AS TEXT) AS sn,
    pillars,
    sector,
    state,
    lga,
    community,
    status,
    description,
    remarks,
    contractor,
    CAST(contract_amount AS TEXT) AS contract_amount,
    CAST(amount_disbursed AS TEXT) AS amount_disbursed,
    CAST(date_of_award AS TEXT) AS date_of_award,
    CAST(date_of_completion AS TEXT) AS date_of_completion
"#;

#[derive(Debug, sqlx::FromRow)]
pub(super) struct ProjectRow {
    pub id: Option<String>,
    pub sn: Option<String>,
    pub pillars: Option<String>,
    pub sector: Option<String>,
    pub state: Option<String>,
    pub lga: Option<String>,
    pub community: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub remarks: Option<String>,
    pub contractor: Option<String>,
    pub contract_amount: Option<String>,
    pub amount_disbursed: Option<String>,
    pub date_of_award: Option<String>,
    pub date_of_completion: Option<String>,
}

impl From<ProjectRow> for ProjectRecord {
    fn from(row: ProjectRow) -> Self {
        RawProject {
            id: row.id.map(Loose::Text),
            sn: row.sn.map(Loose::Text),
            pillars: row.pillars.map(Loose::Text),
            sector: row.sector.map(Loose::Text),
            state: row.state.map(Loose::Text),
            lga: row.lga.map(Loose::Text),
            community: row.community.map(Loose::Text),
            status: row.status.map(Loose::Text),
            description: row.description.map(Loose::Text),
            remarks: row.remarks.map(Loose::Text),
            contractor: row.contractor.map(Loose::Text),
            contract_amount: row.contract_amount.map(Loose::Text),
            amount_disbursed: row.amount_disbursed.map(Loose::Text),
            award_date: row.date_of_award.map(Loose::Text),
            completion_date: row.date_of_completion.map(Loose::Text),
            ..Default::default()
        }
        .normalize()
    }
}

/// Storage form of the multi-valued pillar column.
pub(super) fn encode_pillars(pillars: &[String]) -> anyhow::Result<String> {
    Ok(serde_json::to_string(pillars)?)
}
