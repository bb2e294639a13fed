use std::{io::Write, str::FromStr};

use devtrack::{ProjectRecord, core::ProjectDb};
use rust_decimal::Decimal;
use tempfile::NamedTempFile;

/// A JSON export in the loosely typed shape the hosted collection produces:
/// scalar and encoded pillar columns, aliased status/amount keys, text amounts,
/// timestamps, and one row that is not an object at all.
pub const SAMPLE_SNAPSHOT: &str = r#"[
    {
        "id": "b7",
        "sn": 2,
        "nesdmp_pillars": "[\"Leadership in Agriculture\", \"Healthy Citizens\"]",
        "state": "Borno",
        "lga": "Biu",
        "community": "Mandaragirau",
        "project_status": "Completed (Handed over)",
        "project_description": "Solar-powered irrigation scheme",
        "contractor": "Sahel Agro Works",
        "contract_amount": "12,500,000",
        "total_amount_disbursed": 12500000,
        "date_of_award": "2022-02-14",
        "date_of_completion": "2023-06-30T00:00:00+00:00"
    },
    {
        "id": "a1",
        "sn": 1,
        "pillars": "Healthy Citizens",
        "state": "Borno",
        "lga": "Maiduguri",
        "status": "Ongoing",
        "description": "Primary healthcare centre renovation",
        "contract_amount": 40000000.50,
        "amount_disbursed": "10000000"
    },
    "not a project",
    {
        "id": "y3",
        "sn": 3,
        "pillars": ["Educated Populace"],
        "state": "Yobe",
        "lga": "Potiskum",
        "status": "Abandoned",
        "description": "Classroom block",
        "contract_amount": "8000000",
        "amount_disbursed": null
    },
    {
        "id": "g4",
        "pillars": [],
        "state": "Gombe",
        "lga": "Akko",
        "status": "Yet to commence",
        "description": "Feeder road",
        "contract_amount": "n/a"
    }
]"#;

/// Creates a ProjectDb in a temporary directory.
/// Returns both the store and the directory (which must be kept alive).
pub async fn create_test_db() -> (ProjectDb, tempfile::TempDir) {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("projects.db");
    let db = ProjectDb::new(&path)
        .await
        .expect("Failed to create test store");
    (db, dir)
}

/// Writes `body` to a temporary `.json` file that is removed on drop.
pub fn write_snapshot(body: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("Failed to create temp snapshot file");
    file.write_all(body.as_bytes())
        .expect("Failed to write snapshot");
    file
}

pub fn amount(text: &str) -> Decimal {
    Decimal::from_str(text).expect("valid amount")
}

/// Creates a ProjectRecord with the fields most tests care about.
pub fn make_project(
    sn: Option<i64>,
    pillars: &[&str],
    state: &str,
    lga: &str,
    status: &str,
    contract_amount: &str,
) -> ProjectRecord {
    ProjectRecord {
        sn,
        pillars: pillars.iter().map(|p| p.to_string()).collect(),
        state: Some(state.to_string()),
        lga: Some(lga.to_string()),
        status: Some(status.to_string()),
        contract_amount: Some(amount(contract_amount)),
        ..Default::default()
    }
}

/// A small register spanning several states, statuses and multi-pillar rows.
pub fn sample_projects() -> Vec<ProjectRecord> {
    vec![
        make_project(Some(1), &["Healthy Citizens"], "Borno", "Maiduguri", "Ongoing", "4000000"),
        make_project(
            Some(2),
            &["Leadership in Agriculture", "Healthy Citizens"],
            "Borno",
            "Biu",
            "Completed (Handed over)",
            "1250000.75",
        ),
        make_project(Some(3), &["Educated Populace"], "Yobe", "Potiskum", "Abandoned", "800000"),
        make_project(
            Some(4),
            &["Leadership in Agriculture"],
            "Adamawa",
            "Mubi North",
            "Completed (Not handed over)",
            "300000",
        ),
        make_project(Some(5), &["Connected Region"], "Gombe", "Akko", "Ongoing", "950000.25"),
        make_project(None, &[], "Taraba", "Jalingo", "Yet to commence", "0"),
    ]
}
