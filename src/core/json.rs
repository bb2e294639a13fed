use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    core::db::ProjectRepository,
    error::FetchError,
    models::{ProjectRecord, RawProject},
};

/// A JSON export of the `projects` collection: one array of row objects.
#[derive(Debug, Clone)]
pub struct JsonProjectSource {
    path: PathBuf,
}

impl JsonProjectSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Decode a snapshot body. Rows that are not objects are skipped; the result is ordered by `sn`.
pub fn parse_projects(body: &str) -> Result<Vec<ProjectRecord>, FetchError> {
    let rows: Vec<serde_json::Value> = serde_json::from_str(body)?;
    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match RawProject::deserialize(row) {
            Ok(raw) => records.push(raw.normalize()),
            Err(e) => tracing::warn!(index, error = %e, "skipping malformed project row"),
        }
    }
    records.sort_by_key(|record| (record.sn.is_none(), record.sn));
    Ok(records)
}

impl ProjectRepository for JsonProjectSource {
    async fn fetch_projects(&self) -> Result<Vec<ProjectRecord>, FetchError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })?;
        let records = parse_projects(&body)?;
        tracing::debug!(path = ?self.path, count = records.len(), "loaded project snapshot");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_ordered_by_sn_with_gaps_last() {
        let records = parse_projects(
            r#"[
                {"id": "c", "sn": null},
                {"id": "b", "sn": 2},
                7,
                {"id": "a", "sn": 1}
            ]"#,
        )
        .unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn rows_carrying_both_column_spellings_are_kept() {
        let records = parse_projects(
            r#"[
                {"id": "a", "sn": 1, "status": "Ongoing", "project_status_q1": "Ongoing"},
                {"id": "b", "sn": 2, "remarks": "x", "remarks_q1": "y"}
            ]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status.as_deref(), Some("Ongoing"));
        assert_eq!(records[1].remarks.as_deref(), Some("x"));
    }

    #[test]
    fn non_array_body_is_a_decode_error() {
        let err = parse_projects(r#"{"id": "a"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
