mod model;
mod project;
mod state;

use std::{path::Path, sync::Arc};

use sqlx::Connection;
use state::DbState;
use uuid::Uuid;

use crate::{error::FetchError, models::ProjectRecord};

pub use project::{ProjectRepository, ProjectStore};

/// SQLite-backed project register.
#[derive(Debug, Clone)]
pub struct ProjectDb {
    state: Arc<DbState>,
}

impl ProjectDb {
    pub async fn new<P: AsRef<Path>>(db_file: P) -> anyhow::Result<Self> {
        Ok(Self {
            state: Arc::new(DbState::open(db_file).await?),
        })
    }

    /// Open a store written earlier, failing instead of creating an empty one.
    pub async fn open_existing<P: AsRef<Path>>(db_file: P) -> anyhow::Result<Self> {
        Ok(Self {
            state: Arc::new(DbState::open_existing(db_file).await?),
        })
    }

    /// Flush the WAL and release the database file.
    pub async fn close(&self) -> anyhow::Result<()> {
        self.state.close().await
    }
}

const INSERT_PROJECT: &str = r#"INSERT INTO projects (
        id, sn, pillars, sector, state, lga, community, status, description, remarks,
        contractor, contract_amount, amount_disbursed, date_of_award, date_of_completion
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
    ON CONFLICT (id) DO UPDATE SET
        sn = EXCLUDED.sn,
        pillars = EXCLUDED.pillars,
        sector = EXCLUDED.sector,
        state = EXCLUDED.state,
        lga = EXCLUDED.lga,
        community = EXCLUDED.community,
        status = EXCLUDED.status,
        description = EXCLUDED.description,
        remarks = EXCLUDED.remarks,
        contractor = EXCLUDED.contractor,
        contract_amount = EXCLUDED.contract_amount,
        amount_disbursed = EXCLUDED.amount_disbursed,
        date_of_award = EXCLUDED.date_of_award,
        date_of_completion = EXCLUDED.date_of_completion"#;

fn with_id(project: &ProjectRecord) -> ProjectRecord {
    let mut project = project.clone();
    if project.id.is_empty() {
        project.id = Uuid::new_v4().to_string();
    }
    project
}

async fn insert_project<'e, E>(executor: E, project: &ProjectRecord) -> anyhow::Result<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(INSERT_PROJECT)
        .bind(&project.id)
        .bind(project.sn)
        .bind(model::encode_pillars(&project.pillars)?)
        .bind(&project.sector)
        .bind(&project.state)
        .bind(&project.lga)
        .bind(&project.community)
        .bind(&project.status)
        .bind(&project.description)
        .bind(&project.remarks)
        .bind(&project.contractor)
        .bind(project.contract_amount.map(|amount| amount.to_string()))
        .bind(project.amount_disbursed.map(|amount| amount.to_string()))
        .bind(project.award_date.map(|date| date.to_string()))
        .bind(project.completion_date.map(|date| date.to_string()))
        .execute(executor)
        .await?;
    Ok(())
}

impl ProjectRepository for ProjectDb {
    async fn fetch_projects(&self) -> Result<Vec<ProjectRecord>, FetchError> {
        let mut conn = self.state.conn().await?;
        let query = format!(
            "SELECT {} FROM projects \
             ORDER BY projects.sn IS NULL, projects.sn ASC, projects.rowid ASC",
            model::PROJECT_COLUMNS
        );
        let mut records: Vec<ProjectRecord> = sqlx::query_as::<_, model::ProjectRow>(&query)
            .fetch_all(&mut **conn)
            .await?
            .into_iter()
            .map(ProjectRecord::from)
            .collect();
        // Text or real sn values written by other tools sort apart from integers in SQLite.
        records.sort_by_key(|record| (record.sn.is_none(), record.sn));
        tracing::debug!(count = records.len(), "fetched projects from store");
        Ok(records)
    }
}

impl ProjectStore for ProjectDb {
    async fn add_project(&self, project: &ProjectRecord) -> anyhow::Result<ProjectRecord> {
        let project = with_id(project);
        let mut conn = self.state.conn().await?;
        insert_project(&mut **conn, &project).await?;
        Ok(project)
    }

    async fn import_projects(&self, projects: &[ProjectRecord]) -> anyhow::Result<u64> {
        let mut conn = self.state.conn().await?;
        let mut tx = conn.begin().await?;
        for project in projects {
            insert_project(&mut *tx, &with_id(project)).await?;
        }
        tx.commit().await?;
        tracing::info!(count = projects.len(), "imported projects");
        Ok(projects.len() as u64)
    }

    async fn count_projects(&self) -> anyhow::Result<u64> {
        let mut conn = self.state.conn().await?;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&mut **conn)
            .await?;
        Ok(count as u64)
    }
}
