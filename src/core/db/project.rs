use std::future::Future;

use crate::{error::FetchError, models::ProjectRecord};

/// Read side of the register. One call yields one view's snapshot.
pub trait ProjectRepository {
    /// Every project, ordered by `sn` ascending with unnumbered rows last.
    fn fetch_projects(&self) -> impl Future<Output = Result<Vec<ProjectRecord>, FetchError>>;
}

/// Seeding side of a local register.
pub trait ProjectStore: ProjectRepository {
    /// Insert one project. An empty `id` is replaced by a fresh UUID.
    fn add_project(
        &self,
        project: &ProjectRecord,
    ) -> impl Future<Output = anyhow::Result<ProjectRecord>>;
    /// Insert or replace many projects in one transaction, returning how many were written.
    fn import_projects(
        &self,
        projects: &[ProjectRecord],
    ) -> impl Future<Output = anyhow::Result<u64>>;
    fn count_projects(&self) -> impl Future<Output = anyhow::Result<u64>>;
}
