//! One view's snapshot of the register and the session state layered over it.

use time::OffsetDateTime;

use crate::{
    assistant::{QueryResult, QueryRouter},
    core::db::ProjectRepository,
    error::FetchError,
    models::ProjectRecord,
    table::{
        ExportSummary, FilterSpec, SortKey, SortState, Stats, ViewPage, ViewRequest, filter, stats,
        view,
    },
};

/// Records as fetched for one view. Never written back.
#[derive(Debug, Clone)]
pub struct Snapshot {
    records: Vec<ProjectRecord>,
    fetched_at: OffsetDateTime,
}

impl Snapshot {
    pub fn new(records: Vec<ProjectRecord>) -> Self {
        Self {
            records,
            fetched_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn fetched_at(&self) -> OffsetDateTime {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Fetch a fresh snapshot. A failed fetch stays an error; it is never an empty snapshot.
pub async fn load<R: ProjectRepository>(repo: &R) -> Result<Snapshot, FetchError> {
    let records = repo.fetch_projects().await?;
    tracing::info!(count = records.len(), "project snapshot ready");
    Ok(Snapshot::new(records))
}

#[derive(Debug)]
pub enum LoadState {
    Loading,
    Ready(Snapshot),
    Failed(FetchError),
}

impl LoadState {
    /// Filter, sort and paging controls only make sense once data is present.
    pub fn is_interactive(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            LoadState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Result<Snapshot, FetchError>> for LoadState {
    fn from(result: Result<Snapshot, FetchError>) -> Self {
        match result {
            Ok(snapshot) => LoadState::Ready(snapshot),
            Err(err) => LoadState::Failed(err),
        }
    }
}

/// A filterable, sortable, pageable session over one snapshot.
#[derive(Debug, Clone)]
pub struct Dashboard {
    snapshot: Snapshot,
    filter: FilterSpec,
    request: ViewRequest,
    router: QueryRouter,
}

impl Dashboard {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            filter: FilterSpec::default(),
            request: ViewRequest::default(),
            router: QueryRouter::standard(),
        }
    }

    pub fn with_router(mut self, router: QueryRouter) -> Self {
        self.router = router;
        self
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn request(&self) -> &ViewRequest {
        &self.request
    }

    /// Replacing the filter returns to the first page.
    pub fn set_filter(&mut self, spec: FilterSpec) {
        self.filter = spec;
        self.request.page = 1;
    }

    /// Edit the filter in place; LGA pruning is up to the [`FilterSpec`] methods used.
    pub fn update_filter(&mut self, edit: impl FnOnce(&mut FilterSpec)) {
        edit(&mut self.filter);
        self.request.page = 1;
    }

    /// Adopt an assistant directive. Returns false when the answer carried none.
    pub fn apply_directive(&mut self, result: &QueryResult) -> bool {
        match &result.directive {
            Some(directive) => {
                self.set_filter(directive.clone());
                true
            }
            None => false,
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.request.query = query.into();
        self.request.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.request.sort = sort;
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        self.request.sort.toggle(key);
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.request.page = page;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.request.page_size = page_size;
        self.request.page = 1;
    }

    /// Records passing the filter, in snapshot order.
    pub fn filtered(&self) -> Vec<ProjectRecord> {
        filter::apply(self.snapshot.records(), &self.filter)
    }

    /// The current table page: filter, then search, sort and paginate.
    pub fn page(&self) -> ViewPage {
        view::view(&self.filtered(), &self.request)
    }

    /// Aggregates over the filtered records.
    pub fn stats(&self) -> Stats {
        stats::summarize(&self.filtered())
    }

    /// The assistant always looks at the whole snapshot.
    pub fn ask(&self, question: &str) -> QueryResult {
        self.router.route(question, self.snapshot.records())
    }

    pub fn export(&self) -> ExportSummary {
        ExportSummary::new(self.filtered().len(), &self.filter)
    }
}
