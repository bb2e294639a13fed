pub mod assistant;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod regions;
pub mod table;

pub use assistant::{Intent, QueryResult, QueryRouter, QueryRule};
pub use crate::core::{Dashboard, LoadState, ProjectRepository, Snapshot};
pub use error::FetchError;
pub use models::{ProjectRecord, ProjectStatus};
pub use table::{ExportSummary, FilterSpec, Stats, ViewPage, ViewRequest};
