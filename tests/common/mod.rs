#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from devtrack for tests
pub use devtrack::{
    Dashboard, FetchError, FilterSpec, LoadState, ProjectRecord, Snapshot,
    core::{JsonProjectSource, ProjectDb, ProjectRepository, ProjectStore, load},
};
