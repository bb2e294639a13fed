//! In-memory engines over a loaded record list. None of these perform I/O.

pub mod export;
pub mod filter;
pub mod stats;
pub mod view;

pub use export::ExportSummary;
pub use filter::{FilterField, FilterSpec};
pub use stats::{Stats, summarize};
pub use view::{SortDir, SortKey, SortState, ViewPage, ViewRequest, view};
