pub mod db;
pub mod json;
pub mod store;

pub use db::{ProjectDb, ProjectRepository, ProjectStore};
pub use json::JsonProjectSource;
pub use store::{Dashboard, LoadState, Snapshot, load};
