//! Data reconciliation engine for a personal fitness-tracking dashboard.
//!
//! The engine merges imported weekly records into the stored history without
//! losing or duplicating data, locates the week that corresponds to "today",
//! and computes the ongoing activity streak. Rendering, file pickers and the
//! persistence backend itself stay outside; the engine talks to storage only
//! through the [`store::HistoryStore`] trait.

pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

pub use error::{AppError, AppResult};
pub use models::week::{History, Week, Weekday};
pub use services::history_service::{HistoryService, ImportSummary};
pub use store::{FileHistoryStore, HistoryStore, MemoryHistoryStore};
