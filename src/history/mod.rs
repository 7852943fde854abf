pub mod filter;
pub mod storage;
pub mod types;
pub mod verify;

pub use filter::{filter_by_range, sort_entries, SortKey, TimeRange};
pub use storage::{load_history, save_history};
pub use types::{BrandSummary, HistoryEntry, HistoryStore};
pub use verify::{verify_entry, Verification, SCORE_TOLERANCE};
