mod store;

pub use store::{RegionHistoryStore, DEFAULT_HISTORY_LIMIT};
