mod store;

pub use store::{DEFAULT_LOG_CAPACITY, ListLogsParams, LogStore};
