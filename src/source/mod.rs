mod columns;
mod reader;

pub use columns::{detect_columns, DetectedColumns};
pub use reader::{ReadingSource, Readings};
