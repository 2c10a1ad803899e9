mod intent;
mod responder;

pub use intent::QueryIntent;
pub use responder::{answer, HELP_TEXT, NO_ANOMALIES_TEXT, NO_DATA_TEXT};
