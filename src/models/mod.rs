mod insight;
mod reading;

pub use insight::InsightSummary;
pub use reading::Reading;
