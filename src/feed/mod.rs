pub mod controller;
pub mod loop_worker;

pub use controller::FeedController;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FeedStatus {
    #[default]
    Idle,
    Running,
    Finished,
    Cancelled,
}

impl FeedStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FeedStatus::Finished | FeedStatus::Cancelled)
    }
}
