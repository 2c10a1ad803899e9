pub mod controller;
pub mod state;

pub use controller::DashboardController;
pub use state::{DashboardSnapshot, DashboardState};
