pub mod analytics;
pub mod calls;

pub use analytics::AnalyticsRepo;
pub use calls::{CallStart, CallsRepo, StatusUpdate};
