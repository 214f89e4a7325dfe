//! Resource API and application context for the campus client.
//!
//! Every call here goes through the `campus-auth` pipeline, so it carries
//! the bearer token and gets the one-shot refresh-and-retry for free.

mod client;
mod context;
mod filters;
mod models;

pub use client::{CampusApi, DASHBOARD_LIMIT};
pub use context::{BootstrapError, BootstrapResult, CampusContext};
pub use filters::{EventFilters, NotificationFilters, SortOrder};
pub use models::{
    Acknowledgement, Dashboard, EventPage, EventSummary, NotificationPage, NotificationRecord,
    Pagination, UserStats,
};
