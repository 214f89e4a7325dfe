//! CLI command implementations.

mod auth;
mod dashboard;
mod events;
mod notifications;
mod profile;

pub use auth::{login, logout, refresh, register, status, RegisterArgs};
pub use dashboard::dashboard;
pub use events::{events_list, events_register, events_unregister, EventListArgs};
pub use notifications::{
    notifications_delete, notifications_list, notifications_read, notifications_read_all,
    NotificationListArgs,
};
pub use profile::{profile_show, profile_update, ProfileUpdateArgs};

use anyhow::Result;
use campus_api::CampusContext;

/// Fail unless a session was resolved at startup.
pub fn require_session(context: &CampusContext) -> Result<()> {
    if !context.session().is_authenticated() {
        anyhow::bail!("Not logged in. Run `campus login` first.");
    }
    Ok(())
}
