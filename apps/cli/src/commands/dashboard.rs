//! Dashboard command.

use super::notifications::print_notifications;
use super::require_session;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use campus_api::CampusContext;

/// Show stats, upcoming events and recent notifications.
pub async fn dashboard(context: &CampusContext, format: &OutputFormat) -> Result<()> {
    require_session(context)?;
    let dashboard = context.api().dashboard().await?;

    if let OutputFormat::Json = format {
        return output::print_json(&dashboard);
    }

    if let Some(user) = context.session().user() {
        println!("Welcome back, {}", user.first_name);
    }

    output::print_heading("Stats");
    output::print_row("Events", &dashboard.stats.total_events.to_string());
    output::print_row("Registered", &dashboard.stats.registered_events.to_string());
    output::print_row("Upcoming", &dashboard.stats.upcoming_events.to_string());
    output::print_row("Notifications", &dashboard.stats.notifications.to_string());

    output::print_heading("Upcoming events");
    if dashboard.upcoming_events.is_empty() {
        println!("No upcoming events");
    }
    for event in &dashboard.upcoming_events {
        println!(
            "  {:<14} {:<8} {}",
            output::format_date(&event.date),
            event.time,
            output::truncate(&event.title, 40)
        );
    }

    output::print_heading("Recent notifications");
    print_notifications(&dashboard.recent_notifications);
    Ok(())
}
