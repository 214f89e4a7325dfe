//! Event commands.

use super::require_session;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use campus_api::{CampusContext, EventFilters, EventPage, SortOrder};
use clap::Args;

/// Page size of the events list.
const PAGE_SIZE: u32 = 12;

#[derive(Debug, Args)]
pub struct EventListArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = PAGE_SIZE)]
    pub limit: u32,
    /// Search text
    #[arg(short, long)]
    pub query: Option<String>,
    #[arg(short, long)]
    pub category: Option<String>,
    /// Field to sort by, e.g. `date`
    #[arg(long)]
    pub sort: Option<String>,
    #[arg(long, requires = "sort")]
    pub order: Option<SortOrder>,
}

impl From<EventListArgs> for EventFilters {
    fn from(args: EventListArgs) -> Self {
        EventFilters {
            page: Some(args.page),
            limit: Some(args.limit),
            query: args.query,
            category: args.category,
            sort: args.sort,
            order: args.order,
        }
    }
}

/// List events.
pub async fn events_list(
    context: &CampusContext,
    args: EventListArgs,
    format: &OutputFormat,
) -> Result<()> {
    require_session(context)?;
    let page = context.api().list_events(&EventFilters::from(args)).await?;

    match format {
        OutputFormat::Text => print_events(&page),
        OutputFormat::Json => output::print_json(&page)?,
    }
    Ok(())
}

/// Register for an event.
pub async fn events_register(context: &CampusContext, id: &str, format: &OutputFormat) -> Result<()> {
    require_session(context)?;
    let ack = context.api().register_for_event(id).await?;
    output::print_success(
        ack.message.as_deref().unwrap_or("Registered for event"),
        format,
    );
    Ok(())
}

/// Cancel a registration.
pub async fn events_unregister(
    context: &CampusContext,
    id: &str,
    format: &OutputFormat,
) -> Result<()> {
    require_session(context)?;
    let ack = context.api().unregister_from_event(id).await?;
    output::print_success(
        ack.message.as_deref().unwrap_or("Registration cancelled"),
        format,
    );
    Ok(())
}

fn print_events(page: &EventPage) {
    if page.events.is_empty() {
        println!("No events found");
        return;
    }

    println!(
        "{:<26} {:<30} {:<14} {:<12} {}",
        "ID", "Title", "Date", "Category", "Seats"
    );
    println!("{}", "-".repeat(100));
    for event in &page.events {
        let seats = match event.max_participants {
            Some(max) => format!("{}/{}", event.registered_count, max),
            None => event.registered_count.to_string(),
        };
        println!(
            "{:<26} {:<30} {:<14} {:<12} {}",
            event.id,
            output::truncate(&event.title, 30),
            output::format_date(&event.date),
            output::truncate(&event.category, 12),
            seats
        );
    }
    if page.pagination.total_pages > 1 {
        println!(
            "\nPage {} of {}",
            page.pagination.current_page, page.pagination.total_pages
        );
    }
}
