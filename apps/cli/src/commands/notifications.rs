//! Notification commands.

use super::require_session;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use campus_api::{CampusContext, NotificationFilters, NotificationRecord};
use clap::Args;

/// Page size of the notifications list.
const PAGE_SIZE: u32 = 50;

#[derive(Debug, Args)]
pub struct NotificationListArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = PAGE_SIZE)]
    pub limit: u32,
    /// Only unread notifications
    #[arg(long, conflicts_with = "read")]
    pub unread: bool,
    /// Only read notifications
    #[arg(long)]
    pub read: bool,
}

impl From<NotificationListArgs> for NotificationFilters {
    fn from(args: NotificationListArgs) -> Self {
        let read = match (args.read, args.unread) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        NotificationFilters {
            page: Some(args.page),
            limit: Some(args.limit),
            read,
        }
    }
}

/// List notifications.
pub async fn notifications_list(
    context: &CampusContext,
    args: NotificationListArgs,
    format: &OutputFormat,
) -> Result<()> {
    require_session(context)?;
    let page = context
        .api()
        .list_notifications(&NotificationFilters::from(args))
        .await?;

    match format {
        OutputFormat::Text => print_notifications(&page.notifications),
        OutputFormat::Json => output::print_json(&page)?,
    }
    Ok(())
}

/// Mark one notification as read.
pub async fn notifications_read(
    context: &CampusContext,
    id: &str,
    format: &OutputFormat,
) -> Result<()> {
    require_session(context)?;
    context.api().mark_notification_read(id).await?;
    output::print_success("Notification marked as read", format);
    Ok(())
}

/// Mark every notification as read.
pub async fn notifications_read_all(context: &CampusContext, format: &OutputFormat) -> Result<()> {
    require_session(context)?;
    context.api().mark_all_notifications_read().await?;
    output::print_success("All notifications marked as read", format);
    Ok(())
}

/// Delete a notification.
pub async fn notifications_delete(
    context: &CampusContext,
    id: &str,
    format: &OutputFormat,
) -> Result<()> {
    require_session(context)?;
    context.api().delete_notification(id).await?;
    output::print_success("Notification deleted", format);
    Ok(())
}

pub(crate) fn print_notifications(notifications: &[NotificationRecord]) {
    if notifications.is_empty() {
        println!("No notifications");
        return;
    }

    println!("{:<26} {:<2} {:<8} {}", "ID", "", "Priority", "Title");
    println!("{}", "-".repeat(80));
    for notification in notifications {
        let marker = if notification.is_read { " " } else { "*" };
        println!(
            "{:<26} {:<2} {:<8} {}",
            notification.id,
            marker,
            notification.priority,
            output::truncate(&notification.title, 40)
        );
    }
}
