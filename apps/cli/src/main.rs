//! Campus CLI - Command-line client for the campus events service.

mod commands;
mod output;

use anyhow::Result;
use campus_api::CampusContext;
use campus_auth::{ApiError, AuthError};
use campus_config::{Config, Paths};
use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser)]
#[command(name = "campus")]
#[command(about = "Campus CLI - Browse and manage campus events from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error). Defaults to the config file value.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// API base URL, e.g. https://events.example.edu/api
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with email and password
    Login {
        /// Email address (prompted if omitted)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Create an account
    Register(commands::RegisterArgs),

    /// Logout and forget the stored session
    Logout,

    /// Show session status
    Status,

    /// Exchange the refresh token for a new access token
    Refresh,

    /// Manage your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Browse and register for events
    Events {
        #[command(subcommand)]
        command: EventCommands,
    },

    /// Manage notifications
    Notifications {
        #[command(subcommand)]
        command: NotificationCommands,
    },

    /// Show stats, upcoming events and recent notifications
    Dashboard,
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show your profile
    Show,
    /// Update profile fields
    Update(commands::ProfileUpdateArgs),
}

#[derive(Subcommand)]
enum EventCommands {
    /// List events
    List(commands::EventListArgs),
    /// Register for an event
    Register {
        /// Event ID
        id: String,
    },
    /// Cancel an event registration
    Unregister {
        /// Event ID
        id: String,
    },
}

#[derive(Subcommand)]
enum NotificationCommands {
    /// List notifications
    List(commands::NotificationListArgs),
    /// Mark a notification as read
    Read {
        /// Notification ID
        id: String,
    },
    /// Mark all notifications as read
    ReadAll,
    /// Delete a notification
    Delete {
        /// Notification ID
        id: String,
    },
}

async fn run(cli: Cli, paths: Paths, mut config: Config) -> Result<()> {
    if let Some(url) = cli.api_url {
        config.api_url = Some(url);
    }

    let context = CampusContext::bootstrap_with_hook(
        &config,
        &paths,
        Box::new(|| eprintln!("Session expired. Run `campus login` to sign in again.")),
    )
    .await?;
    debug!(state = context.session().state().as_str(), "Session resolved");

    let format = &cli.format;
    match cli.command.unwrap_or(Commands::Status) {
        Commands::Login { email } => commands::login(&context, email, format).await,
        Commands::Register(args) => commands::register(&context, args, format).await,
        Commands::Logout => commands::logout(&context, format).await,
        Commands::Status => commands::status(&context, format).await,
        Commands::Refresh => commands::refresh(&context, format).await,
        Commands::Profile { command } => match command {
            ProfileCommands::Show => commands::profile_show(&context, format).await,
            ProfileCommands::Update(args) => commands::profile_update(&context, args, format).await,
        },
        Commands::Events { command } => match command {
            EventCommands::List(args) => commands::events_list(&context, args, format).await,
            EventCommands::Register { id } => commands::events_register(&context, &id, format).await,
            EventCommands::Unregister { id } => {
                commands::events_unregister(&context, &id, format).await
            }
        },
        Commands::Notifications { command } => match command {
            NotificationCommands::List(args) => {
                commands::notifications_list(&context, args, format).await
            }
            NotificationCommands::Read { id } => {
                commands::notifications_read(&context, &id, format).await
            }
            NotificationCommands::ReadAll => commands::notifications_read_all(&context, format).await,
            NotificationCommands::Delete { id } => {
                commands::notifications_delete(&context, &id, format).await
            }
        },
        Commands::Dashboard => commands::dashboard(&context, format).await,
    }
}

/// Print a failure, including any field errors the server sent.
fn report(error: &anyhow::Error, format: &output::OutputFormat) {
    if let Some(auth) = error.downcast_ref::<AuthError>() {
        output::print_error(&auth.to_string(), auth.field_errors(), format);
    } else if let Some(api) = error.downcast_ref::<ApiError>() {
        let message = api
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| api.to_string());
        output::print_error(&message, api.field_errors(), format);
    } else {
        output::print_error(&error.to_string(), &[], format);
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let format = cli.format;

    let setup = Paths::new().and_then(|paths| Config::load(&paths).map(|config| (paths, config)));
    let (paths, config) = match setup {
        Ok(setup) => setup,
        Err(e) => {
            output::print_error(&e.to_string(), &[], &format);
            std::process::exit(1);
        }
    };

    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    if let Err(e) = campus_config::init_logging("campus-cli", &level, &paths) {
        eprintln!("Warning: file logging disabled: {}", e);
    }

    if let Err(e) = run(cli, paths, config).await {
        report(&e, &format);
        std::process::exit(1);
    }
}
