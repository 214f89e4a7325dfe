//! Authentication commands.

use crate::output::{self, OutputFormat};
use anyhow::Result;
use campus_api::CampusContext;
use campus_auth::{AuthError, CollegeRef, RegistrationData, Role, UserIdentity};
use clap::Args;
use serde_json::json;
use std::io::{self, Write};

/// Fields for `campus register`.
#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub student_id: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    /// student, event-organizer, admin or faculty
    #[arg(long)]
    pub role: Option<Role>,
    #[arg(long)]
    pub college_name: String,
    #[arg(long)]
    pub college_code: String,
    #[arg(long)]
    pub department: String,
    #[arg(long)]
    pub academic_year: String,
    /// Comma-separated
    #[arg(long, value_delimiter = ',')]
    pub interests: Vec<String>,
}

/// Login with email and password.
pub async fn login(context: &CampusContext, email: Option<String>, format: &OutputFormat) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    if email.is_empty() {
        anyhow::bail!("Email is required");
    }

    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        anyhow::bail!("Password is required");
    }

    let user = context.session().login(&email, &password).await?;
    print_signed_in("Logged in", &user, format);
    Ok(())
}

/// Create an account and sign in.
pub async fn register(context: &CampusContext, args: RegisterArgs, format: &OutputFormat) -> Result<()> {
    let password = rpassword::prompt_password("Password: ")?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    if password != confirm {
        anyhow::bail!("Passwords do not match");
    }

    let data = RegistrationData {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        password,
        student_id: args.student_id,
        phone_number: args.phone,
        role: args.role,
        college: CollegeRef {
            name: args.college_name,
            code: args.college_code,
        },
        department: args.department,
        academic_year: args.academic_year,
        interests: (!args.interests.is_empty()).then_some(args.interests),
    };

    let user = context.session().register(&data).await?;
    print_signed_in("Account created", &user, format);
    Ok(())
}

/// Logout and forget the stored tokens.
pub async fn logout(context: &CampusContext, format: &OutputFormat) -> Result<()> {
    let was_authenticated = context.session().is_authenticated();
    context.session().logout();

    if was_authenticated {
        output::print_success("Logged out successfully", format);
    } else {
        output::print_success("Not logged in", format);
    }
    Ok(())
}

/// Show the session state.
pub async fn status(context: &CampusContext, format: &OutputFormat) -> Result<()> {
    let session = context.session();
    let state = session.state();
    let user = session.user();

    match format {
        OutputFormat::Text => {
            output::print_heading("Session");
            output::print_row("API", context.base_url());
            output::print_row("State", state.as_str());
            if let Some(user) = &user {
                output::print_row("Name", &user.full_name());
                output::print_row("Email", &user.email);
                output::print_row("Role", user.role.as_str());
            }
        }
        OutputFormat::Json => output::print_json(&json!({
            "api": context.base_url(),
            "state": state.as_str(),
            "authenticated": state.is_authenticated(),
            "user": user,
        }))?,
    }
    Ok(())
}

/// Exchange the refresh token for a fresh access token.
pub async fn refresh(context: &CampusContext, format: &OutputFormat) -> Result<()> {
    match context.session().refresh_token().await {
        Ok(()) => {
            output::print_success("Access token refreshed", format);
            Ok(())
        }
        Err(AuthError::RefreshUnavailable) => {
            anyhow::bail!("No stored session. Run `campus login` first.")
        }
        Err(e) => Err(e.into()),
    }
}

fn print_signed_in(action: &str, user: &UserIdentity, format: &OutputFormat) {
    let name = user.full_name();
    let who = if name.is_empty() { &user.email } else { &name };
    output::print_success(&format!("{} as {}", action, who), format);
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
