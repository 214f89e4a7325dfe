//! Profile commands.

use super::require_session;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use campus_api::CampusContext;
use campus_auth::{ProfileUpdate, UserIdentity};
use clap::Args;

/// Fields for `campus profile update`. Only the given flags are sent.
#[derive(Debug, Args)]
pub struct ProfileUpdateArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub student_id: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub academic_year: Option<String>,
    /// Comma-separated; replaces the current list
    #[arg(long, value_delimiter = ',')]
    pub interests: Option<Vec<String>>,
    #[arg(long)]
    pub picture: Option<String>,
}

impl From<ProfileUpdateArgs> for ProfileUpdate {
    fn from(args: ProfileUpdateArgs) -> Self {
        ProfileUpdate {
            first_name: args.first_name,
            last_name: args.last_name,
            student_id: args.student_id,
            phone_number: args.phone,
            department: args.department,
            academic_year: args.academic_year,
            interests: args.interests,
            profile_picture: args.picture,
            ..ProfileUpdate::default()
        }
    }
}

/// Show the signed-in user.
pub async fn profile_show(context: &CampusContext, format: &OutputFormat) -> Result<()> {
    let Some(user) = context.session().user() else {
        anyhow::bail!("Not logged in. Run `campus login` first.");
    };
    print_profile(&user, format)
}

/// Update the signed-in user.
pub async fn profile_update(
    context: &CampusContext,
    args: ProfileUpdateArgs,
    format: &OutputFormat,
) -> Result<()> {
    require_session(context)?;

    let update = ProfileUpdate::from(args);
    if update.is_empty() {
        anyhow::bail!("Nothing to update");
    }

    let user = context.session().update_profile(&update).await?;
    match format {
        OutputFormat::Text => {
            output::print_success("Profile updated successfully", format);
            print_profile(&user, format)
        }
        OutputFormat::Json => output::print_json(&user),
    }
}

fn print_profile(user: &UserIdentity, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            output::print_heading("Profile");
            output::print_row("ID", &user.id);
            output::print_row("Name", &user.full_name());
            output::print_row("Email", &user.email);
            output::print_row("Verified", if user.is_email_verified { "yes" } else { "no" });
            output::print_row("Role", user.role.as_str());
            if let Some(student_id) = &user.student_id {
                output::print_row("Student ID", student_id);
            }
            if let Some(phone) = &user.phone_number {
                output::print_row("Phone", phone);
            }
            output::print_row(
                "College",
                &format!("{} ({})", user.college.name, user.college.code),
            );
            output::print_row("Department", &user.department);
            output::print_row("Year", &user.academic_year);
            if !user.interests.is_empty() {
                output::print_row("Interests", &user.interests.join(", "));
            }
            Ok(())
        }
        OutputFormat::Json => output::print_json(user),
    }
}
