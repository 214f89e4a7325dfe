//! Wire types for the auth endpoints.
//!
//! User records are owned by the server. Only the fields the client displays
//! are typed; anything else is carried through untouched in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Student,
    #[serde(rename = "Event Organizer")]
    EventOrganizer,
    Admin,
    Faculty,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::EventOrganizer => "Event Organizer",
            Role::Admin => "Admin",
            Role::Faculty => "Faculty",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "student" => Ok(Role::Student),
            "eventorganizer" | "organizer" => Ok(Role::EventOrganizer),
            "admin" => Ok(Role::Admin),
            "faculty" => Ok(Role::Faculty),
            _ => Err(format!(
                "unknown role '{s}' (expected student, event-organizer, admin or faculty)"
            )),
        }
    }
}

/// College a user belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollegeRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    #[serde(default)]
    pub email: bool,
    #[serde(default)]
    pub push: bool,
    #[serde(default)]
    pub sms: bool,
    #[serde(default)]
    pub event_reminders: bool,
    #[serde(default)]
    pub event_updates: bool,
    #[serde(default)]
    pub new_events: bool,
}

/// The authenticated user as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub college: CollegeRef,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub academic_year: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default)]
    pub notification_preferences: NotificationPreferences,
    /// Server fields the client does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserIdentity {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Payload for `POST /auth/register`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub college: CollegeRef,
    pub department: String,
    pub academic_year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
}

impl fmt::Debug for RegistrationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationData")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("college", &self.college)
            .field("department", &self.department)
            .field("academic_year", &self.academic_year)
            .finish_non_exhaustive()
    }
}

/// Partial identity for `PUT /auth/profile`. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college: Option<CollegeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_preferences: Option<NotificationPreferences>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Standard `{success, message, data}` response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// Issued token pair.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBundle {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime hint as sent by the server (e.g. `"7d"`). Informational only.
    #[serde(default)]
    pub expires_in: Option<Value>,
}

impl fmt::Debug for TokenBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBundle")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// `data` of the login and register responses.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub user: UserIdentity,
    pub tokens: TokenBundle,
}

/// `data` of the profile responses.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub user: UserIdentity,
}

/// Response of `POST /auth/refresh`.
///
/// The live server puts `tokens` at the top level instead of under `data`;
/// both placements are accepted.
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshResponse {
    #[serde(default)]
    tokens: Option<AccessTokenOnly>,
    #[serde(default)]
    data: Option<RefreshData>,
}

#[derive(Debug, Deserialize)]
struct RefreshData {
    #[serde(default)]
    tokens: Option<AccessTokenOnly>,
}

#[derive(Deserialize)]
struct AccessTokenOnly {
    #[serde(rename = "accessToken")]
    access_token: String,
}

impl fmt::Debug for AccessTokenOnly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessTokenOnly(<redacted>)")
    }
}

impl RefreshResponse {
    pub(crate) fn into_access_token(self) -> Option<String> {
        self.tokens
            .or_else(|| self.data.and_then(|data| data.tokens))
            .map(|tokens| tokens.access_token)
            .filter(|token| !token.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_json() -> Value {
        json!({
            "id": "u-1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@campus.edu",
            "role": "Event Organizer",
            "college": { "name": "Engineering College", "code": "ENG" },
            "department": "Computer Science",
            "academicYear": "3rd Year",
            "interests": ["robotics"],
            "isEmailVerified": true,
            "notificationPreferences": { "email": true, "eventReminders": true },
            "registeredEvents": ["e-1"],
            "createdAt": "2024-01-01T00:00:00.000Z"
        })
    }

    #[test]
    fn test_user_identity_decodes_and_keeps_unknown_fields() {
        let user: UserIdentity = serde_json::from_value(user_json()).unwrap();
        assert_eq!(user.full_name(), "Ada Lovelace");
        assert_eq!(user.role, Role::EventOrganizer);
        assert_eq!(user.college.code, "ENG");
        assert!(user.notification_preferences.event_reminders);
        assert!(!user.notification_preferences.sms);
        assert_eq!(user.extra["registeredEvents"], json!(["e-1"]));

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["createdAt"], "2024-01-01T00:00:00.000Z");
        assert_eq!(back["role"], "Event Organizer");
    }

    #[test]
    fn test_minimal_user_uses_defaults() {
        let user: UserIdentity = serde_json::from_value(json!({ "id": "u-2" })).unwrap();
        assert_eq!(user.role, Role::Student);
        assert!(user.interests.is_empty());
        assert_eq!(user.full_name(), "");
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("student".parse::<Role>().unwrap(), Role::Student);
        assert_eq!("event-organizer".parse::<Role>().unwrap(), Role::EventOrganizer);
        assert_eq!("Event Organizer".parse::<Role>().unwrap(), Role::EventOrganizer);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("dean".parse::<Role>().is_err());
    }

    #[test]
    fn test_profile_update_serializes_only_set_fields() {
        let update = ProfileUpdate {
            first_name: Some("X".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(!update.is_empty());
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "firstName": "X" }));
        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn test_registration_debug_redacts_password() {
        let data = RegistrationData {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@campus.edu".to_string(),
            password: "hunter22".to_string(),
            student_id: None,
            phone_number: None,
            role: None,
            college: CollegeRef::default(),
            department: "CS".to_string(),
            academic_year: "1st Year".to_string(),
            interests: None,
        };
        assert!(!format!("{data:?}").contains("hunter22"));

        let wire = serde_json::to_value(&data).unwrap();
        assert_eq!(wire["password"], "hunter22");
        assert!(wire.get("role").is_none());
    }

    #[test]
    fn test_auth_envelope_decodes() {
        let envelope: ApiEnvelope<AuthPayload> = serde_json::from_value(json!({
            "success": true,
            "message": "Login successful",
            "data": {
                "user": user_json(),
                "tokens": { "accessToken": "a", "refreshToken": "r", "expiresIn": "7d" }
            }
        }))
        .unwrap();
        assert_eq!(envelope.data.tokens.access_token, "a");
        assert_eq!(envelope.data.tokens.refresh_token, "r");
        assert!(!format!("{:?}", envelope.data.tokens).contains("\"a\""));
    }

    #[test]
    fn test_refresh_response_reads_top_level_tokens() {
        let parsed: RefreshResponse =
            serde_json::from_value(json!({ "success": true, "tokens": { "accessToken": "new" } }))
                .unwrap();
        assert_eq!(parsed.into_access_token().as_deref(), Some("new"));
    }

    #[test]
    fn test_refresh_response_accepts_nested_tokens() {
        let parsed: RefreshResponse =
            serde_json::from_value(json!({ "data": { "tokens": { "accessToken": "nested" } } }))
                .unwrap();
        assert_eq!(parsed.into_access_token().as_deref(), Some("nested"));
    }

    #[test]
    fn test_refresh_response_without_token() {
        let parsed: RefreshResponse = serde_json::from_value(json!({ "success": true })).unwrap();
        assert_eq!(parsed.into_access_token(), None);
    }
}
