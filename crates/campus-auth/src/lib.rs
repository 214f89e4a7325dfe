//! Session and request pipeline for the campus client.
//!
//! This crate provides:
//! - `HttpPipeline`: the single gateway for API calls, attaching the bearer
//!   token and refreshing it once on a 401
//! - `SessionStore`: login, registration, logout, profile updates and token
//!   refresh, with explicit FSM-based session state
//! - `HttpTransport`: the seam between the pipeline and `reqwest`

mod auth_fsm;
mod error;
mod models;
mod pipeline;
mod session;
mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(test)]
mod tests;

pub use auth_fsm::session_machine;
pub use auth_fsm::{
    SessionMachine, SessionMachineInput, SessionMachineState, SessionState, SessionStateChanged,
};
pub use error::{ApiError, ApiResult, AuthError, AuthResult, ErrorBody, FieldError};
pub use models::{
    ApiEnvelope, AuthPayload, CollegeRef, NotificationPreferences, ProfileUpdate,
    RegistrationData, Role, TokenBundle, UserIdentity, UserPayload,
};
pub use pipeline::{Attempt, HttpPipeline, SessionExpiredHook, REFRESH_PATH};
pub use session::{SessionStateCallback, SessionStore, LOGIN_PATH, PROFILE_PATH, REGISTER_PATH};
pub use transport::{
    ApiRequest, ApiResponse, HttpTransport, Method, RefreshPolicy, ReqwestTransport,
    TransportError,
};
