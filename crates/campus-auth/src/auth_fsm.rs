//! Session state machine using rust-fsm.
//!
//! ## State Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │     Loading     │ (initial)
//! └────────┬────────┘
//!          │ ProfileResolved ──────────────► Authenticated
//!          │ NoSession / SessionCleared
//!          ▼
//! ┌─────────────────┐  SessionAccepted   ┌─────────────────┐
//! │ Unauthenticated │ ─────────────────► │  Authenticated  │
//! └─────────────────┘ ◄───────────────── └─────────────────┘
//!                        SessionCleared     SessionAccepted / ProfileUpdated
//!                                           (self loops)
//! ```
//!
//! `SessionAccepted` (login or register) and `ProfileUpdated` are accepted
//! from every state; the server response alone decides the identity.

use rust_fsm::*;
use serde::{Deserialize, Serialize};

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub session_machine(Loading)

    Loading => {
        ProfileResolved => Authenticated,
        NoSession => Unauthenticated,
        SessionAccepted => Authenticated,
        ProfileUpdated => Authenticated,
        SessionCleared => Unauthenticated
    },
    Unauthenticated => {
        SessionAccepted => Authenticated,
        ProfileUpdated => Authenticated,
        SessionCleared => Unauthenticated
    },
    Authenticated => {
        SessionAccepted => Authenticated,
        ProfileUpdated => Authenticated,
        SessionCleared => Unauthenticated
    }
}

pub use session_machine::Input as SessionMachineInput;
pub use session_machine::State as SessionMachineState;
pub use session_machine::StateMachine as SessionMachine;

/// Session state for external consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Startup: the persisted token has not been resolved yet.
    Loading,
    Unauthenticated,
    Authenticated,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Loading => "loading",
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Authenticated => "authenticated",
        }
    }
}

impl From<&SessionMachineState> for SessionState {
    fn from(state: &SessionMachineState) -> Self {
        match state {
            SessionMachineState::Loading => SessionState::Loading,
            SessionMachineState::Unauthenticated => SessionState::Unauthenticated,
            SessionMachineState::Authenticated => SessionState::Authenticated,
        }
    }
}

/// Payload for session state change notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStateChanged {
    pub state: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
