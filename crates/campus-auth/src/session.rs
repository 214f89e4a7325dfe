//! Session store with FSM-based state tracking.
//!
//! The store owns the in-memory identity and drives the session FSM. Tokens
//! live in the [`TokenStore`] shared with the pipeline, so a refresh failure
//! inside the pipeline is observed here on the next read.

use crate::auth_fsm::{
    SessionMachine, SessionMachineInput, SessionState, SessionStateChanged,
};
use crate::error::{AuthError, AuthResult};
use crate::models::{
    ApiEnvelope, AuthPayload, ProfileUpdate, RegistrationData, UserIdentity, UserPayload,
};
use crate::pipeline::{with_json, HttpPipeline};
use crate::transport::ApiRequest;
use campus_storage::TokenStore;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const PROFILE_PATH: &str = "/auth/profile";

/// Callback type for session state change notifications.
pub type SessionStateCallback = Box<dyn Fn(SessionStateChanged) + Send + Sync>;

/// The process-wide session: current identity plus persisted tokens.
pub struct SessionStore {
    pipeline: Arc<HttpPipeline>,
    tokens: TokenStore,
    user: Mutex<Option<UserIdentity>>,
    fsm: Mutex<SessionMachine>,
    state_callback: Mutex<Option<SessionStateCallback>>,
}

impl SessionStore {
    pub fn new(pipeline: Arc<HttpPipeline>) -> Self {
        let tokens = pipeline.tokens().clone();
        Self {
            pipeline,
            tokens,
            user: Mutex::new(None),
            fsm: Mutex::new(SessionMachine::new()),
            state_callback: Mutex::new(None),
        }
    }

    pub fn pipeline(&self) -> &Arc<HttpPipeline> {
        &self.pipeline
    }

    /// Set a callback to be notified of session state changes.
    pub fn set_state_callback(&self, callback: SessionStateCallback) {
        *self.state_callback.lock() = Some(callback);
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.reconcile();
        SessionState::from(self.fsm.lock().state())
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// The authenticated identity, if any.
    pub fn user(&self) -> Option<UserIdentity> {
        self.reconcile();
        self.user.lock().clone()
    }

    /// Resolve the persisted session. Runs once; later calls are no-ops.
    ///
    /// Never fails: any problem resolving the profile discards both tokens
    /// and leaves the session unauthenticated.
    pub async fn initialize(&self) {
        if !self.state().is_loading() {
            debug!("Session already initialized");
            return;
        }

        let has_token = self.tokens.has_access_token().unwrap_or_else(|e| {
            warn!(error = %e, "Could not read persisted access token");
            false
        });

        if !has_token {
            info!("No persisted session found");
            self.apply(&SessionMachineInput::NoSession);
            return;
        }

        match self
            .pipeline
            .get::<ApiEnvelope<UserPayload>>(PROFILE_PATH)
            .await
        {
            Ok(envelope) => {
                let user = envelope.data.user;
                info!(user_id = %user.id, "Persisted session resolved");
                *self.user.lock() = Some(user);
                self.apply(&SessionMachineInput::ProfileResolved);
            }
            Err(e) => {
                warn!(error = %e, "Persisted session rejected, clearing tokens");
                self.discard_tokens();
                *self.user.lock() = None;
                self.apply(&SessionMachineInput::NoSession);
            }
        }
    }

    /// Log in with email and password.
    ///
    /// On failure nothing changes: no tokens are written and the current
    /// identity is kept.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<UserIdentity> {
        debug!(email = %email, "Attempting login");

        let request = ApiRequest::post(LOGIN_PATH)
            .with_body(serde_json::json!({ "email": email, "password": password }))
            .without_refresh();

        let envelope = self
            .pipeline
            .send_json::<ApiEnvelope<AuthPayload>>(request)
            .await
            .map_err(|e| {
                warn!(status = ?e.status(), "Login failed");
                AuthError::rejected(e, "Login failed")
            })?;

        self.accept_session(envelope.data)
    }

    /// Create an account and log in as it.
    pub async fn register(&self, data: &RegistrationData) -> AuthResult<UserIdentity> {
        debug!(email = %data.email, "Attempting registration");

        let request = with_json(ApiRequest::post(REGISTER_PATH), data)
            .map_err(|e| AuthError::rejected(e, "Registration failed"))?
            .without_refresh();

        let envelope = self
            .pipeline
            .send_json::<ApiEnvelope<AuthPayload>>(request)
            .await
            .map_err(|e| {
                warn!(status = ?e.status(), "Registration failed");
                AuthError::rejected(e, "Registration failed")
            })?;

        self.accept_session(envelope.data)
    }

    /// Drop the session. Never fails.
    pub fn logout(&self) {
        self.discard_tokens();
        *self.user.lock() = None;
        self.apply(&SessionMachineInput::SessionCleared);
        info!("Logged out");
    }

    /// Send a partial identity. The server's reply replaces the identity.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> AuthResult<UserIdentity> {
        let envelope = self
            .pipeline
            .put::<ApiEnvelope<UserPayload>, _>(PROFILE_PATH, update)
            .await
            .map_err(|e| {
                warn!(status = ?e.status(), "Profile update failed");
                AuthError::rejected(e, "Profile update failed")
            })?;

        let user = envelope.data.user;
        *self.user.lock() = Some(user.clone());
        self.transition(&SessionMachineInput::ProfileUpdated)?;
        info!(user_id = %user.id, "Profile updated");

        Ok(user)
    }

    /// Exchange the persisted refresh token for a new access token.
    ///
    /// A missing refresh token fails with [`AuthError::RefreshUnavailable`]
    /// and touches nothing. Any other failure logs out before returning.
    pub async fn refresh_token(&self) -> AuthResult<()> {
        let refresh_token = match self.tokens.refresh_token() {
            Ok(Some(token)) => token,
            Ok(None) => return Err(AuthError::RefreshUnavailable),
            Err(e) => {
                warn!(error = %e, "Could not read refresh token, logging out");
                self.logout();
                return Err(e.into());
            }
        };

        if let Err(e) = self.exchange_and_store(&refresh_token).await {
            warn!(error = %e, "Token refresh failed, logging out");
            self.logout();
            return Err(e);
        }

        info!("Access token refreshed");
        Ok(())
    }

    async fn exchange_and_store(&self, refresh_token: &str) -> AuthResult<()> {
        let access_token = self.pipeline.exchange_refresh_token(refresh_token).await?;
        self.tokens.set_access_token(&access_token)?;
        Ok(())
    }

    fn accept_session(&self, payload: AuthPayload) -> AuthResult<UserIdentity> {
        let AuthPayload { user, tokens } = payload;

        self.tokens
            .set_tokens(&tokens.access_token, &tokens.refresh_token)?;
        *self.user.lock() = Some(user.clone());
        self.transition(&SessionMachineInput::SessionAccepted)?;

        info!(user_id = %user.id, "Session established");
        Ok(user)
    }

    fn discard_tokens(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "Failed to clear persisted tokens");
        }
    }

    /// Drop the identity if its access token has disappeared underneath us.
    fn reconcile(&self) {
        let state = SessionState::from(self.fsm.lock().state());
        if !state.is_authenticated() {
            return;
        }

        match self.tokens.has_access_token() {
            Ok(true) => {}
            Ok(false) => {
                info!("Access token gone, session ended");
                *self.user.lock() = None;
                self.apply(&SessionMachineInput::SessionCleared);
            }
            Err(e) => warn!(error = %e, "Could not check persisted access token"),
        }
    }

    /// Transition and log instead of failing.
    fn apply(&self, input: &SessionMachineInput) {
        if let Err(e) = self.transition(input) {
            debug!(error = %e, "Ignoring session transition");
        }
    }

    /// Transition the FSM and notify the callback if the state changed.
    fn transition(&self, input: &SessionMachineInput) -> AuthResult<SessionState> {
        let mut fsm = self.fsm.lock();
        let old_state = SessionState::from(fsm.state());

        fsm.consume(input).map_err(|_| {
            AuthError::InvalidStateTransition(format!(
                "Cannot apply {:?} in state {:?}",
                input,
                fsm.state()
            ))
        })?;

        let new_state = SessionState::from(fsm.state());
        drop(fsm);

        if old_state != new_state {
            debug!(
                old_state = ?old_state,
                new_state = ?new_state,
                "Session state transition"
            );
            self.notify_state_change(new_state);
        }

        Ok(new_state)
    }

    fn notify_state_change(&self, state: SessionState) {
        let callback = self.state_callback.lock();
        if let Some(callback) = callback.as_ref() {
            let user = self.user.lock().clone();
            callback(SessionStateChanged {
                state,
                user_id: user.as_ref().map(|u| u.id.clone()),
                email: user.map(|u| u.email),
            });
        }
    }
}
