//! In-process test doubles.
//!
//! Provides:
//! - `ScriptedTransport`: replays queued responses and records every request
//! - `TestHarness`: wires transport, memory storage, pipeline and session
//! - JSON fixtures for the auth envelopes

use crate::pipeline::HttpPipeline;
use crate::session::SessionStore;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method, TransportError};
use async_trait::async_trait;
use campus_storage::{MemoryStorage, TokenStore};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A request as seen by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

/// What the transport does for the next request.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Respond(ApiResponse),
    /// Fail without a response
    Unreachable(String),
}

/// Transport that answers from a queue.
///
/// Running out of scripted replies is reported as a connection failure.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a JSON response.
    pub fn respond(&self, status: u16, body: Value) -> &Self {
        self.respond_raw(status, body.to_string())
    }

    pub fn respond_raw(&self, status: u16, body: impl Into<String>) -> &Self {
        self.replies
            .lock()
            .push_back(ScriptedReply::Respond(ApiResponse::new(status, body)));
        self
    }

    /// Queue a transport failure.
    pub fn unreachable(&self, reason: &str) -> &Self {
        self.replies
            .lock()
            .push_back(ScriptedReply::Unreachable(reason.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// `"METHOD /path"` for every request sent so far.
    pub fn calls(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn pending_replies(&self) -> usize {
        self.replies.lock().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, TransportError> {
        self.requests.lock().push(RecordedRequest {
            method: request.method,
            path: request.path.clone(),
            query: request.query.clone(),
            body: request.body.clone(),
            bearer: bearer.map(str::to_string),
        });

        match self.replies.lock().pop_front() {
            Some(ScriptedReply::Respond(response)) => Ok(response),
            Some(ScriptedReply::Unreachable(reason)) => Err(TransportError::Connection(reason)),
            None => Err(TransportError::Connection(format!(
                "no scripted reply for {} {}",
                request.method, request.path
            ))),
        }
    }
}

/// Fully wired client over a scripted transport and memory storage.
pub struct TestHarness {
    pub transport: Arc<ScriptedTransport>,
    pub storage: Arc<MemoryStorage>,
    pub tokens: TokenStore,
    pub pipeline: Arc<HttpPipeline>,
    pub session: SessionStore,
    expired: Arc<AtomicUsize>,
}

impl TestHarness {
    pub fn new() -> Self {
        let transport = ScriptedTransport::new();
        let storage = Arc::new(MemoryStorage::new());
        let tokens = TokenStore::new(storage.clone());
        let pipeline = Arc::new(HttpPipeline::new(transport.clone(), tokens.clone()));

        let expired = Arc::new(AtomicUsize::new(0));
        let counter = expired.clone();
        pipeline.set_session_expired_hook(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let session = SessionStore::new(pipeline.clone());

        Self {
            transport,
            storage,
            tokens,
            pipeline,
            session,
            expired,
        }
    }

    /// Harness with a persisted token pair.
    pub fn with_tokens(access_token: &str, refresh_token: &str) -> Self {
        let harness = Self::new();
        harness
            .tokens
            .set_tokens(access_token, refresh_token)
            .expect("memory storage never fails");
        harness
    }

    /// Harness with only an access token persisted.
    pub fn with_access_token(access_token: &str) -> Self {
        let harness = Self::new();
        harness
            .tokens
            .set_access_token(access_token)
            .expect("memory storage never fails");
        harness
    }

    /// How many times the session-expired hook fired.
    pub fn session_expired_count(&self) -> usize {
        self.expired.load(Ordering::SeqCst)
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens.access_token().expect("memory storage never fails")
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.tokens.refresh_token().expect("memory storage never fails")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A user record as the server sends it.
pub fn user_json(id: &str, first_name: &str) -> Value {
    json!({
        "id": id,
        "firstName": first_name,
        "lastName": "Tester",
        "email": format!("{}@campus.edu", first_name.to_lowercase()),
        "role": "Student",
        "college": { "name": "Engineering College", "code": "ENG" },
        "department": "Computer Science",
        "academicYear": "2nd Year",
        "interests": ["hackathons"],
        "isEmailVerified": true,
        "notificationPreferences": {
            "email": true, "push": false, "sms": false,
            "eventReminders": true, "eventUpdates": true, "newEvents": false
        }
    })
}

/// Login/register success body.
pub fn auth_response(user: Value, access_token: &str, refresh_token: &str) -> Value {
    json!({
        "success": true,
        "message": "Login successful",
        "data": {
            "user": user,
            "tokens": {
                "accessToken": access_token,
                "refreshToken": refresh_token,
                "expiresIn": "7d"
            }
        }
    })
}

/// `GET`/`PUT /auth/profile` success body.
pub fn profile_response(user: Value) -> Value {
    json!({ "success": true, "data": { "user": user } })
}

/// `POST /auth/refresh` success body, with `tokens` at the top level.
pub fn refresh_response(access_token: &str) -> Value {
    json!({ "success": true, "tokens": { "accessToken": access_token } })
}

/// Error envelope with a message.
pub fn error_response(message: &str) -> Value {
    json!({ "success": false, "message": message })
}
