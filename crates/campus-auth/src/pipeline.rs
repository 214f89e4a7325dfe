//! The authenticated HTTP pipeline.
//!
//! Every API call goes through [`HttpPipeline::execute`], which runs two
//! interceptors around the transport:
//!
//! - **outbound**: attach `Authorization: Bearer <accessToken>` when a token
//!   is persisted
//! - **inbound**: on a 401, exchange the refresh token and re-issue the call
//!   once
//!
//! A failed exchange clears both tokens, fires the session-expired hook and
//! returns the original 401.

use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::models::RefreshResponse;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, RefreshPolicy};
use campus_storage::TokenStore;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Endpoint exchanging a refresh token for a new access token.
pub const REFRESH_PATH: &str = "/auth/refresh";

const UNAUTHORIZED: u16 = 401;

/// Called after a failed refresh has cleared the session.
pub type SessionExpiredHook = Box<dyn Fn() + Send + Sync>;

/// How many times a logical request has been sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Initial,
    Retry,
}

/// A logical request and its attempt marker.
struct PendingCall {
    request: ApiRequest,
    attempt: Attempt,
}

impl PendingCall {
    fn new(request: ApiRequest) -> Self {
        Self {
            request,
            attempt: Attempt::Initial,
        }
    }

    /// Mark the call as retried. Returns false if it already was.
    fn mark_retried(&mut self) -> bool {
        match self.attempt {
            Attempt::Initial => {
                self.attempt = Attempt::Retry;
                true
            }
            Attempt::Retry => false,
        }
    }
}

/// Single gateway for all API calls.
pub struct HttpPipeline {
    transport: Arc<dyn HttpTransport>,
    tokens: TokenStore,
    session_expired: Mutex<Option<SessionExpiredHook>>,
}

impl HttpPipeline {
    pub fn new(transport: Arc<dyn HttpTransport>, tokens: TokenStore) -> Self {
        Self {
            transport,
            tokens,
            session_expired: Mutex::new(None),
        }
    }

    /// The token store the interceptors read and write.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Set the callback fired when a refresh fails and the session is dropped.
    pub fn set_session_expired_hook(&self, hook: SessionExpiredHook) {
        *self.session_expired.lock() = Some(hook);
    }

    /// Send a request through both interceptors.
    ///
    /// Returns the response for 2xx statuses and [`ApiError::Status`] for
    /// everything else.
    pub async fn execute(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let mut call = PendingCall::new(request);

        loop {
            let response = self.dispatch(&call).await?;
            if response.status != UNAUTHORIZED {
                return into_result(&call.request, response);
            }

            if call.request.refresh_policy == RefreshPolicy::Never || !call.mark_retried() {
                debug!(path = %call.request.path, "Unauthorized, not retrying");
                return Err(status_error(response));
            }

            if !self.refresh_after_unauthorized().await {
                return Err(status_error(response));
            }

            debug!(path = %call.request.path, "Retrying with refreshed access token");
        }
    }

    /// Send a request and decode the JSON body of the 2xx response.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let path = request.path.clone();
        let response = self.execute(request).await?;
        decode(&path, &response)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send_json(ApiRequest::get(path)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(with_json(ApiRequest::post(path), body)?)
            .await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(with_json(ApiRequest::put(path), body)?)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send_json(ApiRequest::delete(path)).await
    }

    /// Exchange `refresh_token` for a new access token.
    ///
    /// Goes straight to the transport: no bearer header and no interceptors,
    /// so a rejected refresh can never trigger another refresh. Nothing is
    /// persisted here.
    pub async fn exchange_refresh_token(&self, refresh_token: &str) -> ApiResult<String> {
        let request = ApiRequest::post(REFRESH_PATH)
            .with_body(serde_json::json!({ "refreshToken": refresh_token }))
            .without_refresh();

        let response = self.transport.send(&request, None).await?;
        let response = into_result(&request, response)?;
        let parsed: RefreshResponse = decode(&request.path, &response)?;

        parsed.into_access_token().ok_or_else(|| ApiError::Decode {
            path: request.path.clone(),
            reason: "missing tokens.accessToken".to_string(),
        })
    }

    /// Outbound interceptor plus transport call.
    async fn dispatch(&self, call: &PendingCall) -> ApiResult<ApiResponse> {
        let bearer = self.tokens.access_token()?;

        debug!(
            method = %call.request.method,
            path = %call.request.path,
            attempt = ?call.attempt,
            authenticated = bearer.is_some(),
            "Sending request"
        );

        let response = self
            .transport
            .send(&call.request, bearer.as_deref())
            .await?;

        debug!(
            path = %call.request.path,
            status = response.status,
            "Received response"
        );
        Ok(response)
    }

    /// Refresh after a 401. Returns true if the request should be re-issued.
    async fn refresh_after_unauthorized(&self) -> bool {
        let refresh_token = match self.tokens.refresh_token() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("Unauthorized and no refresh token persisted");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "Could not read refresh token");
                self.expire_session();
                return false;
            }
        };

        let refreshed = match self.exchange_refresh_token(&refresh_token).await {
            Ok(access_token) => self
                .tokens
                .set_access_token(&access_token)
                .map_err(ApiError::from),
            Err(e) => Err(e),
        };

        match refreshed {
            Ok(()) => {
                info!("Access token refreshed");
                true
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed, clearing session");
                self.expire_session();
                false
            }
        }
    }

    fn expire_session(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!(error = %e, "Failed to clear persisted tokens");
        }
        if let Some(hook) = self.session_expired.lock().as_ref() {
            hook();
        }
    }
}

/// Attach `body` as JSON, mapping encoding failures into [`ApiError::Encode`].
pub(crate) fn with_json<B: Serialize + ?Sized>(
    request: ApiRequest,
    body: &B,
) -> ApiResult<ApiRequest> {
    let path = request.path.clone();
    request.with_json(body).map_err(|e| ApiError::Encode {
        path,
        reason: e.to_string(),
    })
}

fn into_result(request: &ApiRequest, response: ApiResponse) -> ApiResult<ApiResponse> {
    if response.is_success() {
        return Ok(response);
    }
    debug!(
        method = %request.method,
        path = %request.path,
        status = response.status,
        "Request failed"
    );
    Err(status_error(response))
}

fn status_error(response: ApiResponse) -> ApiError {
    ApiError::Status {
        status: response.status,
        body: ErrorBody::parse(response.body),
    }
}

fn decode<T: DeserializeOwned>(path: &str, response: &ApiResponse) -> ApiResult<T> {
    response.json().map_err(|e| ApiError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })
}
