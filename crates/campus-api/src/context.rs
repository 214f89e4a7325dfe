//! Application context.
//!
//! Built once at the root of a program and passed by reference to every
//! view. It owns the only session and the only pipeline.

use crate::client::CampusApi;
use campus_auth::{
    HttpPipeline, HttpTransport, ReqwestTransport, SessionExpiredHook, SessionStore,
    TransportError,
};
use campus_config::{Config, CoreError, Paths};
use campus_storage::{StorageError, TokenStore};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Failure to assemble the context.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Session, pipeline and resource client wired together.
pub struct CampusContext {
    base_url: String,
    pipeline: Arc<HttpPipeline>,
    session: Arc<SessionStore>,
    api: CampusApi,
}

impl CampusContext {
    /// Build the context from configuration and resolve the persisted session.
    ///
    /// A failed refresh is logged; use [`CampusContext::bootstrap_with_hook`]
    /// to react to it.
    pub async fn bootstrap(config: &Config, paths: &Paths) -> BootstrapResult<Self> {
        Self::bootstrap_with_hook(
            config,
            paths,
            Box::new(|| warn!("Session expired, log in again")),
        )
        .await
    }

    /// Like [`CampusContext::bootstrap`], installing `on_session_expired`
    /// before the session is resolved.
    pub async fn bootstrap_with_hook(
        config: &Config,
        paths: &Paths,
        on_session_expired: SessionExpiredHook,
    ) -> BootstrapResult<Self> {
        let base_url = config.api_base_url()?;
        paths.ensure_dirs()?;

        let tokens = campus_storage::create_token_store(paths.session_file())?;
        let transport = Arc::new(ReqwestTransport::new(base_url.as_str())?);

        let context = Self::assemble(base_url, transport, tokens);
        context.pipeline.set_session_expired_hook(on_session_expired);
        context.session.initialize().await;

        info!(
            base_url = %context.base_url,
            state = context.session.state().as_str(),
            "Client context ready"
        );
        Ok(context)
    }

    /// Wire the parts without resolving the session.
    pub fn assemble(
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        tokens: TokenStore,
    ) -> Self {
        let pipeline = Arc::new(HttpPipeline::new(transport, tokens));
        let session = Arc::new(SessionStore::new(pipeline.clone()));
        let api = CampusApi::new(pipeline.clone());

        Self {
            base_url: base_url.into(),
            pipeline,
            session,
            api,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn api(&self) -> &CampusApi {
        &self.api
    }

    pub fn pipeline(&self) -> &Arc<HttpPipeline> {
        &self.pipeline
    }
}
