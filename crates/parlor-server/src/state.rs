//! Shared application state.

use std::future::Future;
use std::sync::Arc;

use parlor_kernel::{ModuleRegistry, SupervisorError, SupervisorHandle};

use crate::config::ServerConfig;
use crate::error::AppError;

/// State shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub supervisor: SupervisorHandle,
    pub registry: Arc<ModuleRegistry>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Awaits a supervisor ask under the configured timeout.
    ///
    /// On timeout the handler answers 5xx but the supervisor still
    /// processes the command; its reply is simply discarded when it
    /// arrives.
    pub async fn ask<T>(
        &self,
        fut: impl Future<Output = Result<T, SupervisorError>>,
    ) -> Result<T, AppError> {
        match tokio::time::timeout(self.config.ask_timeout, fut).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => Err(AppError::Timeout),
        }
    }
}
