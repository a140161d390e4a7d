// src/state.rs

use std::sync::Arc;

use crate::{
    api::ApiClient,
    config::Config,
    error::AppError,
    session::{FileSessionStore, SessionStore},
};

/// Everything a front-end needs to drive the workflows.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: Arc<dyn SessionStore>,
    pub client: ApiClient,
}

impl AppState {
    /// Session persisted in `config.session_file`.
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(config.session_file.clone()));
        Self::with_session(config, session)
    }

    pub fn with_session(config: Config, session: Arc<dyn SessionStore>) -> Result<Self, AppError> {
        let client = ApiClient::new(config.api_base_url.clone(), session.clone())?;
        Ok(Self {
            config,
            session,
            client,
        })
    }
}
