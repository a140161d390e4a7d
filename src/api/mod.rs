// src/api/mod.rs

pub mod admin;
pub mod auth;
pub mod student;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use url::Url;

use crate::{error::AppError, routes::ApiPath, session::SessionStore, utils::jwt};

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use student::StudentApi;

/// Shared HTTP client for the LMS REST API.
///
/// * Reads the current session from the injected store on every request
///   and attaches it as a bearer token.
/// * Normalizes HTTP 401 (and locally expired tokens) into `AppError::Unauthorized`.
/// * Turns other non-2xx responses into errors carrying the server's message.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(base_url: Url, session: Arc<dyn SessionStore>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds an authorized request for `path`.
    fn request(&self, method: Method, path: &ApiPath) -> Result<RequestBuilder, AppError> {
        let url = path.resolve(&self.base_url)?;
        let mut builder = self.http.request(method, url);

        let session = self.session.load()?;
        if let Some(token) = session.access_token() {
            if jwt::is_expired(token) {
                tracing::warn!("Stored access token has expired; not calling {}", path);
                return Err(AppError::Unauthorized);
            }
            builder = builder.bearer_auth(token);
        }

        Ok(builder)
    }

    /// Sends the request, mapping 401 to `Unauthorized` before anything else sees it.
    async fn fetch_with_auth(&self, builder: RequestBuilder, path: &ApiPath) -> Result<Response, AppError> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!("Request to {} failed: {}", path, e);
            AppError::Network(e)
        })?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("{} answered 401 Unauthorized", path);
            return Err(AppError::Unauthorized);
        }

        Ok(response)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &ApiPath) -> Result<T, AppError> {
        let builder = self.request(Method::GET, path)?;
        let response = self.fetch_with_auth(builder, path).await?;
        handle_api_response(response).await
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &ApiPath, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = self.request(method, path)?.json(body);
        let response = self.fetch_with_auth(builder, path).await?;
        handle_api_response(response).await
    }

    /// For calls whose response body we do not need (DELETE, logout).
    pub(crate) async fn send_empty(&self, method: Method, path: &ApiPath) -> Result<(), AppError> {
        let builder = self.request(method, path)?;
        let response = self.fetch_with_auth(builder, path).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_from_body(status, &body))
    }
}

/// Decodes a 2xx body as `T`; otherwise builds an error from the body.
pub(crate) async fn handle_api_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(error_from_body(status, &body));
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!("Unexpected response body ({}): {}", status, e);
        AppError::Decode(e)
    })
}

/// Extracts the human-readable message from an error body.
///
/// Order: `message`, then `detail`, then the JSON body itself, then the raw text.
pub(crate) fn message_from_body(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => match (json.get("message"), json.get("detail")) {
            (Some(Value::String(m)), _) if !m.is_empty() => m.clone(),
            (_, Some(Value::String(d))) if !d.is_empty() => d.clone(),
            (_, Some(detail)) if !detail.is_null() => detail.to_string(),
            _ => json.to_string(),
        },
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status.canonical_reason().unwrap_or("Request failed").to_string(),
    }
}

pub(crate) fn error_from_body(status: StatusCode, body: &str) -> AppError {
    let message = message_from_body(status, body);
    match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized,
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        _ => AppError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
