// src/api/auth.rs

use async_trait::async_trait;
use reqwest::{Method, header};
use serde::{Deserialize, Serialize};

use super::{ApiClient, handle_api_response, message_from_body};
use crate::{error::AppError, routes};

/// Response of `POST /api/auth/token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Sign-in endpoints. These bypass the stored session on purpose.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn request_token(&self, email: &str, password: &str) -> Result<TokenResponse, AppError>;

    async fn profile(&self, access_token: &str) -> Result<Profile, AppError>;

    async fn logout(&self) -> Result<(), AppError>;
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn request_token(&self, email: &str, password: &str) -> Result<TokenResponse, AppError> {
        let url = routes::login().resolve(self.base_url())?;
        let response = self
            .http
            .post(url)
            .header(header::ACCEPT, "application/json")
            .form(&[("username", email), ("password", password)])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return handle_api_response(response).await;
        }

        // Bad credentials come back as 401 too; that is not an expired session.
        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            "Invalid credentials".to_string()
        } else {
            message_from_body(status, &body)
        };
        tracing::warn!("Login rejected ({}): {}", status, message);
        Err(AppError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn profile(&self, access_token: &str) -> Result<Profile, AppError> {
        let url = routes::profile().resolve(self.base_url())?;
        let response = self.http.get(url).bearer_auth(access_token).send().await?;
        handle_api_response(response).await
    }

    async fn logout(&self) -> Result<(), AppError> {
        self.send_empty(Method::POST, &routes::logout()).await
    }
}
