// src/handlers/auth.rs

use crate::{
    api::AuthApi,
    error::AppError,
    handlers::{Notice, Page},
    routes::Route,
    session::{AdminSession, Session, SessionStore, StudentSession},
};

const ADMIN_ROLE: &str = "admin";

/// Display name used when the profile has none: the e-mail local part.
fn fallback_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

/// Exchanges credentials for a token and stores the resulting session.
///
/// Any previous session is dropped first, so a failed login leaves the
/// user signed out. Admins land on the admin dashboard, everyone else on
/// the student dashboard.
pub async fn login<A>(
    api: &A,
    store: &dyn SessionStore,
    email: &str,
    password: &str,
) -> Page<(Route, Notice)>
where
    A: AuthApi + ?Sized,
{
    if let Err(e) = store.clear() {
        tracing::warn!("Failed to clear previous session: {}", e);
    }

    match sign_in(api, store, email, password).await {
        Ok(landing) => {
            tracing::info!("Logged in as {}", email);
            Page::Ready(landing)
        }
        Err(e) => {
            tracing::warn!("Login failed for {}: {}", email, e);
            Page::Failed {
                notice: Notice::error(e.user_message("Invalid credentials")),
                back: None,
            }
        }
    }
}

async fn sign_in<A>(
    api: &A,
    store: &dyn SessionStore,
    email: &str,
    password: &str,
) -> Result<(Route, Notice), AppError>
where
    A: AuthApi + ?Sized,
{
    let token = api.request_token(email, password).await?;
    let notice = Notice::success(
        token
            .message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "Login Successful!".to_string()),
    );

    if token.role == ADMIN_ROLE {
        store.save(&Session::Admin(AdminSession {
            access_token: token.access_token,
        }))?;
        return Ok((Route::AdminDashboard, notice));
    }

    let full_name = match api.profile(&token.access_token).await {
        Ok(profile) => profile.full_name.filter(|n| !n.trim().is_empty()),
        Err(e) => {
            tracing::warn!("Profile lookup failed, using e-mail for display name: {}", e);
            None
        }
    }
    .unwrap_or_else(|| fallback_name(email));

    store.save(&Session::Student(StudentSession {
        email: email.to_string(),
        full_name,
        role: token.role,
        access_token: token.access_token,
    }))?;
    Ok((Route::StudentDashboard, notice))
}

/// Best-effort server logout followed by clearing the local session.
pub async fn logout<A>(api: &A, store: &dyn SessionStore) -> Page<Route>
where
    A: AuthApi + ?Sized,
{
    if let Err(e) = api.logout().await {
        tracing::warn!("Server logout failed: {}", e);
    }
    if let Err(e) = store.clear() {
        tracing::error!("Failed to clear session: {}", e);
    }
    Page::Redirect {
        to: Route::Login,
        notice: Notice::info("You have been logged out."),
    }
}
