//! Login and logout handlers.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;

use super::{resume_context, save_context, stored_context};
use crate::errors::AppError;
use crate::ui;
use crate::AppState;

/// Form body posted by the login page.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /login - Check credentials and enter the dashboard.
///
/// A rejected attempt without a session renders the login page directly, so failed
/// logins never create session records.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let stored = stored_context(&session).await?;
    let existing = stored.is_some();
    let mut ctx = resume_context(stored, &state.store).await;

    match ctx.login(state.credentials.as_ref(), &form.username, &form.password) {
        Ok(()) => {
            // New id on privilege change.
            session.cycle_id().await?;
            tracing::info!("User {} logged in", form.username);
        }
        Err(e) => {
            tracing::info!("Login rejected for {:?}: {}", form.username, e);
            if !existing {
                let flash = ctx.take_message();
                let page = ui::render(&ctx, flash.as_ref(), state.credentials.as_ref());
                return Ok(Html(page).into_response());
            }
        }
    }

    save_context(&session, &ctx).await?;
    Ok(Redirect::to("/").into_response())
}

/// POST /logout - Drop the session and return to the login page.
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    if let Some(mut ctx) = stored_context(&session).await? {
        if let Some(username) = &ctx.username {
            tracing::info!("User {} logged out", username);
        }
        ctx.logout();
    }
    session.flush().await?;
    Ok(Redirect::to("/"))
}
