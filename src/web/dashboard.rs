//! Page rendering and sidebar navigation.

use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;

use super::{load_context, resume_context, save_context, stored_context};
use crate::errors::AppError;
use crate::models::Page;
use crate::ui;
use crate::AppState;

/// Form body posted by a sidebar button.
#[derive(Debug, Deserialize)]
pub struct NavigateForm {
    pub page: String,
}

/// GET / - Render the login page or the active dashboard page.
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let stored = stored_context(&session).await?;
    let existing = stored.is_some();
    let mut ctx = resume_context(stored, &state.store).await;
    let flash = ctx.take_message();

    // Anonymous visits stay cookieless; only a consumed message changes a stored session.
    if existing && flash.is_some() {
        save_context(&session, &ctx).await?;
    }

    Ok(Html(ui::render(
        &ctx,
        flash.as_ref(),
        state.credentials.as_ref(),
    )))
}

/// POST /navigate - Make a menu page active.
pub async fn navigate(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<NavigateForm>,
) -> Result<Redirect, AppError> {
    let page = Page::from_label(&form.page)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown page {:?}", form.page)))?;

    let mut ctx = load_context(&session, &state.store).await?;
    ctx.navigate(page);
    save_context(&session, &ctx).await?;

    tracing::debug!("Navigated to {}", page.label());
    Ok(Redirect::to("/"))
}
