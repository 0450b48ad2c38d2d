//! HTTP handlers for the dashboard.
//!
//! Every state-changing handler loads the session context, applies one operation,
//! stores the context, and redirects to `/` so the browser re-renders.

mod activity;
mod auth;
mod dashboard;

pub use activity::*;
pub use auth::*;
pub use dashboard::*;

use tower_sessions::Session;

use crate::db::ActivityStore;
use crate::errors::AppError;
use crate::session::SessionContext;

/// Read the stored context, if this request belongs to an existing session.
pub async fn stored_context(session: &Session) -> Result<Option<SessionContext>, AppError> {
    Ok(session.get::<SessionContext>(SessionContext::KEY).await?)
}

/// Resume a stored context with a fresh activity table, or start a new one.
pub async fn resume_context(
    stored: Option<SessionContext>,
    store: &ActivityStore,
) -> SessionContext {
    match stored {
        Some(mut ctx) => {
            ctx.refresh_activity(store).await;
            ctx
        }
        None => {
            tracing::debug!("New session, hydrating activity log");
            SessionContext::hydrate(store).await
        }
    }
}

/// Fetch this session's context, hydrating a new one from the activity log on first use.
pub async fn load_context(
    session: &Session,
    store: &ActivityStore,
) -> Result<SessionContext, AppError> {
    let stored = stored_context(session).await?;
    Ok(resume_context(stored, store).await)
}

/// Write the context back to the session store.
pub async fn save_context(session: &Session, ctx: &SessionContext) -> Result<(), AppError> {
    session.insert(SessionContext::KEY, ctx).await?;
    Ok(())
}
