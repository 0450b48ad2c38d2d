//! Activity upload handler.

use axum::{
    extract::{Multipart, State},
    response::Redirect,
};
use tower_sessions::Session;

use super::{load_context, save_context};
use crate::errors::AppError;
use crate::models::{now_ist, CapturedImage};
use crate::AppState;

/// POST /activity - Store a photo and append an activity row.
///
/// A body that cannot be read (malformed or over the size limit) is reported as a
/// message on the dashboard, like any other failed submit.
pub async fn submit_activity(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let upload = read_upload(&mut multipart).await;

    let mut ctx = load_context(&session, &state.store).await?;
    match upload {
        Ok((description, image)) => {
            if let Err(e) = ctx
                .submit_activity(&state.store, &description, image, now_ist())
                .await
            {
                tracing::info!("Activity not saved: {}", e);
            }
        }
        Err(e) => {
            tracing::warn!("Unreadable activity upload: {}", e);
            ctx.reject_upload(&e);
        }
    }
    save_context(&session, &ctx).await?;

    Ok(Redirect::to("/"))
}

/// Pull the description and the (optional, non-empty) image out of the form body.
async fn read_upload(
    multipart: &mut Multipart,
) -> Result<(String, Option<CapturedImage>), AppError> {
    let mut description = String::new();
    let mut image: Option<CapturedImage> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("description") => description = field.text().await?,
            Some("image") => {
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    image = Some(
                        CapturedImage::new(bytes.to_vec()).with_content_type(content_type),
                    );
                }
            }
            _ => {}
        }
    }

    Ok((description, image))
}
