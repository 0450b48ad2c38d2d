//! Per-session dashboard state and the operations that drive it.
//!
//! A [`SessionContext`] is loaded at the start of every request, mutated by exactly one
//! operation (login, logout, navigate or submit), and written back before the redirect
//! that re-renders the page. The activity table is not part of the stored payload; it is
//! re-read from the [`ActivityStore`] whenever a context is resumed.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::auth::CredentialVerifier;
use crate::db::ActivityStore;
use crate::errors::AppError;
use crate::models::{
    display_timestamp, photo_file_name, ActivityRecord, CapturedImage, FlashMessage, Page, Role,
};

pub const INVALID_CREDENTIALS: &str = "Invalid username or password";
pub const PICTURE_REQUIRED: &str = "Please take a picture before submitting.";
pub const DESCRIPTION_REQUIRED: &str = "Please provide a description for the activity.";
pub const UPLOAD_SUCCESS: &str = "Activity photo and log uploaded!";

/// Mutable state of one browser session.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionContext {
    pub logged_in: bool,
    pub username: Option<String>,
    pub role: Option<Role>,
    pub active_page: Page,
    pub pending_message: Option<FlashMessage>,
    #[serde(skip)]
    pub activity_log: Vec<ActivityRecord>,
}

impl SessionContext {
    /// Key under which the context is kept in the session store.
    pub const KEY: &'static str = "dashboard";

    /// Start a session from the persisted log, falling back to an empty table.
    pub async fn hydrate(store: &ActivityStore) -> Self {
        let mut ctx = Self::default();
        ctx.refresh_activity(store).await;
        ctx
    }

    /// Replace the in-memory table with the persisted log.
    pub async fn refresh_activity(&mut self, store: &ActivityStore) {
        match store.load().await {
            Ok(log) => self.activity_log = log,
            Err(e) => {
                tracing::warn!("Activity history unavailable: {}", e);
                self.activity_log.clear();
                self.pending_message = Some(FlashMessage::error(format!(
                    "Could not load activity log: {}",
                    e.message()
                )));
            }
        }
    }

    /// Check credentials and enter the dashboard on success.
    pub fn login(
        &mut self,
        verifier: &dyn CredentialVerifier,
        username: &str,
        password: &str,
    ) -> Result<(), AppError> {
        let Some(account) = verifier.verify(username, password) else {
            let err = AppError::Auth(INVALID_CREDENTIALS.to_string());
            self.pending_message = Some(err.flash());
            return Err(err);
        };

        self.logged_in = true;
        self.username = Some(account.username.to_string());
        self.role = Some(account.role);
        self.active_page = Page::Attendance;
        Ok(())
    }

    /// Return to the anonymous login state.
    pub fn logout(&mut self) {
        self.logged_in = false;
        self.username = None;
        self.role = None;
        self.active_page = Page::Login;
    }

    /// Switch the active page. Every menu page is reachable from every other page.
    pub fn navigate(&mut self, page: Page) {
        self.active_page = page;
    }

    /// Remove and return the message waiting for this render.
    pub fn take_message(&mut self) -> Option<FlashMessage> {
        self.pending_message.take()
    }

    /// Report an upload whose form body could not be read.
    pub fn reject_upload(&mut self, err: &AppError) {
        self.pending_message = Some(FlashMessage::error(format!(
            "Error saving activity: {}",
            err.message()
        )));
    }

    /// Validate the upload form, store the photo, and append one log row.
    ///
    /// The outcome is also left in `pending_message` for the next render.
    pub async fn submit_activity(
        &mut self,
        store: &ActivityStore,
        description: &str,
        image: Option<CapturedImage>,
        now: DateTime<FixedOffset>,
    ) -> Result<ActivityRecord, AppError> {
        let result = self.try_submit(store, description, image, now).await;

        self.pending_message = Some(match &result {
            Ok(_) => FlashMessage::success(UPLOAD_SUCCESS),
            Err(e) => e.flash(),
        });
        result
    }

    async fn try_submit(
        &mut self,
        store: &ActivityStore,
        description: &str,
        image: Option<CapturedImage>,
        now: DateTime<FixedOffset>,
    ) -> Result<ActivityRecord, AppError> {
        let username = match (&self.username, self.logged_in) {
            (Some(name), true) => name.clone(),
            _ => return Err(AppError::Unauthorized("Login required".to_string())),
        };

        let image = image
            .filter(|img| !img.bytes.is_empty())
            .ok_or_else(|| AppError::Validation(PICTURE_REQUIRED.to_string()))?;

        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::Validation(DESCRIPTION_REQUIRED.to_string()));
        }

        let file_name = photo_file_name(&username, &now);
        tracing::debug!(
            "Storing {} photo for {} ({:?})",
            file_name,
            username,
            image.content_type
        );
        let image_file = store.save_photo(&file_name, &image.bytes).await?;

        let record = ActivityRecord {
            username,
            timestamp: display_timestamp(&now),
            description: description.to_string(),
            image_file,
            latitude: None,
            longitude: None,
        };

        match store.append_and_reload(&record).await {
            Ok(log) => self.activity_log = log,
            Err(e) => {
                tracing::warn!(
                    "Photo {} saved but log append failed; file left in place",
                    record.image_file
                );
                return Err(e);
            }
        }

        tracing::info!("Activity logged for {} at {}", record.username, record.timestamp);
        Ok(record)
    }

    /// Rows visible to the current user, newest first.
    ///
    /// The admin sees every row; employees see their own.
    pub fn visible_activity(&self, limit: usize) -> Vec<&ActivityRecord> {
        let is_admin = self.role == Some(Role::Admin);
        self.activity_log
            .iter()
            .rev()
            .filter(|r| is_admin || self.username.as_deref() == Some(r.username.as_str()))
            .take(limit)
            .collect()
    }
}
