//! Configuration module for the StaffDesk dashboard.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the CSV activity log
    pub log_path: PathBuf,
    /// Directory where activity photos are written
    pub photos_dir: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Largest accepted upload request body, in bytes
    pub max_upload_bytes: usize,
    /// Minutes of inactivity before a session expires
    pub session_idle_minutes: i64,
    /// Mark the session cookie `Secure` (HTTPS only)
    pub cookie_secure: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let log_path = env::var("STAFFDESK_LOG_PATH")
            .unwrap_or_else(|_| "./data/activity_log.csv".to_string())
            .into();

        let photos_dir = env::var("STAFFDESK_PHOTOS_DIR")
            .unwrap_or_else(|_| "./data/photos".to_string())
            .into();

        let bind_addr = parse_var("STAFFDESK_BIND_ADDR", "127.0.0.1:8080")?;
        let log_level = env::var("STAFFDESK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let max_upload_bytes = parse_var("STAFFDESK_MAX_UPLOAD_BYTES", "10485760")?;
        let session_idle_minutes = parse_var("STAFFDESK_SESSION_IDLE_MINUTES", "480")?;
        let cookie_secure = parse_var("STAFFDESK_COOKIE_SECURE", "false")?;

        Ok(Self {
            log_path,
            photos_dir,
            bind_addr,
            log_level,
            max_upload_bytes,
            session_idle_minutes,
            cookie_secure,
        })
    }
}

fn parse_var<T: FromStr>(name: &str, default: &str) -> Result<T, AppError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .map_err(|_| AppError::Config(format!("Invalid {} value: {:?}", name, raw)))
}
