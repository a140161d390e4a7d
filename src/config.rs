// src/config.rs

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;
use url::Url;

use crate::error::AppError;

/// Delay between a detected security violation and the forced logout.
pub const VIOLATION_GRACE_PERIOD: Duration = Duration::from_secs(3);

/// Detectors stay quiet this long after a fullscreen request.
pub const FULLSCREEN_REQUEST_WINDOW: Duration = Duration::from_secs(3);

/// Detectors stay quiet this long after leaving fullscreen.
pub const FULLSCREEN_EXIT_WINDOW: Duration = Duration::from_millis(1500);

/// Pointer, focus and resize detection only run for this long after arming.
pub const EXTENSION_WATCH_WINDOW: Duration = Duration::from_secs(30);

/// Height of the browser toolbar band (px).
pub const TOOLBAR_BAND_PX: f64 = 70.0;

/// Extension icon area: top band height and right-edge width (px).
pub const EXTENSION_AREA_HEIGHT_PX: f64 = 50.0;
pub const EXTENSION_AREA_WIDTH_PX: f64 = 150.0;

/// Window size change (px, either axis) treated as an extension popup.
pub const RESIZE_THRESHOLD_PX: u32 = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub session_file: PathBuf,
    pub rust_log: String,
    pub log_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let api_base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        let api_base_url = Url::parse(&api_base_url)?;

        let session_file = env::var("SESSION_FILE")
            .unwrap_or_else(|_| ".lms-session.json".to_string())
            .into();

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let log_dir = env::var("LOG_DIR")
            .unwrap_or_else(|_| "logs".to_string())
            .into();

        Ok(Self {
            api_base_url,
            session_file,
            rust_log,
            log_dir,
        })
    }
}
