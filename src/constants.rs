//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default base URL of the platform REST API
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Environment variable that overrides the API base URL
pub const API_URL_ENV: &str = "TUBETUI_API_URL";

/// Config directory under the user's home
pub const CONFIG_DIR: &str = ".tubetui";

/// File inside the config directory holding the session token
pub const TOKEN_FILE: &str = "token";

/// Application name
#[allow(dead_code)]
pub const APP_NAME: &str = "TubeTUI";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Categories offered by the home filter bar ("All" means no filter)
pub const FILTER_CATEGORIES: &[&str] = &[
    "All",
    "React",
    "JavaScript",
    "Node.js",
    "MongoDB",
    "Gaming",
    "Music",
    "News",
    "Education",
    "Sports",
    "Entertainment",
    "Technology",
    "General",
];

/// Categories selectable when uploading a video
pub const UPLOAD_CATEGORIES: &[&str] = &[
    "General",
    "Music",
    "Gaming",
    "News",
    "Education",
    "Sports",
    "Entertainment",
    "Technology",
    "React",
    "JavaScript",
    "Node.js",
    "MongoDB",
];
