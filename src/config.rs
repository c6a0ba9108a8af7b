//! Application configuration loaded from environment variables.

use std::path::PathBuf;

/// Runtime configuration for the service.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Number of news items shown on the home listing (from GAZETTE_NEWS_PAGE_SIZE)
    pub news_page_size: usize,
    /// Port for the HTTP API (from GAZETTE_PORT; CLI flag takes precedence)
    pub port: u16,
    /// Database file (from GAZETTE_DB); `None` means the platform data directory
    pub db_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let news_page_size = std::env::var("GAZETTE_NEWS_PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(10);

        let port = std::env::var("GAZETTE_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3000);

        let db_path = std::env::var_os("GAZETTE_DB").map(PathBuf::from);

        Self {
            news_page_size,
            port,
            db_path,
        }
    }

    /// Create a config with pinned defaults (for testing).
    pub fn for_tests() -> Self {
        Self {
            news_page_size: 10,
            port: 3000,
            db_path: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
