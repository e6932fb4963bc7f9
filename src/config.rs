//! Configuration handling for the client

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default backend address
pub const DEFAULT_API_URL: &str = "http://localhost:3030";

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// Environment override for the backend address
const API_URL_ENV: &str = "ONCALL_API_URL";

/// User configuration for the client
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    /// Backend base URL
    pub api_url: Option<String>,
    /// Path prefix the backend is mounted under
    pub path_prefix: Option<String>,
    /// Where to go after logging out
    pub logout_url: Option<String>,
    /// Records per page
    pub page_size: Option<u32>,
    /// Show favorites first in lists
    pub favorites_first: Option<bool>,
    /// Service new heartbeat monitors are attached to
    pub heartbeat_service_id: Option<String>,
}

impl ClientConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "oncall", "oncall-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: ClientConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Backend URL: environment, then file, then default
    pub fn api_url(&self) -> String {
        std::env::var(API_URL_ENV)
            .ok()
            .filter(|url| !url.is_empty())
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn path_prefix(&self) -> &str {
        self.path_prefix
            .as_deref()
            .unwrap_or("")
            .trim_end_matches('/')
    }

    pub fn logout_url(&self) -> String {
        self.logout_url
            .clone()
            .unwrap_or_else(|| format!("{}/", self.path_prefix()))
    }

    pub fn page_size(&self) -> u32 {
        match self.page_size {
            Some(0) | None => DEFAULT_PAGE_SIZE,
            Some(n) => n,
        }
    }

    pub fn favorites_first(&self) -> bool {
        self.favorites_first.unwrap_or(true)
    }
}
