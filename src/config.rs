//! Configuration handling
//!
//! Settings are read once at start-up: the JSON config file (if any), then
//! environment overrides, then built-in fallbacks for anything left unset.

use crate::state::FormDefaults;
use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://webpagebackend.onrender.com";
pub const DEFAULT_EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";
pub const DEFAULT_CONTACT_EMAIL: &str = "hello@lunalabs.com";
pub const DEFAULT_SUBJECT: &str = "General inquiry";
pub const DEFAULT_PAGE_URL: &str = "https://lunalabs.com/#contact";

/// Which delivery channel submissions go through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryChannel {
    /// POST to `<base_url>/api/email/submit`
    #[default]
    Http,
    /// EmailJS transactional email API
    EmailJs,
}

impl FromStr for DeliveryChannel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "emailjs" => Ok(Self::EmailJs),
            other => bail!("unknown delivery channel {other:?} (expected \"http\" or \"emailjs\")"),
        }
    }
}

/// EmailJS identifiers. Empty values are passed through and rejected remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailJsConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub endpoint: String,
}

impl Default for EmailJsConfig {
    fn default() -> Self {
        Self {
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            endpoint: DEFAULT_EMAILJS_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub channel: DeliveryChannel,
    /// Backend base URL for the HTTP channel
    pub base_url: String,
    pub emailjs: EmailJsConfig,
    /// Human fallback shown with every failure
    pub contact_email: String,
    pub default_subject: String,
    /// Reported as `currentUrl` with each submission
    pub page_url: String,
    /// Ask the channel to acknowledge successful submissions
    pub auto_reply: bool,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            channel: DeliveryChannel::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            emailjs: EmailJsConfig::default(),
            contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
            default_subject: DEFAULT_SUBJECT.to_string(),
            page_url: DEFAULT_PAGE_URL.to_string(),
            auto_reply: false,
            request_timeout_secs: 15,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("LUNALAB_CONTACT_CONFIG") {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("com", "lunalabs", "lunalab-contact")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Log file under the platform's local data dir. The terminal belongs to
    /// the UI, so logs never go to stderr.
    pub fn log_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "lunalabs", "lunalab-contact")
            .map(|dirs| dirs.data_local_dir().join("lunalab-contact.log"))
    }

    /// Load configuration from the config file and the process environment
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(Self::config_path().as_deref())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from a JSON file; a missing file yields defaults
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                let config: AppConfig = serde_json::from_str(&content)
                    .with_context(|| format!("Invalid config {}", path.display()))?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(channel) = lookup("LUNALAB_CONTACT_CHANNEL") {
            self.channel = channel.parse()?;
        }
        if let Some(base_url) = lookup("LUNALAB_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(email) = lookup("LUNALAB_CONTACT_EMAIL") {
            self.contact_email = email;
        }
        if let Some(page_url) = lookup("LUNALAB_PAGE_URL") {
            self.page_url = page_url;
        }
        if let Some(id) = lookup("EMAILJS_SERVICE_ID") {
            self.emailjs.service_id = id;
        }
        if let Some(id) = lookup("EMAILJS_TEMPLATE_ID") {
            self.emailjs.template_id = id;
        }
        if let Some(key) = lookup("EMAILJS_PUBLIC_KEY") {
            self.emailjs.public_key = key;
        }
        if let Some(endpoint) = lookup("EMAILJS_ENDPOINT") {
            self.emailjs.endpoint = endpoint;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Values the contact form returns to after each reset
    pub fn form_defaults(&self) -> FormDefaults {
        FormDefaults {
            subject: self.default_subject.clone(),
            current_url: self.page_url.clone(),
        }
    }
}
