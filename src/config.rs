//! Configuration file handling for contactmail.

use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;

/// Contactmail configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_http_port")]
    pub http_port: u16,
    pub smtp_host: String,
    #[serde(default = "Config::default_smtp_port")]
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    /// Address mails are sent from. Defaults to `smtp_user`.
    from_address: Option<String>,
    /// Address receiving the operator notification for each submission.
    pub operator_address: String,
    #[serde(default = "Config::default_site_name")]
    pub site_name: String,
    /// Upper bound for a single SMTP delivery attempt.
    #[serde(default = "Config::default_send_timeout_seconds")]
    pub send_timeout_seconds: u64,
    /// Extra literal terms appended to the built-in spam blocklist.
    #[serde(default, deserialize_with = "deserialize_sequence")]
    pub extra_spam_terms: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ConfigWrapper {
    // The whole actual config is under `params` section.
    pub params: Config,
}

/// Custom deserializer to parse space-separated strings into [`Vec<String>`].
fn deserialize_sequence<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Deserialize::deserialize(deserializer)?;
    Ok(match s {
        Some(v) => v
            .split(' ')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        None => Vec::new(),
    })
}

impl Config {
    /// Load configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, crate::error::Error> {
        let content = std::fs::read_to_string(path)?;
        let wrapped_config: ConfigWrapper = serini::from_str(&content)?;
        Ok(wrapped_config.params)
    }

    /// Get the sender address, defaulting to the SMTP user.
    pub fn from_address(&self) -> &str {
        match &self.from_address {
            Some(addr) => addr,
            None => &self.smtp_user,
        }
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_seconds)
    }

    // Following are needed since serde does not support default literals.

    const fn default_http_port() -> u16 {
        8080
    }
    const fn default_smtp_port() -> u16 {
        465
    }
    fn default_site_name() -> String {
        "contactmail".to_string()
    }
    const fn default_send_timeout_seconds() -> u64 {
        30
    }
}
