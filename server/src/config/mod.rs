//! Configuration management for the worksheets proxy
//!
//! Configuration is stored in RON format and covers the HTTP listener, the
//! upstream PHP content API and catalog presentation defaults. A handful of
//! environment variables override file values at startup.

pub mod loader;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;
use worksheet_catalog::PLACEHOLDER_THUMBNAIL;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub server: Server,

    #[serde(default)]
    pub upstream: Upstream,

    #[serde(default)]
    pub catalog: Catalog,
}

impl Config {
    /// Validate every section
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.upstream.validate()
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Server {
    /// Socket address to bind (e.g., "0.0.0.0:8000")
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Origins allowed by CORS. Empty means any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            allowed_origins: Vec::new(),
        }
    }
}

impl Server {
    fn validate(&self) -> Result<(), String> {
        if self.listen_addr.trim().is_empty() {
            return Err("Listen address cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Upstream content API settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Upstream {
    /// Base URL of the PHP backend, without a trailing path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Default for Upstream {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Upstream {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn validate(&self) -> Result<(), String> {
        validate_base_url(&self.base_url)?;

        if self.timeout_ms == 0 {
            return Err("Upstream timeout must be greater than zero".to_string());
        }

        self.endpoints.validate()
    }
}

/// Paths of the upstream endpoints, relative to `base_url`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Endpoints {
    pub worksheets: String,
    pub subjects: String,
    pub subtopics: String,
    pub send_email: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            worksheets: "/Worksheets/api/getWorksheet.php".to_string(),
            subjects: "/Subjects/api/get_subjects.php".to_string(),
            subtopics: "/Subjects/Subtopics/api/get_subtopics.php".to_string(),
            send_email: "/Worksheets/api/send-email.php".to_string(),
        }
    }
}

impl Endpoints {
    fn validate(&self) -> Result<(), String> {
        for (name, path) in [
            ("worksheets", &self.worksheets),
            ("subjects", &self.subjects),
            ("subtopics", &self.subtopics),
            ("send_email", &self.send_email),
        ] {
            if !path.starts_with('/') {
                return Err(format!(
                    "Endpoint '{}' must start with '/', got '{}'",
                    name, path
                ));
            }
        }
        Ok(())
    }
}

/// Catalog presentation defaults
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Catalog {
    /// Thumbnail substituted for worksheets that have none
    #[serde(default = "default_placeholder_thumbnail")]
    pub placeholder_thumbnail: String,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            placeholder_thumbnail: default_placeholder_thumbnail(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_base_url() -> String {
    "https://worksheets.asvabwarriors.org".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_placeholder_thumbnail() -> String {
    PLACEHOLDER_THUMBNAIL.to_string()
}

/// Base URL must be an absolute http(s) URL
fn validate_base_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw)
        .map_err(|err| format!("Invalid upstream base URL '{}': {}", raw, err))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!(
            "Upstream base URL '{}' must use http or https, not '{}'",
            raw, scheme
        )),
    }
}
