// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub redirects: RedirectsConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Site layout configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Directory holding the HTML page templates
    pub docs_root: String,
    /// Directory the raw API reference files are served from
    pub api_root: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Legacy-path redirect configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RedirectsConfig {
    #[serde(default = "default_redirect_rules")]
    pub rules: Vec<RedirectRule>,
}

/// A single redirect rule. The pattern is a regular expression matched at
/// the start of the request path; the replacement may reference capture
/// groups as `$1`, `$2`, ...
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RedirectRule {
    pub pattern: String,
    pub replacement: String,
}

// API reference paths that moved when the module layout of the documented
// packages changed. Kept in serving order.
fn default_redirect_rules() -> Vec<RedirectRule> {
    vec![
        RedirectRule {
            pattern: "/api/([^/]*)/lit_html".to_string(),
            replacement: "/api/$1/_lit_html_".to_string(),
        },
        RedirectRule {
            pattern: "/api/([^/]*)/shady_render".to_string(),
            replacement: "/api/$1/_lib_shady_render_".to_string(),
        },
    ]
}

impl Default for RedirectsConfig {
    fn default() -> Self {
        Self {
            rules: default_redirect_rules(),
        }
    }
}
