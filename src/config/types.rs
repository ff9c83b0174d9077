// Configuration types
// All sections of config.toml and their defaults where serde provides them

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Development-style debug flag: logs request headers when set
    pub debug: bool,
    pub workers: Option<usize>,
}

/// Site content configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Directory served under /static/
    pub static_dir: String,
    /// Title rendered into the page template
    pub title: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format: `combined` or `json`
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (stderr if not set)
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

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Auxiliary route configuration
///
/// The page routes themselves are fixed at compile time (see
/// `handler::pages`); this only covers favicon aliases and health probes.
#[derive(Debug, Deserialize, Clone)]
pub struct RoutesConfig {
    #[serde(default = "default_favicon_paths")]
    pub favicon_paths: Vec<String>,
    #[serde(default)]
    pub health: HealthConfig,
}

fn default_favicon_paths() -> Vec<String> {
    vec!["/favicon.ico".to_string(), "/favicon.svg".to_string()]
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            favicon_paths: default_favicon_paths(),
            health: HealthConfig::default(),
        }
    }
}

/// Health probe configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HealthConfig {
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

fn default_health_enabled() -> bool {
    true
}

fn default_healthz_path() -> String {
    "/healthz".to_string()
}

fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}
