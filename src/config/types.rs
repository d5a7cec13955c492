// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub mail: MailConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Verbose diagnostics (account addresses in failure logs, header counts)
    pub debug: bool,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
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

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    /// Seconds to wait for request headers; 0 disables
    pub read_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Mail collaborator configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    /// IMAP host used when a domain has no explicit entry; `{domain}` is substituted
    pub host_template: String,
    pub default_port: u16,
    pub mailbox: String,
    pub count: CountMode,
    pub timeout_secs: u64,
    /// Per-domain overrides, keyed by lower-case domain
    #[serde(default)]
    pub servers: HashMap<String, ImapServer>,
}

/// Which STATUS counter is reported as `emailCount`
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CountMode {
    /// Every message in the mailbox (MESSAGES)
    #[default]
    All,
    /// Messages without the \Seen flag (UNSEEN)
    Unseen,
}

/// Explicit IMAP endpoint for a mail domain
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ImapServer {
    pub host: String,
    #[serde(default = "default_imap_port")]
    pub port: u16,
    /// Log in with the part before `@` instead of the full address
    #[serde(default)]
    pub local_part_login: bool,
}

#[allow(clippy::missing_const_for_fn)]
fn default_imap_port() -> u16 {
    993
}
