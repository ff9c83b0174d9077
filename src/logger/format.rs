//! Access log formatting
//!
//! Two formats are supported:
//! - `combined` (Apache/Nginx combined log format)
//! - `json` (one JSON object per line)

use chrono::Local;

/// Everything recorded about one handled request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client socket address
    pub remote_addr: String,
    /// Time the request was received
    pub time: chrono::DateTime<Local>,
    /// HTTP method
    pub method: String,
    /// Request path
    pub path: String,
    /// Query string without the leading `?`
    pub query: Option<String>,
    /// HTTP version ("1.0", "1.1")
    pub http_version: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
    /// Referer header
    pub referer: Option<String>,
    /// User-Agent header
    pub user_agent: Option<String>,
    /// Time spent handling the request, in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Render the entry in the configured format
    ///
    /// Unknown format names fall back to `combined`.
    pub fn format(&self, format: &str) -> String {
        match format {
            "json" => self.format_json(),
            _ => self.format_combined(),
        }
    }

    fn request_line(&self) -> String {
        let query = self
            .query
            .as_ref()
            .map(|q| format!("?{q}"))
            .unwrap_or_default();
        format!(
            "{} {}{} HTTP/{}",
            self.method, self.path, query, self.http_version
        )
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes "$referer" "$user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {} \"{}\" \"{}\"",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.request_line(),
            self.status,
            self.body_bytes,
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "127.0.0.1:52110".to_string(),
            "GET".to_string(),
            "/pong".to_string(),
        );
        entry.status = 200;
        entry.body_bytes = 2048;
        entry.user_agent = Some("Mozilla/5.0".to_string());
        entry.request_time_us = 850;
        entry
    }

    #[test]
    fn test_combined_format() {
        let line = sample_entry().format("combined");
        assert!(line.contains("127.0.0.1:52110"));
        assert!(line.contains("\"GET /pong HTTP/1.1\""));
        assert!(line.contains("200 2048"));
        assert!(line.contains("\"Mozilla/5.0\""));
    }

    #[test]
    fn test_combined_includes_query() {
        let mut entry = sample_entry();
        entry.query = Some("v=2".to_string());
        let line = entry.format("combined");
        assert!(line.contains("GET /pong?v=2 HTTP/1.1"));
    }

    #[test]
    fn test_json_format() {
        let line = sample_entry().format("json");
        let parsed: serde_json::Value = serde_json::from_str(&line).expect("valid JSON");
        assert_eq!(parsed["method"], "GET");
        assert_eq!(parsed["path"], "/pong");
        assert_eq!(parsed["status"], 200);
        assert_eq!(parsed["body_bytes"], 2048);
        assert!(parsed["query"].is_null());
    }

    #[test]
    fn test_unknown_format_falls_back() {
        let entry = sample_entry();
        assert_eq!(entry.format("unknown"), entry.format("combined"));
    }
}
