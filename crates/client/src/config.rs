//! Console configuration
//!
//! Values come from environment variables. The binaries load a `.env` file
//! with `dotenvy` before calling [`ConsoleConfig::from_env`].
//!
//! - `CORPOGRAFO_API_URL` (default: `https://127.0.0.1:5000`)
//! - `VERIFY_SSL` (default: `false`)
//! - `CORPOGRAFO_TIMEOUT_SECS` (default: `30`)
//! - `CORPOGRAFO_SCHEMA` (optional catalog path)
//! - `CORPOGRAFO_SESSION_FILE` (optional session file override)

use std::path::PathBuf;
use std::time::Duration;

use corpografo_core::{ConsoleError, ConsoleResult};

/// Default API root
pub const DEFAULT_API_URL: &str = "https://127.0.0.1:5000";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration of the console
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Root URL of the remote API
    pub api_url: String,

    /// Whether TLS certificates are verified
    pub verify_ssl: bool,

    /// Per-request timeout
    pub timeout: Duration,

    /// User catalog replacing the built-in one
    pub schema_path: Option<PathBuf>,

    /// Where the session is persisted (`None` keeps it in memory)
    pub session_file: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            verify_ssl: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            schema_path: None,
            session_file: default_session_file(),
        }
    }
}

impl ConsoleConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> ConsoleResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> ConsoleResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("CORPOGRAFO_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.api_url);
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConsoleError::InvalidConfig(format!(
                "CORPOGRAFO_API_URL must be an http(s) URL, found '{}'",
                api_url
            )));
        }

        let verify_ssl = match lookup("VERIFY_SSL") {
            Some(value) => parse_flag("VERIFY_SSL", &value)?,
            None => defaults.verify_ssl,
        };

        let timeout = match lookup("CORPOGRAFO_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    ConsoleError::InvalidConfig(format!(
                        "CORPOGRAFO_TIMEOUT_SECS must be a positive integer, found '{}'",
                        value
                    ))
                })?,
            None => defaults.timeout,
        };

        let schema_path = lookup("CORPOGRAFO_SCHEMA")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let session_file = lookup("CORPOGRAFO_SESSION_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or(defaults.session_file);

        Ok(Self {
            api_url,
            verify_ssl,
            timeout,
            schema_path,
            session_file,
        })
    }

    /// Full URL of an API path
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn parse_flag(key: &str, value: &str) -> ConsoleResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConsoleError::InvalidConfig(format!(
            "{} must be true or false, found '{}'",
            key, value
        ))),
    }
}

/// `~/.config/corpografo/session.json`
pub fn default_session_file() -> Option<PathBuf> {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"))?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("corpografo")
            .join("session.json"),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(!config.verify_ssl);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.schema_path, None);
    }

    #[test]
    fn test_overrides() {
        let config = ConsoleConfig::from_lookup(lookup(&[
            ("CORPOGRAFO_API_URL", "http://api.local:8080/"),
            ("VERIFY_SSL", "True"),
            ("CORPOGRAFO_TIMEOUT_SECS", "5"),
            ("CORPOGRAFO_SCHEMA", "/etc/corpografo/catalog.toml"),
            ("CORPOGRAFO_SESSION_FILE", "/tmp/session.json"),
        ]))
        .unwrap();
        assert!(config.verify_ssl);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.schema_path,
            Some(PathBuf::from("/etc/corpografo/catalog.toml"))
        );
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/session.json")));
        assert_eq!(config.url("corpus/3"), "http://api.local:8080/corpus/3");
    }

    #[test]
    fn test_invalid_values() {
        assert!(ConsoleConfig::from_lookup(lookup(&[("VERIFY_SSL", "maybe")])).is_err());
        assert!(ConsoleConfig::from_lookup(lookup(&[("CORPOGRAFO_TIMEOUT_SECS", "0")])).is_err());
        let err = ConsoleConfig::from_lookup(lookup(&[("CORPOGRAFO_API_URL", "ftp://x")]))
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_url_joining() {
        let config = ConsoleConfig::default();
        assert_eq!(config.url("/login"), "https://127.0.0.1:5000/login");
        assert_eq!(config.url("corpus"), "https://127.0.0.1:5000/corpus");
    }
}
