//! Application configuration. Backend address, listen address, timeouts.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8501;

/// Polling cadence for document jobs: 100 polls * 8s.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 8;
pub const DEFAULT_MAX_POLLS: u32 = 100;

pub const DEFAULT_MAX_UPLOAD_MB: usize = 200;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    /// Backend base URL. Read from BACKEND_URL (or DIETICIAN_BACKEND_URL).
    #[serde(default)]
    pub backend_url: Option<String>,

    /// Bind address. Read from DIETICIAN_HOST.
    #[serde(default)]
    pub host: Option<String>,

    /// UI port. Read from DIETICIAN_PORT.
    #[serde(default)]
    pub port: Option<u16>,

    /// Seconds between job status polls. Read from DIETICIAN_POLL_INTERVAL_SECS.
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,

    /// Max status polls before giving up on a job. Read from DIETICIAN_MAX_POLLS.
    #[serde(default)]
    pub max_polls: Option<u32>,

    /// Upload body limit in MiB. Read from DIETICIAN_MAX_UPLOAD_MB.
    #[serde(default)]
    pub max_upload_mb: Option<usize>,

    /// Idle session lifetime. Read from DIETICIAN_SESSION_TTL_SECS.
    #[serde(default)]
    pub session_ttl_secs: Option<u64>,

    // ─────────────────────────────────────────────────────────────────────────
    // Backend call timeouts (seconds)
    // ─────────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub health_timeout_secs: Option<u64>,

    #[serde(default)]
    pub analysis_timeout_secs: Option<u64>,

    #[serde(default)]
    pub recommendation_timeout_secs: Option<u64>,

    #[serde(default)]
    pub extraction_timeout_secs: Option<u64>,

    #[serde(default)]
    pub job_timeout_secs: Option<u64>,

    #[serde(default)]
    pub status_timeout_secs: Option<u64>,

    #[serde(default)]
    pub guidelines_timeout_secs: Option<u64>,

    /// Serve canned responses instead of calling the backend. Read from DIETICIAN_MOCK_BACKEND.
    #[serde(default)]
    pub mock_backend: bool,
}

/// Per-endpoint request timeouts for the backend client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendTimeouts {
    pub health: Duration,
    pub analysis: Duration,
    pub recommendation: Duration,
    /// Menu-extraction hint sent through `/get-recommendations`.
    pub extraction: Duration,
    pub job: Duration,
    pub status: Duration,
    pub guidelines: Duration,
}

impl Default for BackendTimeouts {
    fn default() -> Self {
        Self {
            health: Duration::from_secs(5),
            analysis: Duration::from_secs(120),
            recommendation: Duration::from_secs(60),
            extraction: Duration::from_secs(30),
            job: Duration::from_secs(30),
            status: Duration::from_secs(10),
            guidelines: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    /// Loads `.env`, then the process environment and the optional DIETICIAN_CONFIG file.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Builds the config from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, config::ConfigError> {
        let mut c = config::Config::builder();
        if let Some(path) = vars.get("DIETICIAN_CONFIG") {
            c = c.add_source(config::File::with_name(path));
        }
        c = c.add_source(
            config::Environment::with_prefix("DIETICIAN")
                .try_parsing(true)
                .source(Some(vars.clone())),
        );
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // BACKEND_URL is read without prefix so the UI and backend can share one .env
        if let Some(url) = vars.get("BACKEND_URL") {
            if !url.trim().is_empty() {
                cfg.backend_url = Some(url.trim().to_string());
            }
        }
        Ok(cfg)
    }

    /// Backend base URL without a trailing slash.
    pub fn backend_url_or_default(&self) -> String {
        self.backend_url
            .as_deref()
            .unwrap_or(DEFAULT_BACKEND_URL)
            .trim_end_matches('/')
            .to_string()
    }

    /// Returns `host:port` to bind the UI on.
    pub fn bind_address(&self) -> String {
        format!(
            "{}:{}",
            self.host.as_deref().unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT)
        )
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS))
    }

    pub fn max_polls_or_default(&self) -> u32 {
        self.max_polls.unwrap_or(DEFAULT_MAX_POLLS).max(1)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.unwrap_or(DEFAULT_MAX_UPLOAD_MB) * 1024 * 1024
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs.unwrap_or(DEFAULT_SESSION_TTL_SECS))
    }

    /// Returns configured timeouts, falling back to the defaults per endpoint.
    pub fn timeouts(&self) -> BackendTimeouts {
        let d = BackendTimeouts::default();
        let secs = |v: Option<u64>, fallback: Duration| v.map(Duration::from_secs).unwrap_or(fallback);
        BackendTimeouts {
            health: secs(self.health_timeout_secs, d.health),
            analysis: secs(self.analysis_timeout_secs, d.analysis),
            recommendation: secs(self.recommendation_timeout_secs, d.recommendation),
            extraction: secs(self.extraction_timeout_secs, d.extraction),
            job: secs(self.job_timeout_secs, d.job),
            status: secs(self.status_timeout_secs, d.status),
            guidelines: secs(self.guidelines_timeout_secs, d.guidelines),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::from_vars(&HashMap::new()).unwrap();
        assert_eq!(cfg.backend_url_or_default(), "http://localhost:8000");
        assert_eq!(cfg.bind_address(), "0.0.0.0:8501");
        assert_eq!(cfg.poll_interval(), Duration::from_secs(8));
        assert_eq!(cfg.max_polls_or_default(), 100);
        assert_eq!(cfg.timeouts(), BackendTimeouts::default());
        assert!(!cfg.mock_backend);
    }

    #[test]
    fn test_env_overrides() {
        let cfg = AppConfig::from_vars(&vars(&[
            ("BACKEND_URL", "http://api.internal:9000/"),
            ("DIETICIAN_PORT", "9100"),
            ("DIETICIAN_MAX_POLLS", "3"),
            ("DIETICIAN_ANALYSIS_TIMEOUT_SECS", "5"),
            ("DIETICIAN_MOCK_BACKEND", "true"),
            ("UNRELATED", "x"),
        ]))
        .unwrap();
        assert_eq!(cfg.backend_url_or_default(), "http://api.internal:9000");
        assert_eq!(cfg.bind_address(), "0.0.0.0:9100");
        assert_eq!(cfg.max_polls_or_default(), 3);
        assert_eq!(cfg.timeouts().analysis, Duration::from_secs(5));
        assert_eq!(cfg.timeouts().status, Duration::from_secs(10));
        assert!(cfg.mock_backend);
    }

    #[test]
    fn test_extraction_timeout_is_separate_from_recommendations() {
        let defaults = AppConfig::from_vars(&HashMap::new()).unwrap().timeouts();
        assert_eq!(defaults.extraction, Duration::from_secs(30));
        assert_eq!(defaults.recommendation, Duration::from_secs(60));

        let cfg = AppConfig::from_vars(&vars(&[("DIETICIAN_EXTRACTION_TIMEOUT_SECS", "12")]))
            .unwrap();
        assert_eq!(cfg.timeouts().extraction, Duration::from_secs(12));
        assert_eq!(cfg.timeouts().recommendation, Duration::from_secs(60));
    }
}
