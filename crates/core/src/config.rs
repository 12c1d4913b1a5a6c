use serde::Deserialize;
use tracing::debug;

/// Root application configuration. Loaded from environment variables
/// with the prefix `MINI_CRM__` and an optional TOML config file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

// ─── Gemini Config ──────────────────────────────────────────────────────
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,
    /// Without a key every generation request takes the fallback path.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_gemini_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent"
        .to_string()
}
fn default_gemini_timeout_ms() -> u64 { 15_000 }

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_gemini_endpoint(),
            api_key: None,
            timeout_ms: default_gemini_timeout_ms(),
        }
    }
}

// ─── Segmentation Config ────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    /// Bounded pseudo-random estimate, no customer data involved.
    #[default]
    Mock,
    /// Count matches against the seeded customer records.
    Predicate,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SegmentationConfig {
    #[serde(default)]
    pub estimator: EstimatorKind,
}

// ─── Store Config ───────────────────────────────────────────────────────
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
    #[serde(default)]
    pub simulated_latency_ms: u64,
}

fn default_seed_demo_data() -> bool { true }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: default_seed_demo_data(),
            simulated_latency_ms: 0,
        }
    }
}

// ─── Auth Config ────────────────────────────────────────────────────────
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_avatar_base_url")]
    pub avatar_base_url: String,
    #[serde(default = "default_avatar_background")]
    pub avatar_background: String,
    #[serde(default = "default_avatar_color")]
    pub avatar_color: String,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
}

fn default_avatar_base_url() -> String { "https://ui-avatars.com/api/".to_string() }
fn default_avatar_background() -> String { "4F46E5".to_string() }
fn default_avatar_color() -> String { "fff".to_string() }
fn default_session_ttl_hours() -> i64 { 24 }

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            avatar_base_url: default_avatar_base_url(),
            avatar_background: default_avatar_background(),
            avatar_color: default_avatar_color(),
            session_ttl_hours: default_session_ttl_hours(),
        }
    }
}

// Default functions
fn default_node_id() -> String {
    "node-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_enabled() -> bool {
    true
}
fn default_metrics_port() -> u16 {
    9091
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            port: default_metrics_port(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            gemini: GeminiConfig::default(),
            segmentation: SegmentationConfig::default(),
            store: StoreConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables only.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an optional TOML file, then environment
    /// variables. Environment values win.
    pub fn load_from(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            debug!(path, "Loading config file");
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        let builder = builder.add_source(
            config::Environment::with_prefix("MINI_CRM")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.http_port, 8080);
        assert_eq!(config.segmentation.estimator, EstimatorKind::Mock);
        assert!(config.gemini.api_key.is_none());
        assert!(config.gemini.endpoint.ends_with(":generateContent"));
        assert!(config.store.seed_demo_data);
        assert_eq!(config.auth.avatar_background, "4F46E5");
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "segmentation": { "estimator": "predicate" },
            "gemini": { "api_key": "test-key" }
        }))
        .unwrap();
        assert_eq!(config.segmentation.estimator, EstimatorKind::Predicate);
        assert_eq!(config.gemini.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.gemini.timeout_ms, 15_000);
        assert_eq!(config.node_id, "node-01");
    }
}
