use crate::scoring::{ComplianceModel, CompositeWeights, ScoringConfig};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 8;
const MAX_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_NEXT_STEP_URL: &str = "/thanks";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
    pub fetch: FetchConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let api_key = env::var("GAP_SCORE_API_KEY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        if api_key.is_none() && environment == AppEnvironment::Production {
            return Err(ConfigError::MissingApiKey);
        }

        let allowed_origins = env::var("APP_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        let timeout_secs = match env::var("APP_FETCH_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| (1..=MAX_FETCH_TIMEOUT_SECS).contains(secs))
                .ok_or(ConfigError::InvalidFetchTimeout)?,
            Err(_) => DEFAULT_FETCH_TIMEOUT_SECS,
        };

        let compliance_model = match env::var("APP_COMPLIANCE_MODEL") {
            Ok(raw) => ComplianceModel::from_name(&raw)
                .ok_or(ConfigError::UnknownComplianceModel(raw))?,
            Err(_) => ComplianceModel::default(),
        };

        let weights = match env::var("APP_SCORING_WEIGHTS") {
            Ok(raw) => {
                CompositeWeights::from_name(&raw).ok_or(ConfigError::UnknownWeighting(raw))?
            }
            Err(_) => CompositeWeights::default(),
        };

        let next_step_url =
            env::var("APP_NEXT_STEP_URL").unwrap_or_else(|_| DEFAULT_NEXT_STEP_URL.to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            auth: AuthConfig { api_key },
            cors: CorsConfig { allowed_origins },
            fetch: FetchConfig {
                timeout: Duration::from_secs(timeout_secs),
                user_agent: FetchConfig::DEFAULT_USER_AGENT.to_string(),
            },
            scoring: ScoringConfig {
                compliance_model,
                weights,
                next_step_url,
            },
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Shared secret expected in the `x-key` header. `None` disables the check.
#[derive(Clone, Default)]
pub struct AuthConfig {
    pub api_key: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Origins allowed to call the scoring endpoint from a browser.
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Outbound website fetch settings.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl FetchConfig {
    pub const DEFAULT_USER_AGENT: &'static str = "Mozilla/5.0 GapScoreBot";
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            user_agent: Self::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingApiKey,
    InvalidFetchTimeout,
    UnknownComplianceModel(String),
    UnknownWeighting(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingApiKey => {
                write!(f, "GAP_SCORE_API_KEY must be set in production")
            }
            ConfigError::InvalidFetchTimeout => write!(
                f,
                "APP_FETCH_TIMEOUT_SECS must be between 1 and {MAX_FETCH_TIMEOUT_SECS}"
            ),
            ConfigError::UnknownComplianceModel(value) => write!(
                f,
                "APP_COMPLIANCE_MODEL '{value}' is not one of: penalty, ratio"
            ),
            ConfigError::UnknownWeighting(value) => write!(
                f,
                "APP_SCORING_WEIGHTS '{value}' is not one of: three_factor, two_factor"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "GAP_SCORE_API_KEY",
            "APP_ALLOWED_ORIGINS",
            "APP_FETCH_TIMEOUT_SECS",
            "APP_COMPLIANCE_MODEL",
            "APP_SCORING_WEIGHTS",
            "APP_NEXT_STEP_URL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.auth.api_key.is_none());
        assert!(config.cors.allowed_origins.is_empty());
        assert_eq!(config.fetch.timeout, Duration::from_secs(8));
        assert_eq!(config.scoring.compliance_model, ComplianceModel::default());
        assert_eq!(config.scoring.weights, CompositeWeights::three_factor());
        assert_eq!(config.scoring.next_step_url, "/thanks");
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn production_requires_api_key() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::MissingApiKey)
        ));

        env::set_var("GAP_SCORE_API_KEY", "s3cret");
        let config = AppConfig::load().expect("config loads with key");
        assert_eq!(config.auth.api_key.as_deref(), Some("s3cret"));
        reset_env();
    }

    #[test]
    fn parses_origins_and_strategies() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var(
            "APP_ALLOWED_ORIGINS",
            "https://bids.example.co.uk/, https://www.example.co.uk,,",
        );
        env::set_var("APP_COMPLIANCE_MODEL", "ratio");
        env::set_var("APP_SCORING_WEIGHTS", "two_factor");
        env::set_var("APP_FETCH_TIMEOUT_SECS", "5");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.cors.allowed_origins,
            vec![
                "https://bids.example.co.uk".to_string(),
                "https://www.example.co.uk".to_string()
            ]
        );
        assert_eq!(config.scoring.compliance_model, ComplianceModel::Ratio);
        assert_eq!(config.scoring.weights, CompositeWeights::two_factor());
        assert_eq!(config.fetch.timeout, Duration::from_secs(5));
        reset_env();
    }

    #[test]
    fn rejects_out_of_range_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_FETCH_TIMEOUT_SECS", "120");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidFetchTimeout)
        ));
        reset_env();
    }
}
