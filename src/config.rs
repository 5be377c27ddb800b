/*
 * Responsibility
 * - Load settings from the environment (.env is honoured)
 * - Validate them; anything missing or malformed aborts start-up
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// HTTP surface settings consumed by the router.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub static_dir: PathBuf,
    pub request_timeout: Duration,
}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub http: HttpConfig,

    /// `redis://..` selects the Valkey cache; `None` keeps identities in process.
    pub identity_cache_url: Option<String>,
    pub token_ttl: Duration,
    pub remember_ttl: Duration,
    /// Envelope code returned when a protected route is called without a live token.
    pub reject_code: i32,

    pub admin_username: String,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            Err(_) => 8088,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::from_env();

        let static_dir = std::env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("web/build"));

        let request_timeout =
            positive_secs("REQUEST_TIMEOUT_SECONDS", parse_or("REQUEST_TIMEOUT_SECONDS", 30)?)?;

        let identity_cache_url = std::env::var("IDENTITY_CACHE_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let token_ttl =
            positive_secs("AUTH_TOKEN_TTL_SECONDS", parse_or("AUTH_TOKEN_TTL_SECONDS", 30 * 60)?)?;
        let remember_ttl = positive_secs(
            "AUTH_REMEMBER_TTL_SECONDS",
            parse_or("AUTH_REMEMBER_TTL_SECONDS", 7 * 24 * 60 * 60)?,
        )?;

        let reject_code: i32 = parse_or("AUTH_REJECT_CODE", 401)?;
        if reject_code == crate::api::envelope::SUCCESS_CODE {
            return Err(ConfigError::Invalid("AUTH_REJECT_CODE"));
        }

        let admin_username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into());
        let admin_password = match std::env::var("ADMIN_PASSWORD") {
            Ok(v) if !v.is_empty() => v,
            _ if app_env.is_production() => return Err(ConfigError::Missing("ADMIN_PASSWORD")),
            _ => "admin".to_string(),
        };

        Ok(Self {
            addr,
            app_env,
            http: HttpConfig {
                static_dir,
                request_timeout,
            },
            identity_cache_url,
            token_ttl,
            remember_ttl,
            reject_code,
            admin_username,
            admin_password,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

// A zero timeout or TTL would reject every request.
fn positive_secs(key: &'static str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Invalid(key));
    }
    Ok(Duration::from_secs(secs))
}
