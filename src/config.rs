/*
 * Responsibility
 * - 環境変数や設定の読み込み (RDS_*, AUTH_*, PORT, MARKER_SELECTOR など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use jsonwebtoken::Algorithm;
use sqlx::postgres::PgSslMode;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
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

/// How a single marker is addressed on `/marker/...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorMode {
    /// `/marker/{id}` (storage-assigned id)
    Id,
    /// `/marker/{lat}/{lng}`
    Coordinates,
}

impl FromStr for SelectorMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "coordinates" | "coords" | "latlng" => Ok(Self::Coordinates),
            _ => Err(ConfigError::Invalid("MARKER_SELECTOR")),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
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

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub ssl_mode: PgSslMode,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the password
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("database", &self.database)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

/// Where the token verification key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthKeySource {
    Pem(String),
    Url(Url),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database: DatabaseConfig,

    pub auth_key: AuthKeySource,
    pub auth_algorithm: Algorithm,
    pub auth_identity_claim: String,
    pub auth_require_identity_claim: bool,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,

    pub selector_mode: SelectorMode,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));
        let optional = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port: u16 = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let database = DatabaseConfig {
            host: required("RDS_HOSTNAME")?,
            port: required("RDS_PORT")?
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("RDS_PORT"))?,
            username: required("RDS_USERNAME")?,
            password: required("RDS_PASSWORD")?,
            database: required("RDS_DB_NAME")?,
            ssl_mode: match optional("RDS_SSL_MODE") {
                Some(mode) => {
                    PgSslMode::from_str(&mode).map_err(|_| ConfigError::Invalid("RDS_SSL_MODE"))?
                }
                None => PgSslMode::Disable,
            },
        };

        let auth_key = match optional("ACCESS_JWT_PUBLIC_KEY_PEM") {
            Some(pem) => AuthKeySource::Pem(pem.replace("\\n", "\n")),
            None => {
                let raw = optional("AUTH_KEY_URL").ok_or(ConfigError::Missing("AUTH_KEY_URL"))?;
                let url = Url::parse(&raw).map_err(|_| ConfigError::Invalid("AUTH_KEY_URL"))?;
                AuthKeySource::Url(url)
            }
        };

        let auth_algorithm = match optional("AUTH_JWT_ALGORITHM") {
            Some(alg) => {
                Algorithm::from_str(&alg).map_err(|_| ConfigError::Invalid("AUTH_JWT_ALGORITHM"))?
            }
            None => Algorithm::RS256,
        };

        let auth_identity_claim =
            optional("AUTH_IDENTITY_CLAIM").unwrap_or_else(|| "zid".to_string());

        let auth_require_identity_claim = match optional("AUTH_REQUIRE_IDENTITY_CLAIM") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid("AUTH_REQUIRE_IDENTITY_CLAIM"))?,
            None => true,
        };

        let auth_issuer = optional("AUTH_ISSUER");
        let auth_audience = optional("AUTH_AUDIENCE");

        let access_token_leeway_seconds = lookup("ACCESS_TOKEN_LEEWAY_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        let selector_mode = match optional("MARKER_SELECTOR") {
            Some(v) => v.parse()?,
            None => SelectorMode::Coordinates,
        };

        Ok(Self {
            addr,
            app_env,
            database,
            auth_key,
            auth_algorithm,
            auth_identity_claim,
            auth_require_identity_claim,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            selector_mode,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
