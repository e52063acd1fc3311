use anyhow::bail;
use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::constants::*;

/// How session tokens are represented on the wire
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TokenStrategy {
    /// random identifier, claims kept in the server side session table
    #[default]
    Opaque,
    /// HS256 signed JWT carrying the claims
    Jwt,
}

impl FromStr for TokenStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "opaque" => Ok(Self::Opaque),
            "jwt" | "signed" => Ok(Self::Jwt),
            other => Err(format!("unknown token strategy: {other}")),
        }
    }
}

impl Display for TokenStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Opaque => write!(f, "opaque"),
            Self::Jwt => write!(f, "jwt"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub mongodb_uri: String,
    pub mongodb_min_pool_size: u32,
    pub mongodb_max_pool_size: u32,
    pub token_strategy: TokenStrategy,
    /// signing key, required by the jwt strategy
    pub jwt_secret: Option<String>,
    pub admin_session_ttl: u64,
    pub villager_session_ttl: u64,
    pub sensor_live_threshold: u64,
    /// `user:password[:role]` entries separated by `,`
    pub admin_credentials: String,
    /// Aadhaar number which logs in as the administrator on `/api/login`
    pub admin_aadhaar: Option<String>,
    pub ingest_api_key: Option<String>,
    pub sms_gateway_url: Option<String>,
    pub expose_otp: bool,
    pub allowed_origins: Vec<String>,
    pub sweep_interval: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            mongodb_uri: DEFAULT_MONGODB_URI.to_owned(),
            mongodb_min_pool_size: MONGO_MIN_POOL_SIZE,
            mongodb_max_pool_size: MONGO_MAX_POOL_SIZE,
            token_strategy: TokenStrategy::default(),
            jwt_secret: None,
            admin_session_ttl: ADMIN_SESSION_TTL_SECS,
            villager_session_ttl: VILLAGER_SESSION_TTL_SECS,
            sensor_live_threshold: SENSOR_LIVE_THRESHOLD_SECS,
            admin_credentials: String::new(),
            admin_aadhaar: None,
            ingest_api_key: None,
            sms_gateway_url: None,
            expose_otp: false,
            allowed_origins: vec![],
            sweep_interval: STORE_SWEEP_INTERVAL_SECS,
        }
    }
}

impl AppConfig {
    /// Reads the configuration from environment variables.
    /// Every missing or unparsable value falls back to its default,
    /// a jwt strategy without `JWT_SECRET_KEY` is an error.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let admin_credentials = load_opt("ADMIN_CREDENTIALS").unwrap_or_else(|| {
            match (load_opt("ADMIN_USERNAME"), load_opt("ADMIN_PASSWORD")) {
                (Some(user), Some(pass)) => format!("{user}:{pass}"),
                (None, Some(pass)) => format!("{DEFAULT_ADMIN_USERNAME}:{pass}"),
                _ => {
                    warn!("No admin credentials configured, admin login is disabled");
                    String::new()
                }
            }
        });
        let allowed_origins = load_opt("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|origin| origin.trim().to_owned())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let jwt_secret = load_opt("JWT_SECRET_KEY");

        let config = Self {
            port: load_or("PORT", defaults.port),
            mongodb_uri: load_opt("MONGODB_URI").unwrap_or(defaults.mongodb_uri),
            mongodb_min_pool_size: load_or("MONGODB_MIN_POOL_SIZE", defaults.mongodb_min_pool_size),
            mongodb_max_pool_size: load_or("MONGODB_MAX_POOL_SIZE", defaults.mongodb_max_pool_size),
            token_strategy: load_or("TOKEN_STRATEGY", defaults.token_strategy),
            jwt_secret,
            admin_session_ttl: load_or("ADMIN_SESSION_TTL", defaults.admin_session_ttl),
            villager_session_ttl: load_or("VILLAGER_SESSION_TTL", defaults.villager_session_ttl),
            sensor_live_threshold: load_or(
                "SENSOR_LIVE_THRESHOLD_SECS",
                defaults.sensor_live_threshold,
            ),
            admin_credentials,
            admin_aadhaar: load_opt("ADMIN_AADHAAR"),
            ingest_api_key: load_opt("INGEST_API_KEY"),
            sms_gateway_url: load_opt("SMS_GATEWAY_URL"),
            expose_otp: load_or("EXPOSE_OTP", defaults.expose_otp),
            allowed_origins,
            sweep_interval: load_or("STORE_SWEEP_INTERVAL", defaults.sweep_interval),
        };
        config.check()?;
        Ok(config)
    }

    pub fn check(&self) -> anyhow::Result<()> {
        if self.token_strategy == TokenStrategy::Jwt && self.jwt_secret.is_none() {
            bail!("TOKEN_STRATEGY=jwt requires JWT_SECRET_KEY to be set");
        }
        if let Some(secret) = &self.jwt_secret {
            if secret.len() < MIN_JWT_SECRET_LEN {
                warn!("JWT_SECRET_KEY is shorter than {MIN_JWT_SECRET_LEN} bytes");
            }
        }
        Ok(())
    }
}

fn load_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_owned())
        .filter(|val| !val.is_empty())
}

fn load_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(val) = load_opt(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };
    val.parse::<T>().unwrap_or_else(|err| {
        warn!("Invalid {key} value: {err}, using default: {default}");
        default
    })
}
