use std::{env, io::Write, time::Duration};

use chrono::Duration as ChronoDuration;
use log::*;
use rand::{thread_rng, Rng};
use serde_json::json;
use lpg_common::Secret;
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_LPG_HOST: &str = "127.0.0.1";
const DEFAULT_LPG_PORT: u16 = 8088;
const DEFAULT_ACCRUAL_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_ACCRUAL_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Base URL of the external accrual engine, e.g. "http://accrual.internal:8080".
    pub accrual_url: String,
    /// Cadence of the reconciliation worker. Independent of the per-request timeout below.
    pub poll_interval: Duration,
    /// Per-request timeout on calls to the accrual engine.
    pub accrual_timeout: Duration,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_LPG_HOST.to_string(),
            port: DEFAULT_LPG_PORT,
            database_url: String::default(),
            accrual_url: DEFAULT_ACCRUAL_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            accrual_timeout: DEFAULT_ACCRUAL_TIMEOUT,
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("LPG_HOST").ok().unwrap_or_else(|| DEFAULT_LPG_HOST.into());
        let port = env::var("LPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for LPG_PORT. {e} Using the default, {DEFAULT_LPG_PORT}, instead."
                    );
                    DEFAULT_LPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_LPG_PORT);
        let database_url = env::var("LPG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ LPG_DATABASE_URL is not set. Please set it to the URL for the ledger database.");
            String::default()
        });
        let accrual_url = env::var("LPG_ACCRUAL_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ LPG_ACCRUAL_URL is not set. Using the default, {DEFAULT_ACCRUAL_URL}.");
            DEFAULT_ACCRUAL_URL.into()
        });
        let poll_interval = duration_from_env("LPG_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL);
        let accrual_timeout = duration_from_env("LPG_ACCRUAL_TIMEOUT_SECS", DEFAULT_ACCRUAL_TIMEOUT);
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        Self { host, port, database_url, accrual_url, poll_interval, accrual_timeout, auth }
    }
}

fn duration_from_env(var: &str, default: Duration) -> Duration {
    env::var(var)
        .map_err(|_| info!("🪛️ {var} is not set. Using the default value of {} seconds.", default.as_secs()))
        .and_then(|s| {
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| warn!("🪛️ Invalid configuration value for {var}. {e}"))
        })
        .ok()
        .unwrap_or(default)
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The HS256 key used to sign and verify access tokens.
    pub jwt_secret: Secret<String>,
    /// How long issued access tokens stay valid.
    pub token_expiry: ChronoDuration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The JWT signing key has not been set. I'm using a random value for this session. DO NOT operate \
             on production like this since all sessions will be invalidated on restart. 🚨️🚨️🚨️"
        );
        let mut rng = thread_rng();
        let secret = (0..32).map(|_| format!("{:02x}", rng.gen::<u8>())).collect::<String>();
        match &mut tmpfile {
            Some((f, p)) => {
                let key_data = json!({ "jwt_secret": secret }).to_string();
                match writeln!(f, "{key_data}") {
                    Ok(()) => warn!(
                        "🚨️🚨️🚨️ The JWT signing key for this session was written to {}. If this is a production \
                         instance, you are doing it wrong! Set the LPG_JWT_SECRET environment variable instead. \
                         🚨️🚨️🚨️",
                        p.to_str().unwrap_or("???")
                    ),
                    Err(e) => warn!("🪛️ Could not write the JWT signing key to the temporary file. {e}"),
                }
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the JWT signing key. ");
            },
        }
        Self { jwt_secret: Secret::new(secret), token_expiry: ChronoDuration::hours(DEFAULT_JWT_EXPIRY_HOURS) }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("LPG_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [LPG_JWT_SECRET]")))?;
        if secret.trim().is_empty() {
            return Err(ServerError::ConfigurationError("LPG_JWT_SECRET is empty".to_string()));
        }
        let token_expiry = env::var("LPG_JWT_EXPIRY_HOURS")
            .map_err(|_| {
                info!("🪛️ LPG_JWT_EXPIRY_HOURS is not set. Using the default value of {DEFAULT_JWT_EXPIRY_HOURS} hrs.")
            })
            .and_then(|s| {
                s.parse::<i64>()
                    .map(ChronoDuration::hours)
                    .map_err(|e| warn!("🪛️ Invalid configuration value for LPG_JWT_EXPIRY_HOURS. {e}"))
            })
            .ok()
            .unwrap_or_else(|| ChronoDuration::hours(DEFAULT_JWT_EXPIRY_HOURS));
        Ok(Self { jwt_secret: Secret::new(secret), token_expiry })
    }
}
