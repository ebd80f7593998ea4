use std::{env, io::Write};

use chrono::Duration;
use fund_common::{helpers::parse_boolean_flag, Secret};
use log::*;
use midtrans_tools::MidtransConfig;
use rand::{thread_rng, RngCore};
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_CF_HOST: &str = "127.0.0.1";
const DEFAULT_CF_PORT: u16 = 8360;
const DEFAULT_UNPAID_TRANSACTION_TIMEOUT: Duration = Duration::hours(24);
/// HS256 secrets shorter than this are rejected.
const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// The time before a pending transaction is considered abandoned and marked as expired.
    pub unpaid_transaction_timeout: Duration,
    /// If true, webhook notifications must carry a valid Midtrans `signature_key`.
    pub verify_notification_signature: bool,
    /// Midtrans Snap configuration. The gateway timeout lives here too.
    pub midtrans: MidtransConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CF_HOST.to_string(),
            port: DEFAULT_CF_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            unpaid_transaction_timeout: DEFAULT_UNPAID_TRANSACTION_TIMEOUT,
            verify_notification_signature: true,
            midtrans: MidtransConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("CF_HOST").ok().unwrap_or_else(|| DEFAULT_CF_HOST.into());
        let port = env::var("CF_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for CF_PORT. {e} Using the default, {DEFAULT_CF_PORT}, instead.");
                    DEFAULT_CF_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_CF_PORT);
        let database_url = env::var("CF_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ CF_DATABASE_URL is not set. Please set it to the URL for the crowdfunding database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let verify_notification_signature = parse_boolean_flag(env::var("CF_VERIFY_NOTIFICATION_SIGNATURE").ok(), true);
        if !verify_notification_signature {
            warn!(
                "🚨️ Notification signature checks are disabled. Anyone can mark contributions as paid. Only do this \
                 in development."
            );
        }
        let unpaid_transaction_timeout = configure_transaction_timeout();
        let midtrans = MidtransConfig::new_from_env_or_default();
        info!("🪛️ Checkout requests to {} time out after {}s", midtrans.base_url, midtrans.timeout.as_secs());
        Self { host, port, database_url, auth, unpaid_transaction_timeout, verify_notification_signature, midtrans }
    }

    /// How long `create_transaction` waits for Midtrans.
    pub fn gateway_timeout(&self) -> std::time::Duration {
        self.midtrans.timeout
    }
}

fn configure_transaction_timeout() -> Duration {
    env::var("CF_UNPAID_TRANSACTION_TIMEOUT")
        .map_err(|_| {
            info!(
                "🪛️ CF_UNPAID_TRANSACTION_TIMEOUT is not set. Using the default value of {} hrs.",
                DEFAULT_UNPAID_TRANSACTION_TIMEOUT.num_hours()
            )
        })
        .and_then(|s| {
            s.parse::<i64>()
                .map(Duration::hours)
                .map_err(|e| warn!("🪛️ Invalid configuration value for CF_UNPAID_TRANSACTION_TIMEOUT. {e}"))
        })
        .ok()
        .unwrap_or(DEFAULT_UNPAID_TRANSACTION_TIMEOUT)
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The HS256 secret shared with the session service that issues access tokens.
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The JWT secret has not been set. I'm using a random value for this session. No tokens issued \
             elsewhere will be accepted. DO NOT operate on production like this. 🚨️🚨️🚨️"
        );
        let mut bytes = [0u8; MIN_JWT_SECRET_LEN];
        thread_rng().fill_bytes(&mut bytes);
        let secret = base64::encode(bytes);
        match &mut tmpfile {
            Some((f, p)) => match writeln!(f, "{secret}") {
                Ok(()) => warn!(
                    "🚨️🚨️🚨️ The JWT secret for this session was written to {}. If this is a production instance, you \
                     are doing it wrong! Set the CF_JWT_SECRET environment variable instead. 🚨️🚨️🚨️",
                    p.to_str().unwrap_or("???")
                ),
                Err(e) => warn!("🪛️ Could not write the JWT secret to the temporary file. {e}"),
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the JWT secret. ");
            },
        }
        Self { jwt_secret: Secret::new(secret) }
    }
}

impl AuthConfig {
    pub fn new<S: Into<String>>(secret: S) -> Self {
        Self { jwt_secret: Secret::new(secret.into()) }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("CF_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [CF_JWT_SECRET]")))?;
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ServerError::ConfigurationError(format!(
                "CF_JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes long"
            )));
        }
        Ok(Self::new(secret))
    }
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// A subset of the server configuration that is used to configure the server's behaviour. Generally we try to keep this
/// as small as possible, and exclude secrets to avoid passing sensitive information around the system.
#[derive(Clone, Copy, Debug)]
pub struct ServerOptions {
    pub verify_notification_signature: bool,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { verify_notification_signature: config.verify_notification_signature }
    }
}
