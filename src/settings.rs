use std::env;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use config::{Config, Environment, File};

use secrecy::{ExposeSecret, Secret};

use serde::Deserialize;
use serde_aux::prelude::*;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use url::Url;

use crate::client::EmailClient;
use crate::domain::EmailAddress;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_EMAIL_API_BASE_URL: &str = "https://api.postmarkapp.com";
const DEFAULT_EMAIL_API_TIMEOUT_MILLISECONDS: u64 = 10_000;

/// Runtime environment, either `Dev` for local development, or `Prod` for release
#[derive(Debug)]
pub enum Runtime {
    Dev,
    Prod,
}

impl Runtime {
    pub fn as_str(&self) -> &str {
        match self {
            Runtime::Dev => "dev",
            Runtime::Prod => "prod",
        }
    }
}

impl TryFrom<String> for Runtime {
    type Error = anyhow::Error;

    fn try_from(s: String) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => anyhow::bail!("{} is not a valid runtime environment", other),
        }
    }
}

/// Application settings wrapper
#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: ApplicationSettings,
    pub database: DatabaseSettings,
    /// Notification emails are disabled when absent
    #[serde(default)]
    pub email: Option<EmailSettings>,
}

impl Settings {
    /// Load application settings from the settings directory
    pub fn load() -> anyhow::Result<Self> {
        // Get the path to the settings directory
        let path = env::current_dir()?.join("settings");
        // Get the current environment based on the `APP_ENV` environment variable, default to `Dev`
        let runtime: Runtime = env::var("APP_ENV")
            .unwrap_or_else(|_| "dev".into())
            .try_into()?;

        Self::load_from(runtime, &path)
    }
    /// Load application settings from a specified path and runtime
    pub fn load_from(runtime: Runtime, base_path: &Path) -> anyhow::Result<Self> {
        Config::builder()
            // Include the base settings
            .add_source(File::from(base_path.join("base")).required(true))
            // Include the runtime settings
            .add_source(File::from(base_path.join(runtime.as_str())).required(true))
            // Override/include any settings from environment variables
            // NOTE: Should be used for any prod secrets. Takes the form `APP_<settings category>__<setting name>`.
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            )
            // Hosting platforms hand out the listening port as a bare `PORT`
            .set_override_option("app.port", env::var("PORT").ok())?
            .build()?
            .try_deserialize()
            .context("Failed to load/deserialize settings")
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    host: String,
    #[serde(
        default = "default_port",
        deserialize_with = "deserialize_number_from_string"
    )]
    port: u16,
}

impl ApplicationSettings {
    /// The application address to bind to
    pub fn addr(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    url: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    acquire_timeout_milliseconds: u64,
}

impl DatabaseSettings {
    /// The database connection options parsed from the connection string
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        PgConnectOptions::from_str(self.url.expose_secret())
            .context("Failed to parse database connection string")
    }
    /// A connection pool that connects on first use, so the server starts with the database down
    pub fn lazy_pool(&self) -> anyhow::Result<PgPool> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(self.acquire_timeout_milliseconds))
            .connect_lazy_with(self.connect_options()?);
        Ok(pool)
    }
}

fn default_email_api_base_url() -> String {
    DEFAULT_EMAIL_API_BASE_URL.into()
}

fn default_email_api_timeout() -> u64 {
    DEFAULT_EMAIL_API_TIMEOUT_MILLISECONDS
}

#[derive(Debug, Deserialize)]
pub struct EmailSettings {
    #[serde(default)]
    address: String,
    #[serde(default)]
    api_auth_token: Option<Secret<String>>,
    #[serde(default = "default_email_api_base_url")]
    api_base_url: String,
    #[serde(
        default = "default_email_api_timeout",
        deserialize_with = "deserialize_number_from_string"
    )]
    api_timeout_milliseconds: u64,
}

impl EmailSettings {
    /// Both credentials are present and non-empty
    pub fn is_configured(&self) -> bool {
        !self.address.trim().is_empty()
            && self
                .api_auth_token
                .as_ref()
                .is_some_and(|token| !token.expose_secret().is_empty())
    }
    /// The operator address, used as both sender and recipient
    pub fn address(&self) -> anyhow::Result<EmailAddress> {
        self.address
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Failed to parse notification email address")
    }
    /// The email REST API timeout duration
    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_milliseconds)
    }
    /// The base URL for the email REST service
    pub fn api_base_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.api_base_url).context("Failed to parse email base URL")
    }
    /// Build the email client, `None` when credentials are missing
    pub fn client(&self) -> anyhow::Result<Option<EmailClient>> {
        let Some(token) = self.api_auth_token.clone().filter(|_| self.is_configured()) else {
            return Ok(None);
        };

        EmailClient::new(
            self.address()?,
            self.api_timeout(),
            self.api_base_url()?,
            token.into(),
        )
        .map(Some)
    }
}
