//! Process configuration.
//!
//! Loaded once at start-up from built-in defaults, an optional file and
//! `ORDERFLOW__`-prefixed environment variables (`__` separates nesting levels,
//! e.g. `ORDERFLOW__PAYMENTS__STRIPE_API_KEY`). The resulting [`AppConfig`] is
//! immutable and handed by reference to the components that need it.

use crate::error::Result;
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

const ENV_PREFIX: &str = "ORDERFLOW";
const DEFAULT_CONFIG_FILE: &str = "orderflow";

/// A credential whose value is never printed.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([redacted])")
    }
}

/// What the pipeline does with an order the fraud rule flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReviewPolicy {
    /// Mark the order for review and still take the payment.
    #[default]
    Continue,
    /// Mark the order for review and stop before payment.
    Halt,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub name: String,
    pub version: String,
    pub environment: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentSettings {
    pub stripe_api_key: Option<Secret>,
    pub paypal_client_id: Option<Secret>,
    pub paypal_client_secret: Option<Secret>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettings {
    pub enable_email: bool,
    pub sendgrid_api_key: Option<Secret>,
    pub smtp_host: Option<String>,
    pub smtp_username: Option<Secret>,
    pub smtp_password: Option<Secret>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enable_email: true,
            sendgrid_api_key: None,
            smtp_host: None,
            smtp_username: None,
            smtp_password: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    pub connection_string: Option<Secret>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PipelineSettings {
    pub review_policy: ReviewPolicy,
    pub enable_fraud_detection: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            review_policy: ReviewPolicy::Continue,
            enable_fraud_detection: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub application: ApplicationSettings,
    #[serde(default)]
    pub payments: PaymentSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub pipeline: PipelineSettings,
}

/// Every secret option the process recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    StripeApiKey,
    PayPalClientId,
    PayPalClientSecret,
    SendGridApiKey,
    SmtpUsername,
    SmtpPassword,
    DatabaseConnectionString,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 7] = [
        ConfigKey::StripeApiKey,
        ConfigKey::PayPalClientId,
        ConfigKey::PayPalClientSecret,
        ConfigKey::SendGridApiKey,
        ConfigKey::SmtpUsername,
        ConfigKey::SmtpPassword,
        ConfigKey::DatabaseConnectionString,
    ];

    /// Dotted key as used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::StripeApiKey => "payments.stripe_api_key",
            ConfigKey::PayPalClientId => "payments.paypal_client_id",
            ConfigKey::PayPalClientSecret => "payments.paypal_client_secret",
            ConfigKey::SendGridApiKey => "notifications.sendgrid_api_key",
            ConfigKey::SmtpUsername => "notifications.smtp_username",
            ConfigKey::SmtpPassword => "notifications.smtp_password",
            ConfigKey::DatabaseConnectionString => "database.connection_string",
        }
    }

    pub fn env_var(&self) -> String {
        format!(
            "{ENV_PREFIX}__{}",
            self.name().replace('.', "__").to_ascii_uppercase()
        )
    }
}

impl AppConfig {
    /// Loads defaults, then `path` (or `orderflow.*` in the working directory if present), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = Self::defaults()?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Defaults only, ignoring files and the environment.
    pub fn default_settings() -> Result<Self> {
        Ok(Self::defaults()?.build()?.try_deserialize()?)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("application.name", "Order Processor")?
            .set_default("application.version", env!("CARGO_PKG_VERSION"))?
            .set_default("application.environment", "development")?
            .set_default("notifications.enable_email", true)?
            .set_default("pipeline.review_policy", "continue")?
            .set_default("pipeline.enable_fraud_detection", true)?)
    }

    /// Secret options that are not set.
    pub fn missing_secrets(&self) -> Vec<ConfigKey> {
        ConfigKey::ALL
            .into_iter()
            .filter(|key| self.secret(*key).is_none())
            .collect()
    }

    fn secret(&self, key: ConfigKey) -> Option<&Secret> {
        let value = match key {
            ConfigKey::StripeApiKey => &self.payments.stripe_api_key,
            ConfigKey::PayPalClientId => &self.payments.paypal_client_id,
            ConfigKey::PayPalClientSecret => &self.payments.paypal_client_secret,
            ConfigKey::SendGridApiKey => &self.notifications.sendgrid_api_key,
            ConfigKey::SmtpUsername => &self.notifications.smtp_username,
            ConfigKey::SmtpPassword => &self.notifications.smtp_password,
            ConfigKey::DatabaseConnectionString => &self.database.connection_string,
        };
        value.as_ref().filter(|secret| !secret.expose().is_empty())
    }
}
