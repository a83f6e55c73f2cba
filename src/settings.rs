use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use config::{Config, Environment, File};

use secrecy::Secret;

use serde::Deserialize;
use serde_aux::prelude::*;

use url::Url;

use crate::client::RelayClient;
use crate::form::FormVariant;

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
    pub relay: RelaySettings,
    pub form: FormSettings,
}

impl Settings {
    /// Load application settings from the settings directory
    pub fn load() -> anyhow::Result<Self> {
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
            .add_source(File::from(base_path.join("base")).required(true))
            .add_source(File::from(base_path.join(runtime.as_str())).required(true))
            // NOTE: Relay credentials belong here in prod. Takes the form `APP_<section>__<setting name>`.
            .add_source(
                Environment::with_prefix("app")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
            .context("Failed to load/deserialize settings")
    }
}

#[derive(Debug, Deserialize)]
pub struct RelaySettings {
    api_base_url: String,
    service_id: String,
    template_id: String,
    public_key: Secret<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    api_timeout_milliseconds: Option<u64>,
}

impl RelaySettings {
    /// The base URL for the relay REST service
    pub fn api_base_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.api_base_url).context("Failed to parse relay base URL")
    }
    /// Transport timeout, if one is configured
    pub fn api_timeout(&self) -> Option<Duration> {
        self.api_timeout_milliseconds.map(Duration::from_millis)
    }
    /// Build a relay client and bind the public key to it
    pub fn client(&self) -> anyhow::Result<RelayClient> {
        use secrecy::ExposeSecret;

        if self.service_id.trim().is_empty() {
            anyhow::bail!("Relay service ID is not configured");
        }
        if self.template_id.trim().is_empty() {
            anyhow::bail!("Relay template ID is not configured");
        }
        if self.public_key.expose_secret().trim().is_empty() {
            anyhow::bail!("Relay public key is not configured");
        }

        let mut client = RelayClient::new(
            self.api_base_url()?,
            &self.service_id,
            &self.template_id,
            self.api_timeout(),
        )?;
        client.init(self.public_key.clone().into());

        Ok(client)
    }
}

#[derive(Debug, Deserialize)]
pub struct FormSettings {
    #[serde(default)]
    pub variant: FormVariant,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    sent_banner_milliseconds: Option<u64>,
}

impl FormSettings {
    /// How long the success banner stays up; `None` keeps it until the next edit
    pub fn sent_banner(&self) -> Option<Duration> {
        self.sent_banner_milliseconds.map(Duration::from_millis)
    }
}
