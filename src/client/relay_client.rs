use std::convert::Infallible;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use async_trait::async_trait;

use reqwest::{Client, StatusCode};

use serde::Serialize;

use secrecy::Secret;

use url::Url;

use crate::client::MessageRelay;
use crate::error::{DeliveryError, DeliveryResult};
use crate::form::TemplateParams;

const SEND_EMAIL_PATH: &str = "api/v1.0/email/send";

/// Client for the email-relay REST API.
///
/// Each send is a single POST carrying the service and template identifiers,
/// the public key, and the template params. Nothing is retried.
#[derive(Debug)]
pub struct RelayClient {
    client: Client,

    api_send_email_url: Url,
    service_id: String,
    template_id: String,
    public_key: Option<PublicKey>,
}

impl RelayClient {
    /// Build a client. No timeout is applied unless `api_timeout` is set.
    ///
    /// The client cannot send until [`RelayClient::init`] binds a public key.
    pub fn new(
        api_base_url: Url,
        service_id: impl Into<String>,
        template_id: impl Into<String>,
        api_timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = api_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build http client")?;

        let api_send_email_url = api_base_url
            .join(SEND_EMAIL_PATH)
            .context("Failed to create send email endpoint URL")?;

        Ok(Self {
            client,
            api_send_email_url,
            service_id: service_id.into(),
            template_id: template_id.into(),
            public_key: None,
        })
    }

    /// Bind the public key used by every following send
    pub fn init(&mut self, public_key: PublicKey) {
        self.public_key = Some(public_key);
    }

    pub fn is_initialized(&self) -> bool {
        self.public_key.is_some()
    }

    #[tracing::instrument(
        name = "Send a message via relay",
        skip(self, params),
        fields(
            service_id = %self.service_id,
            template_id = %self.template_id,
            param_count = params.len(),
        )
    )]
    pub async fn send(&self, params: &TemplateParams) -> DeliveryResult<RelayResponse> {
        use secrecy::ExposeSecret;

        let public_key = self
            .public_key
            .as_ref()
            .ok_or(DeliveryError::NotInitialized)?;

        let body = SendEmailRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: public_key.expose_secret(),
            template_params: params,
        };

        let response = self
            .client
            .post(self.api_send_email_url.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, "Relay rejected the message");
            return Err(DeliveryError::Rejected { status, text });
        }

        Ok(RelayResponse { status, text })
    }
}

#[async_trait]
impl MessageRelay for RelayClient {
    async fn deliver(&self, params: &TemplateParams) -> DeliveryResult<RelayResponse> {
        self.send(params).await
    }
}

/// What the relay answered to an accepted message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub text: String,
}

/// Public access key identifying the relay account
#[derive(Debug)]
pub struct PublicKey(Secret<String>);

impl FromStr for PublicKey {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Infallible> {
        let value = value.to_string();
        let value = Secret::new(value);

        Ok(Self(value))
    }
}

impl From<Secret<String>> for PublicKey {
    fn from(value: Secret<String>) -> Self {
        Self(value)
    }
}

impl secrecy::ExposeSecret<String> for PublicKey {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParams,
}
