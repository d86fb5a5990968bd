use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::MailSettings;

/// Errors that can occur when handing mail to the relay
#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Relay rejected message: {0}")]
    Rejected(String),

    #[error("Mail relay is not configured")]
    NotConfigured,
}

/// A single message for one or more recipients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
}

/// Client for the outbound mail relay
///
/// Messages are posted as JSON to `{base_url}/send`, authenticated with the
/// configured credentials.
#[derive(Debug, Clone)]
pub struct MailClient {
    base_url: String,
    username: String,
    password: Option<String>,
    default_sender: String,
    client: Client,
}

impl MailClient {
    pub fn new(
        base_url: String,
        username: String,
        password: Option<String>,
        default_sender: String,
        timeout: Duration,
    ) -> Result<Self, MailError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            username,
            password,
            default_sender,
            client,
        })
    }

    /// Build a client from settings, or fail if mail is not configured
    pub fn from_settings(settings: &MailSettings) -> Result<Self, MailError> {
        if !settings.is_configured() {
            return Err(MailError::NotConfigured);
        }
        let username = settings.username.clone().ok_or(MailError::NotConfigured)?;

        let scheme = if settings.use_tls { "https" } else { "http" };
        let base_url = format!("{}://{}:{}", scheme, settings.server, settings.port);

        Self::new(
            base_url,
            username,
            settings.password.clone(),
            settings.default_sender.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn default_sender(&self) -> &str {
        &self.default_sender
    }

    /// Hand one message to the relay
    pub async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let url = format!("{}/send", self.base_url.trim_end_matches('/'));

        tracing::debug!("Posting mail for {} recipients to {}", mail.to.len(), url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, self.password.as_ref())
            .json(mail)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MailError::Rejected(format!(
                "relay answered {}",
                response.status()
            )));
        }

        Ok(())
    }
}
