//! Outbound email relay used to deliver accepted contact submissions.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const WEB3FORMS_ENDPOINT: &str = "https://api.web3forms.com/submit";
const SUBJECT: &str = "New Contact Form Submission from BudGo.Net";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayMessage {
    pub from_name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("relay rejected message: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait EmailRelay: Send + Sync {
    async fn forward(&self, message: &RelayMessage) -> Result<(), RelayError>;
}

pub struct Web3FormsRelay {
    client: Client,
    endpoint: String,
    access_key: String,
    redirect: String,
}

impl Web3FormsRelay {
    pub fn new(
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        redirect: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            access_key: access_key.into(),
            redirect: redirect.into(),
        }
    }
}

#[derive(Serialize)]
struct Web3FormsPayload<'a> {
    access_key: &'a str,
    subject: &'a str,
    from_name: &'a str,
    email: &'a str,
    message: &'a str,
    redirect: &'a str,
}

#[derive(Deserialize)]
struct Web3FormsResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[async_trait]
impl EmailRelay for Web3FormsRelay {
    async fn forward(&self, message: &RelayMessage) -> Result<(), RelayError> {
        let payload = Web3FormsPayload {
            access_key: &self.access_key,
            subject: SUBJECT,
            from_name: &message.from_name,
            email: &message.email,
            message: &message.message,
            redirect: &self.redirect,
        };
        let response: Web3FormsResponse = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await?
            .json()
            .await?;

        if !response.success {
            return Err(RelayError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| "Email service failed".to_string()),
            ));
        }
        Ok(())
    }
}
