//! Client side of the contact ingestion endpoint.

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{ContactErrorBody, ContactRequest, CONTACT_ROUTE};
use thiserror::Error;

pub const REJECTED_FALLBACK: &str = "Submission failed";
pub const TRANSPORT_FALLBACK: &str = "Failed to submit. Please try again.";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("contact request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("contact endpoint rejected submission with status {status}")]
    Rejected { status: u16, error: Option<String> },
}

impl GatewayError {
    /// Text shown to the visitor: the server's own reason when it gave one.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Rejected {
                error: Some(error), ..
            } if !error.is_empty() => error.clone(),
            GatewayError::Rejected { .. } => REJECTED_FALLBACK.to_string(),
            GatewayError::Transport(_) => TRANSPORT_FALLBACK.to_string(),
        }
    }
}

#[async_trait]
pub trait ContactGateway: Send + Sync {
    async fn send(&self, request: &ContactRequest) -> Result<(), GatewayError>;
}

pub struct HttpContactGateway {
    client: Client,
    endpoint: String,
}

impl HttpContactGateway {
    pub fn new(server_url: &str) -> Self {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(client: Client, server_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{CONTACT_ROUTE}", server_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ContactGateway for HttpContactGateway {
    async fn send(&self, request: &ContactRequest) -> Result<(), GatewayError> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let error = response
            .json::<ContactErrorBody>()
            .await
            .ok()
            .map(|body| body.error);
        Err(GatewayError::Rejected {
            status: status.as_u16(),
            error,
        })
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
