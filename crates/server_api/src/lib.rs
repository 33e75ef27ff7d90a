use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Deserialize;
use shared::{
    error::ApiError,
    protocol::{ContactAccepted, ContactRequest},
};
use tracing::{debug, info, warn};

pub mod relay;

pub use relay::{EmailRelay, RelayError, RelayMessage, Web3FormsRelay};

pub const MAX_FIELD_CHARS: usize = 1000;
pub const NAME_CHARS: (usize, usize) = (2, 100);
pub const MESSAGE_CHARS: (usize, usize) = (10, 1000);
const LOG_PREVIEW_CHARS: usize = 100;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern compiles")
});

#[derive(Clone, Default)]
pub struct ApiContext {
    /// `None` when no relay access key is configured; submissions are then only logged.
    pub relay: Option<Arc<dyn EmailRelay>>,
}

/// Contact body as received. Every field is optional so that a missing field
/// is reported as a validation failure rather than a decoding failure.
#[derive(Debug, Default, Deserialize)]
pub struct RawContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

pub fn sanitize_input(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>'))
        .take(MAX_FIELD_CHARS)
        .collect()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn validate_contact(raw: RawContactRequest) -> Result<ContactRequest, ApiError> {
    let (Some(name), Some(email), Some(message)) = (
        present(raw.name),
        present(raw.email),
        present(raw.message),
    ) else {
        return Err(ApiError::validation("All fields are required"));
    };

    let name = sanitize_input(&name);
    let email = sanitize_input(&email);
    let message = sanitize_input(&message);

    if !is_valid_email(&email) {
        return Err(ApiError::validation("Invalid email format"));
    }
    if !within(&name, NAME_CHARS) {
        return Err(ApiError::validation(format!(
            "Name must be between {} and {} characters",
            NAME_CHARS.0, NAME_CHARS.1
        )));
    }
    if !within(&message, MESSAGE_CHARS) {
        return Err(ApiError::validation(format!(
            "Message must be between {} and {} characters",
            MESSAGE_CHARS.0, MESSAGE_CHARS.1
        )));
    }

    Ok(ContactRequest {
        name,
        email,
        message,
    })
}

/// Validates a contact submission and hands it to the relay.
///
/// Relay failures are logged and swallowed: a downstream mail outage never
/// turns an accepted submission into an error for the visitor.
pub async fn submit_contact(
    ctx: &ApiContext,
    raw: RawContactRequest,
) -> Result<ContactAccepted, ApiError> {
    let contact = validate_contact(raw)?;

    if let Some(relay) = &ctx.relay {
        let message = RelayMessage {
            from_name: contact.name.clone(),
            email: contact.email.clone(),
            message: contact.message.clone(),
        };
        if let Err(error) = relay.forward(&message).await {
            warn!(%error, "contact relay failed; submission accepted anyway");
        }
    }

    debug!(name = %contact.name, email = %contact.email, "contact sender");
    info!(
        preview = %preview(&contact.message),
        "contact submission accepted"
    );

    Ok(ContactAccepted::thank_you())
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

fn within(value: &str, (min, max): (usize, usize)) -> bool {
    (min..=max).contains(&value.chars().count())
}

fn preview(message: &str) -> String {
    let mut out: String = message.chars().take(LOG_PREVIEW_CHARS).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
