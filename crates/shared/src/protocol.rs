use serde::{Deserialize, Serialize};

pub const CONTACT_ROUTE: &str = "/api/contact";

/// Body accepted by the contact ingestion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactAccepted {
    pub success: bool,
    pub message: String,
}

impl ContactAccepted {
    pub fn thank_you() -> Self {
        Self {
            success: true,
            message: "Thank you for your message. We will get back to you soon!".to_string(),
        }
    }
}

/// Error body returned for every non-2xx contact response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactErrorBody {
    pub error: String,
}

impl ContactErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
