use serde::{Deserialize, Serialize};

/// Envelope returned by `GET /messages`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub content: String,
}

impl MessageResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}
