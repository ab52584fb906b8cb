use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Missing API key: set {0}")]
    MissingApiKey(String),

    #[error("Request queue closed")]
    QueueClosed,
}

impl GatewayError {
    /// Classify a non-success response from the service
    pub fn from_response(status: u16, body: &str) -> Self {
        if status == 429 || mentions_quota(body) {
            GatewayError::RateLimited(format!("{}: {}", status, body))
        } else {
            GatewayError::Api {
                status,
                message: body.to_string(),
            }
        }
    }

    /// Whether waiting and retrying can help
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::RateLimited(_) => true,
            GatewayError::Api { status, message } => *status == 429 || mentions_quota(message),
            _ => false,
        }
    }
}

fn mentions_quota(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("429") || lower.contains("quota") || lower.contains("exhausted")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(GatewayError::from_response(429, "Too Many Requests").is_retryable());
        assert!(GatewayError::from_response(400, r#"{"status": "RESOURCE_EXHAUSTED"}"#).is_retryable());
        assert!(GatewayError::from_response(403, "Quota exceeded for model").is_retryable());
        assert!(!GatewayError::from_response(500, "internal").is_retryable());
        assert!(!GatewayError::from_response(400, "bad prompt").is_retryable());
        assert!(!GatewayError::MissingApiKey("GEMINI_API_KEY".into()).is_retryable());
    }
}
